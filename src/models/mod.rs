//! Data models for boardcsv.
//!
//! Boards and views are read-only inputs; records are read during export and
//! constructed during import.

mod board;
mod record;
mod view;

pub use board::{Board, PropertyOption, PropertyTemplate};
pub use record::{PropertyValue, Record, RecordId};
pub use view::{ViewDefinition, ViewKind};
