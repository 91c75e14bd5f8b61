//! Storage adapters.
//!
//! The CLI keeps a board in a JSON [`BoardDocument`] and applies imports to a
//! [`MemoryRecordStore`], which provides the grouped undo the import relies
//! on.

pub mod document;
pub mod memory;

pub use document::BoardDocument;
pub use memory::{MAX_UNDO_STACK, MemoryRecordStore};
