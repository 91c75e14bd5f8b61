//! Command handlers module.
//!
//! - `io.rs`: CSV export and import against a JSON board document

mod io;

pub use io::{cmd_export, cmd_import};
