//! # Boardcsv
//!
//! Typed CSV export and import for board cards.
//!
//! A board owns an ordered list of property templates; each card stores a
//! loosely typed value per template. Boardcsv turns a view of a board into a
//! CSV artifact (type-aware, one codec per property kind) and turns a CSV file
//! back into new cards through an explicit mutation boundary.
//!
//! ## Features
//!
//! - Closed set of property kinds with an explicit codec table
//! - Column selection that keeps board order stable across views
//! - Data-URI transport encoding with deferred `#` escaping
//! - Import grouped into a single undoable unit
//!
//! ## Example
//!
//! ```rust,ignore
//! use boardcsv::io::{ExportService, ImportService};
//! use boardcsv::storage::MemoryRecordStore;
//!
//! let export = ExportService::new(formatter.clone());
//! let artifact = export.build(&board, Some(&view), &records)?;
//!
//! let mut store = MemoryRecordStore::new();
//! let result = ImportService::new(formatter).import_text(&board, &text, &mut store).await?;
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod config;
pub mod io;
pub mod models;
pub mod observability;
pub mod storage;

// Re-exports for convenience
pub use config::BoardCsvConfig;
pub use io::{
    CodecRegistry, DefaultFormatter, ExportArtifact, ExportService, Formatter, ImportResult,
    ImportService, MutationBoundary, PropertyKind,
};
pub use models::{Board, PropertyTemplate, PropertyValue, Record, RecordId, ViewDefinition, ViewKind};
pub use storage::{BoardDocument, MemoryRecordStore};

/// Error type for boardcsv operations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Unknown view id, malformed board document |
/// | `OperationFailed` | Filesystem writes, config parsing, logging setup |
/// | `ReadFailure` | Import file missing, unreadable or not a `.csv` |
/// | `CreationRejected` | The mutation boundary refused a record during import |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// An import source could not be read.
    #[error("cannot read '{path}': {cause}")]
    ReadFailure {
        /// Path (or description) of the source.
        path: String,
        /// The underlying cause.
        cause: String,
    },

    /// Record creation was rejected part way through an import.
    ///
    /// Records created before `row` stay created unless the import ran with
    /// the rollback policy.
    #[error("record for row {row} rejected after {created} created: {cause}")]
    CreationRejected {
        /// 1-indexed data row that failed.
        row: usize,
        /// Records created before the failure.
        created: usize,
        /// The underlying cause.
        cause: String,
    },
}

/// Result type alias for boardcsv operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Returns the current Unix timestamp in milliseconds.
///
/// Falls back to 0 if the system clock is before the Unix epoch.
#[must_use]
pub fn current_timestamp_millis() -> i64 {
    chrono::Utc::now().timestamp_millis().max(0)
}
