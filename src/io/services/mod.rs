//! Import and export service implementations.
//!
//! Orchestrates row generation, encoding and record creation.

pub mod export;
pub mod import;

pub use export::{ExportOptions, ExportResult, ExportService, resolve_view};
pub use import::{
    EMPTY_INPUT_WARNING, FailurePolicy, ImportOptions, ImportReport, ImportResult, ImportService,
};
