//! CSV import/export subsystem.
//!
//! Exports a board view as CSV text and imports CSV files as new cards.
//!
//! # Architecture
//!
//! - **Codecs** render one stored value per property kind ([`CodecRegistry`])
//! - **Columns and rows** turn a view into a table ([`select_columns`], [`RowGenerator`])
//! - **Formats** escape, join and split CSV text and build the data URI
//! - **Services** orchestrate both directions over host-supplied boundaries
//!
//! # Export and import are asymmetric
//!
//! | Direction | Values | Quoting |
//! |-----------|--------|---------|
//! | Export | Type-aware through the codec of each column | Title cell only |
//! | Import | Raw strings, never coerced | Every `"` stripped, commas always split |
//!
//! # Examples
//!
//! ## Export a view
//!
//! ```rust,ignore
//! use boardcsv::io::{DirectorySink, ExportService};
//!
//! let service = ExportService::new(formatter);
//! let result = service
//!     .export_to_sink(&board, Some(&view), &records, &DirectorySink::new("."))
//!     .await?;
//! ```
//!
//! ## Import a file
//!
//! ```rust,ignore
//! use boardcsv::io::{CsvFileSource, ImportService};
//!
//! let report = ImportService::new(formatter)
//!     .run(&board, &CsvFileSource::new("cards.csv"), &mut store)
//!     .await;
//! ```

pub mod codec;
pub mod columns;
pub mod formats;
pub mod formatting;
pub mod rows;
pub mod services;
pub mod traits;

// Re-exports for convenience
pub use codec::{CellContext, CodecRegistry, PropertyCodec, PropertyKind};
pub use columns::select_columns;
pub use formats::ExportArtifact;
pub use formatting::{DefaultFormatter, Formatter, Message};
pub use rows::RowGenerator;
pub use services::export::{ExportOptions, ExportResult, ExportService, resolve_view};
pub use services::import::{
    FailurePolicy, ImportOptions, ImportReport, ImportResult, ImportService,
};
pub use traits::{
    ArtifactSink, CsvFileSource, DirectorySink, GroupId, MutationBoundary, StringSource,
    TextSource,
};
