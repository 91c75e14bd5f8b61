//! Text encoding of exported tables.
//!
//! [`csv`] holds the cell escaping, the row writer and the naive import reader,
//! [`data_uri`] the link transport. [`ExportArtifact`] bundles the three
//! outputs of one export: file name, file bytes and data URI.

pub mod csv;
pub mod data_uri;

use crate::Result;
use serde::Serialize;

/// Characters that may not appear in an exported file name.
const FILENAME_RESERVED: &[char] = &['/', '\\', '?', '%', '*', ':', '|', '"', '<', '>'];

/// Extension of exported files.
pub const CSV_EXTENSION: &str = "csv";

/// Replaces reserved and control characters with `-` and trims the result.
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if FILENAME_RESERVED.contains(&c) || c.is_control() {
                '-'
            } else {
                c
            }
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Builds the `.csv` file name for a view title.
///
/// Blank titles fall back to `fallback`.
#[must_use]
pub fn export_filename(title: &str, fallback: &str) -> String {
    let stem = sanitize_filename(title);
    let stem = if stem.is_empty() {
        sanitize_filename(fallback)
    } else {
        stem
    };
    format!("{stem}.{CSV_EXTENSION}")
}

/// One exported table, ready for a sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportArtifact {
    /// File name derived from the view title.
    pub filename: String,
    /// CSV text with literal `#` characters.
    pub contents: String,
    /// `data:` URI carrying the same table.
    pub data_uri: String,
    /// Number of data rows, header excluded.
    pub row_count: usize,
}

impl ExportArtifact {
    /// Encodes generated rows into an artifact.
    ///
    /// `rows` is the header row followed by data rows whose title cells still
    /// carry hash placeholders.
    ///
    /// # Errors
    ///
    /// Returns an error if the rows cannot be written.
    pub fn from_rows(
        view_title: &str,
        rows: &[Vec<String>],
        fallback_title: &str,
    ) -> Result<Self> {
        let contents = csv::write_file_text(rows)?;
        Ok(Self {
            filename: export_filename(view_title, fallback_title),
            data_uri: data_uri::to_data_uri(&contents),
            contents,
            row_count: rows.len().saturating_sub(1),
        })
    }

    /// Returns the bytes written to disk.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        self.contents.as_bytes()
    }
}
