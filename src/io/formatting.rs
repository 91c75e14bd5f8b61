//! Locale hook for user-facing text.
//!
//! Cell rendering for dates and numbers, the localized name of the title
//! column, and the two messages shown after an import all go through a
//! [`Formatter`], so hosts can plug in their own localization.

use crate::config::{ExportSettings, ImportSettings};
use chrono::DateTime;
use std::fmt::Write;

/// Fixed user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Message {
    /// Shown after an import finished.
    ImportComplete,
    /// Shown after an import was aborted by an error.
    ImportFailed,
}

/// Locale-aware text formatting.
pub trait Formatter: Send + Sync {
    /// Header label of the synthetic title column.
    fn name_column(&self) -> String {
        "Name".to_string()
    }

    /// Formats a Unix timestamp in milliseconds.
    fn format_date(&self, millis: i64) -> String;

    /// Formats a numeric property value.
    fn format_number(&self, value: f64) -> String;

    /// Returns the text for a fixed message.
    fn message(&self, message: Message) -> String;
}

/// Formatter driven by configuration, using `chrono` patterns for dates.
#[derive(Debug, Clone)]
pub struct DefaultFormatter {
    name_column: String,
    date_format: String,
    complete_message: String,
    failed_message: String,
}

impl Default for DefaultFormatter {
    fn default() -> Self {
        Self {
            name_column: "Name".to_string(),
            date_format: "%Y-%m-%d".to_string(),
            complete_message: "Import complete!".to_string(),
            failed_message: "Import failed!".to_string(),
        }
    }
}

impl DefaultFormatter {
    /// Creates a formatter with default labels and ISO dates.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a formatter from the export and import settings.
    #[must_use]
    pub fn from_settings(export: &ExportSettings, import: &ImportSettings) -> Self {
        Self {
            name_column: export.name_column_label.clone(),
            date_format: export.date_format.clone(),
            complete_message: import.complete_message.clone(),
            failed_message: import.failed_message.clone(),
        }
    }

    /// Sets the `chrono` date pattern.
    #[must_use]
    pub fn with_date_format(mut self, pattern: impl Into<String>) -> Self {
        self.date_format = pattern.into();
        self
    }

    /// Sets the title column label.
    #[must_use]
    pub fn with_name_column(mut self, label: impl Into<String>) -> Self {
        self.name_column = label.into();
        self
    }
}

impl Formatter for DefaultFormatter {
    fn name_column(&self) -> String {
        self.name_column.clone()
    }

    fn format_date(&self, millis: i64) -> String {
        let Some(dt) = DateTime::from_timestamp_millis(millis) else {
            return String::new();
        };
        // An invalid pattern surfaces as a fmt error; render it as an empty cell.
        let mut out = String::new();
        if write!(out, "{}", dt.format(&self.date_format)).is_err() {
            return String::new();
        }
        out
    }

    fn format_number(&self, value: f64) -> String {
        // f64 Display already drops the fraction for whole numbers ("3", not "3.0").
        value.to_string()
    }

    fn message(&self, message: Message) -> String {
        match message {
            Message::ImportComplete => self.complete_message.clone(),
            Message::ImportFailed => self.failed_message.clone(),
        }
    }
}
