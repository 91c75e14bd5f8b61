//! Boundaries between the core and its host.
//!
//! The core never owns the record store or the filesystem. Imports create
//! records through a [`MutationBoundary`]; exports hand a finished
//! [`ExportArtifact`] to an [`ArtifactSink`]; import text comes from a
//! [`TextSource`].
//!
//! The traits use native `async fn`; callers hold them through generics.

#![allow(async_fn_in_trait)]

use super::formats::csv::decode_text;
use super::formats::{CSV_EXTENSION, ExportArtifact};
use crate::models::{Record, RecordId};
use crate::{Error, Result};
use std::fmt;
use std::path::PathBuf;

/// Handle of an open undo group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(u64);

impl GroupId {
    /// Creates a group handle.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group-{}", self.0)
    }
}

/// Record creation inside undoable groups.
///
/// An import opens one group, creates its records in file order and then
/// either commits or rolls back the group. Everything created inside a
/// committed group undoes as one unit.
pub trait MutationBoundary {
    /// Opens an undo group.
    async fn begin_group(&mut self, description: &str) -> Result<GroupId>;

    /// Creates one record inside the open group.
    async fn create_record(&mut self, group: GroupId, record: Record) -> Result<RecordId>;

    /// Closes the group, keeping what it created.
    async fn commit_group(&mut self, group: GroupId) -> Result<()>;

    /// Closes the group, discarding what it created.
    async fn rollback_group(&mut self, group: GroupId) -> Result<()>;
}

/// Destination of export artifacts.
pub trait ArtifactSink {
    /// Stores the artifact and returns where it went.
    async fn save(&self, artifact: &ExportArtifact) -> Result<PathBuf>;
}

/// Writes artifacts as `<dir>/<filename>`.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Creates a sink writing into `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ArtifactSink for DirectorySink {
    async fn save(&self, artifact: &ExportArtifact) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| Error::OperationFailed {
                operation: "create_output_dir".to_string(),
                cause: e.to_string(),
            })?;

        let path = self.dir.join(&artifact.filename);
        tokio::fs::write(&path, artifact.bytes())
            .await
            .map_err(|e| Error::OperationFailed {
                operation: "write_export_file".to_string(),
                cause: e.to_string(),
            })?;
        Ok(path)
    }
}

/// Source of import text.
pub trait TextSource {
    /// Reads the whole text.
    async fn read_text(&self) -> Result<String>;

    /// Describes the source for logs and errors.
    fn describe(&self) -> String;
}

/// Reads a `.csv` file from disk.
///
/// Bytes are decoded lossily and a leading byte-order mark is dropped.
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    /// Creates a source for `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn has_csv_extension(&self) -> bool {
        self.path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(CSV_EXTENSION))
    }
}

impl TextSource for CsvFileSource {
    async fn read_text(&self) -> Result<String> {
        if !self.has_csv_extension() {
            return Err(Error::ReadFailure {
                path: self.describe(),
                cause: "not a .csv file".to_string(),
            });
        }
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| Error::ReadFailure {
                path: self.describe(),
                cause: e.to_string(),
            })?;
        Ok(decode_text(&bytes))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory text, for hosts that already hold the file contents.
#[derive(Debug, Clone)]
pub struct StringSource {
    name: String,
    text: String,
}

impl StringSource {
    /// Creates a source named `name` over `text`.
    #[must_use]
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

impl TextSource for StringSource {
    async fn read_text(&self) -> Result<String> {
        Ok(self.text.clone())
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}
