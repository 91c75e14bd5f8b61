//! JSON board documents.
//!
//! A document holds one board, its views and its cards:
//!
//! ```json
//! {
//!   "board": { "id": "b1", "title": "Sprint", "cardProperties": [] },
//!   "views": [ { "id": "v1", "boardId": "b1", "title": "Table", "viewType": "table" } ],
//!   "records": []
//! }
//! ```

use crate::models::{Board, Record, ViewDefinition};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A board with its views and cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardDocument {
    /// The board.
    pub board: Board,
    /// Views of the board.
    #[serde(default)]
    pub views: Vec<ViewDefinition>,
    /// Cards, in document order.
    #[serde(default)]
    pub records: Vec<Record>,
}

impl BoardDocument {
    /// Creates a document with no views or cards.
    #[must_use]
    pub const fn new(board: Board) -> Self {
        Self {
            board,
            views: Vec::new(),
            records: Vec::new(),
        }
    }

    /// Parses a document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid document.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| Error::InvalidInput(format!("malformed board document: {e}")))
    }

    /// Serializes the document as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::OperationFailed {
            operation: "serialize_document".to_string(),
            cause: e.to_string(),
        })
    }

    /// Loads a document from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub async fn load(path: &Path) -> Result<Self> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Error::ReadFailure {
                path: path.display().to_string(),
                cause: e.to_string(),
            })?;
        Self::from_json(&text)
    }

    /// Writes the document to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let text = self.to_json()?;
        tokio::fs::write(path, text)
            .await
            .map_err(|e| Error::OperationFailed {
                operation: "write_document".to_string(),
                cause: format!("{}: {e}", path.display()),
            })
    }

    /// Looks up a view by id.
    #[must_use]
    pub fn view(&self, id: &str) -> Option<&ViewDefinition> {
        self.views.iter().find(|v| v.id == id)
    }

    /// Returns the cards that belong to the board, in document order.
    #[must_use]
    pub fn records_for_board(&self) -> Vec<Record> {
        self.records
            .iter()
            .filter(|r| r.board_id == self.board.id)
            .cloned()
            .collect()
    }
}
