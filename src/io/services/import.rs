//! CSV import service.
//!
//! Turns a CSV file into new cards on a board. Values are assigned as raw
//! strings; no type coercion happens on the way in. All cards of one file are
//! created inside a single undo group.

use crate::config::ImportSettings;
use crate::io::formats::csv::{CsvRow, parse_table};
use crate::io::formatting::{Formatter, Message};
use crate::io::traits::{GroupId, MutationBoundary, TextSource};
use crate::models::{Board, PropertyValue, Record, RecordId};
use crate::{Error, Result};
use std::sync::Arc;
use tracing::instrument;

/// Warning recorded when the input holds no non-blank line.
pub const EMPTY_INPUT_WARNING: &str = "CSV file is empty";

/// What happens to already created records when a creation fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Commit the group; records created before the failure stay.
    #[default]
    KeepCreated,
    /// Roll the group back; nothing from the file stays.
    RollBack,
}

/// Options for import.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Header whose value becomes the card title.
    pub name_column: String,
    /// Title for rows without a name.
    pub fallback_title: String,
    /// Behavior on a rejected creation.
    pub failure_policy: FailurePolicy,
    /// Description of the undo group.
    pub group_description: String,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            name_column: "Name".to_string(),
            fallback_title: "Untitled".to_string(),
            failure_policy: FailurePolicy::KeepCreated,
            group_description: "Import CSV".to_string(),
        }
    }
}

impl ImportOptions {
    /// Creates options from the import settings.
    #[must_use]
    pub fn from_settings(settings: &ImportSettings) -> Self {
        Self {
            name_column: settings.name_column.clone(),
            fallback_title: settings.fallback_title.clone(),
            failure_policy: if settings.rollback_on_failure {
                FailurePolicy::RollBack
            } else {
                FailurePolicy::KeepCreated
            },
            ..Self::default()
        }
    }

    /// Sets the title column header.
    #[must_use]
    pub fn with_name_column(mut self, header: impl Into<String>) -> Self {
        self.name_column = header.into();
        self
    }

    /// Sets the fallback title.
    #[must_use]
    pub fn with_fallback_title(mut self, title: impl Into<String>) -> Self {
        self.fallback_title = title.into();
        self
    }

    /// Sets the failure policy.
    #[must_use]
    pub const fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }
}

/// Result of an import.
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    /// Ids of created records, in file order.
    pub created: Vec<RecordId>,
    /// Data rows found in the file.
    pub total_rows: usize,
    /// Non-fatal problems.
    pub warnings: Vec<String>,
}

impl ImportResult {
    /// Returns the number of created records.
    #[must_use]
    pub fn imported(&self) -> usize {
        self.created.len()
    }

    /// Returns whether any records were created.
    #[must_use]
    pub fn has_imports(&self) -> bool {
        !self.created.is_empty()
    }

    /// Returns whether the input held no non-blank line.
    #[must_use]
    pub fn is_empty_input(&self) -> bool {
        self.total_rows == 0 && self.warnings.iter().any(|w| w == EMPTY_INPUT_WARNING)
    }
}

/// Outcome of [`ImportService::run`], with the message to show the user.
#[derive(Debug)]
pub struct ImportReport {
    /// The import result or the error that aborted it.
    pub outcome: Result<ImportResult>,
    /// Completion or failure message; `None` for empty input.
    pub message: Option<String>,
}

impl ImportReport {
    /// Returns whether the import finished without error.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Service for importing CSV files as cards.
pub struct ImportService {
    formatter: Arc<dyn Formatter>,
    options: ImportOptions,
}

impl ImportService {
    /// Creates an import service with default options.
    #[must_use]
    pub fn new(formatter: Arc<dyn Formatter>) -> Self {
        Self {
            formatter,
            options: ImportOptions::default(),
        }
    }

    /// Sets the import options.
    #[must_use]
    pub fn with_options(mut self, options: ImportOptions) -> Self {
        self.options = options;
        self
    }

    /// Builds the card for one parsed row.
    ///
    /// Headers are matched against template names. Only non-empty values
    /// are stored, so an empty cell leaves the property absent.
    #[must_use]
    pub fn build_record(&self, board: &Board, row: &CsvRow) -> Record {
        let title = row
            .get(&self.options.name_column)
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(self.options.fallback_title.as_str());

        let mut record = Record::for_board(board.id.clone(), title);
        for template in &board.card_properties {
            if let Some(value) = row.get(&template.name).filter(|v| !v.is_empty()) {
                record
                    .properties
                    .insert(template.id.clone(), PropertyValue::from(value));
            }
        }
        record
    }

    /// Imports CSV text into `store`.
    ///
    /// Empty input creates nothing, opens no group and yields a warning.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CreationRejected`] when the store refuses a record,
    /// even if closing the group afterwards also fails. Returns the store's
    /// error when the group cannot be opened or committed after a clean run.
    #[instrument(skip(self, board, text, store), fields(board_id = %board.id))]
    pub async fn import_text<M: MutationBoundary>(
        &self,
        board: &Board,
        text: &str,
        store: &mut M,
    ) -> Result<ImportResult> {
        let mut result = ImportResult::default();

        let Some(table) = parse_table(text)? else {
            tracing::warn!("{EMPTY_INPUT_WARNING}");
            result.warnings.push(EMPTY_INPUT_WARNING.to_string());
            return Ok(result);
        };
        result.total_rows = table.rows.len();

        for header in &table.headers {
            let known = header == &self.options.name_column
                || board.card_properties.iter().any(|t| &t.name == header);
            if !known {
                result
                    .warnings
                    .push(format!("Column '{header}' matches no property and was ignored"));
            }
        }

        let group = store.begin_group(&self.options.group_description).await?;

        for (index, row) in table.rows.iter().enumerate() {
            let record = self.build_record(board, row);
            match store.create_record(group, record).await {
                Ok(id) => {
                    tracing::debug!(row = index + 1, record_id = %id, "Created record");
                    result.created.push(id);
                },
                Err(e) => {
                    if let Err(close) = self.close_failed_group(store, group).await {
                        tracing::error!(
                            error = %close,
                            group = %group,
                            "Failed to close import group after a rejected record"
                        );
                    }
                    return Err(Error::CreationRejected {
                        row: index + 1,
                        created: result.created.len(),
                        cause: e.to_string(),
                    });
                },
            }
        }

        store.commit_group(group).await?;
        tracing::info!(
            imported = result.created.len(),
            rows = result.total_rows,
            "Imported CSV"
        );
        Ok(result)
    }

    async fn close_failed_group<M: MutationBoundary>(
        &self,
        store: &mut M,
        group: GroupId,
    ) -> Result<()> {
        match self.options.failure_policy {
            FailurePolicy::KeepCreated => store.commit_group(group).await,
            FailurePolicy::RollBack => store.rollback_group(group).await,
        }
    }

    /// Reads `source` and imports its text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReadFailure`] when the source cannot be read, or any
    /// error of [`Self::import_text`].
    pub async fn import_from_source<M: MutationBoundary, S: TextSource>(
        &self,
        board: &Board,
        source: &S,
        store: &mut M,
    ) -> Result<ImportResult> {
        let text = source.read_text().await?;
        tracing::debug!(source = %source.describe(), bytes = text.len(), "Read import file");
        self.import_text(board, &text, store).await
    }

    /// Runs a whole import and picks the message for the user.
    ///
    /// Errors are logged here and carried in the report instead of being
    /// returned.
    pub async fn run<M: MutationBoundary, S: TextSource>(
        &self,
        board: &Board,
        source: &S,
        store: &mut M,
    ) -> ImportReport {
        match self.import_from_source(board, source, store).await {
            Ok(result) if result.is_empty_input() => ImportReport {
                outcome: Ok(result),
                message: None,
            },
            Ok(result) => ImportReport {
                outcome: Ok(result),
                message: Some(self.formatter.message(Message::ImportComplete)),
            },
            Err(e) => {
                tracing::error!(error = %e, source = %source.describe(), "CSV import failed");
                ImportReport {
                    outcome: Err(e),
                    message: Some(self.formatter.message(Message::ImportFailed)),
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::formatting::DefaultFormatter;
    use crate::io::traits::StringSource;
    use crate::models::PropertyTemplate;
    use crate::storage::MemoryRecordStore;

    fn service() -> ImportService {
        ImportService::new(Arc::new(DefaultFormatter::new()))
    }

    fn board() -> Board {
        Board::new("b1", "Sprint").with_property(PropertyTemplate::new("p1", "Status", "select"))
    }

    /// Store that rejects the n-th creation (1-indexed).
    struct FlakyStore {
        inner: MemoryRecordStore,
        fail_at: usize,
        attempts: usize,
        fail_close: bool,
    }

    impl MutationBoundary for FlakyStore {
        async fn begin_group(&mut self, description: &str) -> Result<GroupId> {
            self.inner.begin_group(description).await
        }

        async fn create_record(&mut self, group: GroupId, record: Record) -> Result<RecordId> {
            self.attempts += 1;
            if self.attempts == self.fail_at {
                return Err(Error::OperationFailed {
                    operation: "insert_block".to_string(),
                    cause: "offline".to_string(),
                });
            }
            self.inner.create_record(group, record).await
        }

        async fn commit_group(&mut self, group: GroupId) -> Result<()> {
            if self.fail_close {
                return Err(Error::OperationFailed {
                    operation: "commit_group".to_string(),
                    cause: "connection lost".to_string(),
                });
            }
            self.inner.commit_group(group).await
        }

        async fn rollback_group(&mut self, group: GroupId) -> Result<()> {
            if self.fail_close {
                return Err(Error::OperationFailed {
                    operation: "rollback_group".to_string(),
                    cause: "connection lost".to_string(),
                });
            }
            self.inner.rollback_group(group).await
        }
    }

    #[tokio::test]
    async fn test_import_scenario() {
        let mut store = MemoryRecordStore::new();
        let result = service()
            .import_text(&board(), "Name,Status\r\nTask A,Done\r\nTask B,\r\n", &mut store)
            .await
            .unwrap();

        assert_eq!(result.imported(), 2);
        let records = store.records();
        assert_eq!(records[0].title, "Task A");
        assert_eq!(records[0].property_text("p1"), "Done");
        assert_eq!(records[1].title, "Task B");
        assert_eq!(records[1].property_text("p1"), "");
        assert!(records[1].property("p1").is_none());
        assert_eq!(records[0].board_id, "b1");
        assert_eq!(records[0].parent_id, "b1");
    }

    #[tokio::test]
    async fn test_import_empty_input() {
        let mut store = MemoryRecordStore::new();
        let result = service()
            .import_text(&board(), "  \r\n\n", &mut store)
            .await
            .unwrap();
        assert_eq!(result.imported(), 0);
        assert_eq!(result.warnings, vec![EMPTY_INPUT_WARNING.to_string()]);
        assert!(!store.can_undo());
    }

    #[tokio::test]
    async fn test_missing_name_uses_fallback() {
        let mut store = MemoryRecordStore::new();
        service()
            .import_text(&board(), "Status,Name\nOpen,\nDone,  \n", &mut store)
            .await
            .unwrap();
        assert!(store.records().iter().all(|r| r.title == "Untitled"));
    }

    #[tokio::test]
    async fn test_custom_name_column() {
        let mut store = MemoryRecordStore::new();
        let service =
            service().with_options(ImportOptions::default().with_name_column("Titre"));
        service
            .import_text(&board(), "Titre\nBonjour\n", &mut store)
            .await
            .unwrap();
        assert_eq!(store.records()[0].title, "Bonjour");
    }

    #[tokio::test]
    async fn test_unknown_columns_warn() {
        let mut store = MemoryRecordStore::new();
        let result = service()
            .import_text(&board(), "Name,Priority\nA,High\n", &mut store)
            .await
            .unwrap();
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("Priority"));
        assert!(store.records()[0].properties.is_empty());
    }

    #[tokio::test]
    async fn test_values_are_not_coerced() {
        let mut store = MemoryRecordStore::new();
        service()
            .import_text(&board(), "Name,Status\nA,not-an-option-id\n", &mut store)
            .await
            .unwrap();
        assert_eq!(store.records()[0].property_text("p1"), "not-an-option-id");
    }

    #[tokio::test]
    async fn test_import_is_one_undo_group() {
        let mut store = MemoryRecordStore::new();
        service()
            .import_text(&board(), "Name\nA\nB\nC\n", &mut store)
            .await
            .unwrap();
        assert_eq!(store.records().len(), 3);
        store.undo().unwrap();
        assert!(store.records().is_empty());
    }

    #[tokio::test]
    async fn test_failure_keeps_created_by_default() {
        let mut store = FlakyStore {
            inner: MemoryRecordStore::new(),
            fail_at: 3,
            attempts: 0,
            fail_close: false,
        };
        let err = service()
            .import_text(&board(), "Name\nA\nB\nC\nD\n", &mut store)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::CreationRejected { row: 3, created: 2, .. }));
        let titles: Vec<_> = store.inner.records().iter().map(|r| r.title.clone()).collect();
        assert_eq!(titles, vec!["A", "B"]);
        assert!(store.inner.can_undo());
    }

    #[tokio::test]
    async fn test_failure_rolls_back_when_asked() {
        let mut store = FlakyStore {
            inner: MemoryRecordStore::new(),
            fail_at: 2,
            attempts: 0,
            fail_close: false,
        };
        let service = service().with_options(
            ImportOptions::default().with_failure_policy(FailurePolicy::RollBack),
        );
        let err = service
            .import_text(&board(), "Name\nA\nB\n", &mut store)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::CreationRejected { row: 2, created: 1, .. }));
        assert!(store.inner.records().is_empty());
        assert!(!store.inner.can_undo());
    }

    #[tokio::test]
    async fn test_run_reports_messages() {
        let mut store = MemoryRecordStore::new();
        let source = StringSource::new("inline", "Name\nA\n");
        let report = service().run(&board(), &source, &mut store).await;
        assert!(report.is_success());
        assert_eq!(report.message.as_deref(), Some("Import complete!"));

        let mut flaky = FlakyStore {
            inner: MemoryRecordStore::new(),
            fail_at: 1,
            attempts: 0,
            fail_close: false,
        };
        let report = service().run(&board(), &source, &mut flaky).await;
        assert!(!report.is_success());
        assert_eq!(report.message.as_deref(), Some("Import failed!"));
    }

    #[tokio::test]
    async fn test_run_empty_input_has_no_message() {
        let mut store = MemoryRecordStore::new();
        let source = StringSource::new("inline", "");
        let report = service().run(&board(), &source, &mut store).await;
        assert!(report.is_success());
        assert!(report.message.is_none());
    }

    #[tokio::test]
    async fn test_rejection_survives_failed_close() {
        for policy in [FailurePolicy::KeepCreated, FailurePolicy::RollBack] {
            let mut store = FlakyStore {
                inner: MemoryRecordStore::new(),
                fail_at: 2,
                attempts: 0,
                fail_close: true,
            };
            let service =
                service().with_options(ImportOptions::default().with_failure_policy(policy));
            let err = service
                .import_text(&board(), "Name\nA\nB\n", &mut store)
                .await
                .unwrap_err();

            assert!(matches!(err, Error::CreationRejected { row: 2, created: 1, .. }));
        }
    }

    #[tokio::test]
    async fn test_import_bom_prefixed_text() {
        let mut store = MemoryRecordStore::new();
        let result = service()
            .import_text(&board(), "\u{feff}Name,Status\r\nTask A,Done\r\n", &mut store)
            .await
            .unwrap();

        assert!(result.warnings.is_empty());
        assert_eq!(store.records()[0].title, "Task A");
        assert_eq!(store.records()[0].property_text("p1"), "Done");
    }
}
