//! In-memory record store with grouped undo.

use crate::io::traits::{GroupId, MutationBoundary};
use crate::models::{Record, RecordId};
use crate::{Error, Result};

/// Maximum number of undo entries to keep.
pub const MAX_UNDO_STACK: usize = 100;

/// Records created by one committed group.
#[derive(Debug, Clone)]
struct UndoEntry {
    description: String,
    records: Vec<Record>,
}

/// Group currently accepting records.
#[derive(Debug)]
struct OpenGroup {
    id: GroupId,
    description: String,
    created: Vec<RecordId>,
}

/// Record store kept in memory.
///
/// Each committed group becomes one undo entry; undoing it removes every
/// record the group created, redoing puts them back. A new commit clears the
/// redo stack.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: Vec<Record>,
    open: Option<OpenGroup>,
    next_group: u64,
    undo_stack: Vec<UndoEntry>,
    redo_stack: Vec<UndoEntry>,
}

impl MemoryRecordStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding existing records, with empty history.
    #[must_use]
    pub fn with_records(records: Vec<Record>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    /// Returns all records in creation order.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Consumes the store, returning its records.
    #[must_use]
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// Returns whether there is a group to undo.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns whether there is a group to redo.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Returns the description of the next group to undo.
    #[must_use]
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.last().map(|e| e.description.as_str())
    }

    /// Removes every record of the most recent committed group.
    ///
    /// # Errors
    ///
    /// Returns an error when there is nothing to undo or a group is open.
    pub fn undo(&mut self) -> Result<()> {
        self.ensure_closed("undo")?;
        let entry = self.undo_stack.pop().ok_or_else(|| Error::OperationFailed {
            operation: "undo".to_string(),
            cause: "nothing to undo".to_string(),
        })?;

        self.records
            .retain(|r| !entry.records.iter().any(|created| created.id == r.id));
        tracing::debug!(
            group = %entry.description,
            records = entry.records.len(),
            "Undid group"
        );
        self.redo_stack.push(entry);
        Ok(())
    }

    /// Restores the most recently undone group.
    ///
    /// # Errors
    ///
    /// Returns an error when there is nothing to redo or a group is open.
    pub fn redo(&mut self) -> Result<()> {
        self.ensure_closed("redo")?;
        let entry = self.redo_stack.pop().ok_or_else(|| Error::OperationFailed {
            operation: "redo".to_string(),
            cause: "nothing to redo".to_string(),
        })?;

        self.records.extend(entry.records.iter().cloned());
        tracing::debug!(
            group = %entry.description,
            records = entry.records.len(),
            "Redid group"
        );
        self.undo_stack.push(entry);
        Ok(())
    }

    fn ensure_closed(&self, operation: &str) -> Result<()> {
        match &self.open {
            Some(group) => Err(Error::OperationFailed {
                operation: operation.to_string(),
                cause: format!("{} is still open", group.id),
            }),
            None => Ok(()),
        }
    }

    fn take_open(&mut self, group: GroupId, operation: &str) -> Result<OpenGroup> {
        match self.open.take() {
            Some(open) if open.id == group => Ok(open),
            other => {
                self.open = other;
                Err(Error::OperationFailed {
                    operation: operation.to_string(),
                    cause: format!("{group} is not the open group"),
                })
            },
        }
    }

    fn push_undo(&mut self, entry: UndoEntry) {
        if entry.records.is_empty() {
            return;
        }
        self.undo_stack.push(entry);
        self.redo_stack.clear();
        if self.undo_stack.len() > MAX_UNDO_STACK {
            self.undo_stack.remove(0);
        }
    }
}

impl MutationBoundary for MemoryRecordStore {
    async fn begin_group(&mut self, description: &str) -> Result<GroupId> {
        self.ensure_closed("begin_group")?;
        self.next_group += 1;
        let id = GroupId::new(self.next_group);
        self.open = Some(OpenGroup {
            id,
            description: description.to_string(),
            created: Vec::new(),
        });
        Ok(id)
    }

    async fn create_record(&mut self, group: GroupId, record: Record) -> Result<RecordId> {
        let matches_open = self.open.as_ref().is_some_and(|g| g.id == group);
        if !matches_open {
            return Err(Error::OperationFailed {
                operation: "create_record".to_string(),
                cause: format!("{group} is not the open group"),
            });
        }
        if self.records.iter().any(|r| r.id == record.id) {
            return Err(Error::OperationFailed {
                operation: "create_record".to_string(),
                cause: format!("record {} already exists", record.id),
            });
        }

        let id = record.id.clone();
        self.records.push(record);
        if let Some(open) = self.open.as_mut() {
            open.created.push(id.clone());
        }
        Ok(id)
    }

    async fn commit_group(&mut self, group: GroupId) -> Result<()> {
        let open = self.take_open(group, "commit_group")?;
        let records = self
            .records
            .iter()
            .filter(|r| open.created.contains(&r.id))
            .cloned()
            .collect();
        self.push_undo(UndoEntry {
            description: open.description,
            records,
        });
        Ok(())
    }

    async fn rollback_group(&mut self, group: GroupId) -> Result<()> {
        let open = self.take_open(group, "rollback_group")?;
        self.records.retain(|r| !open.created.contains(&r.id));
        tracing::debug!(
            group = %open.description,
            discarded = open.created.len(),
            "Rolled back group"
        );
        Ok(())
    }
}
