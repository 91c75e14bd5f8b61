//! Card records and their loosely typed property values.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Unique identifier for a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Creates a record ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh time-ordered ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::now_v7().simple().to_string())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Value stored under a template id.
///
/// Which shape appears depends on the template kind: text-like and select
/// kinds store strings, multi-select stores lists, numbers may be either.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// A single string.
    Text(String),
    /// A list of strings (option ids, user ids).
    List(Vec<String>),
    /// A JSON number.
    Number(f64),
}

impl PropertyValue {
    /// Returns the string form when the value is a single string.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// A card belonging to a board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Unique identifier.
    pub id: RecordId,
    /// Card title.
    #[serde(default)]
    pub title: String,
    /// Owning board.
    pub board_id: String,
    /// Parent block; the board for top-level cards.
    #[serde(default)]
    pub parent_id: String,
    /// User that created the card.
    #[serde(default)]
    pub created_by: String,
    /// User that last modified the card.
    #[serde(default)]
    pub modified_by: String,
    /// Creation time (Unix epoch milliseconds).
    #[serde(default)]
    pub create_at: i64,
    /// Last update time (Unix epoch milliseconds).
    #[serde(default)]
    pub update_at: i64,
    /// Property values keyed by template id. Missing keys are empty cells.
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyValue>,
}

impl Record {
    /// Creates a top-level card on a board with a fresh id and timestamps.
    #[must_use]
    pub fn for_board(board_id: impl Into<String>, title: impl Into<String>) -> Self {
        let board_id = board_id.into();
        let now = crate::current_timestamp_millis();
        Self {
            id: RecordId::generate(),
            title: title.into(),
            parent_id: board_id.clone(),
            board_id,
            created_by: String::new(),
            modified_by: String::new(),
            create_at: now,
            update_at: now,
            properties: BTreeMap::new(),
        }
    }

    /// Sets a property value.
    #[must_use]
    pub fn with_property(
        mut self,
        template_id: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Self {
        self.properties.insert(template_id.into(), value.into());
        self
    }

    /// Sets the creating and modifying users.
    #[must_use]
    pub fn with_authors(
        mut self,
        created_by: impl Into<String>,
        modified_by: impl Into<String>,
    ) -> Self {
        self.created_by = created_by.into();
        self.modified_by = modified_by.into();
        self
    }

    /// Returns the property value for a template.
    #[must_use]
    pub fn property(&self, template_id: &str) -> Option<&PropertyValue> {
        self.properties.get(template_id)
    }

    /// Returns the string property for a template, or `""` when absent.
    #[must_use]
    pub fn property_text(&self, template_id: &str) -> &str {
        self.property(template_id)
            .and_then(PropertyValue::as_text)
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_board_sets_parent() {
        let record = Record::for_board("b1", "Fix bug");
        assert_eq!(record.board_id, "b1");
        assert_eq!(record.parent_id, "b1");
        assert!(record.properties.is_empty());
        assert_ne!(record.id, Record::for_board("b1", "Other").id);
    }

    #[test]
    fn test_property_value_shapes() {
        let json = r#"{
            "id": "c1", "title": "Card", "boardId": "b1",
            "properties": {"p1": "Open", "p2": ["a", "b"], "p3": 4.5}
        }"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(
            record.property("p1"),
            Some(&PropertyValue::Text("Open".into()))
        );
        assert_eq!(
            record.property("p2"),
            Some(&PropertyValue::List(vec!["a".into(), "b".into()]))
        );
        assert_eq!(record.property("p3"), Some(&PropertyValue::Number(4.5)));
        assert_eq!(record.property_text("p2"), "");
        assert_eq!(record.property_text("missing"), "");
    }
}
