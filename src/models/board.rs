//! Board and property template types.

use serde::{Deserialize, Serialize};

/// A selectable option of a select or multi-select template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyOption {
    /// Option identifier stored in card properties.
    pub id: String,
    /// Display label.
    pub value: String,
    /// UI color name.
    #[serde(default)]
    pub color: String,
}

impl PropertyOption {
    /// Creates an option with no color.
    #[must_use]
    pub fn new(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
            color: String::new(),
        }
    }
}

/// Schema entry of a board: one property every card may carry.
///
/// The type tag is kept as the raw string so that templates with kinds this
/// crate does not know still load; they export as empty cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyTemplate {
    /// Identifier, unique within the board.
    pub id: String,
    /// Display name, used as the CSV header.
    pub name: String,
    /// Raw type tag (`text`, `select`, `createdBy`, ...).
    #[serde(rename = "type")]
    pub property_type: String,
    /// Options for select-like kinds.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<PropertyOption>,
}

impl PropertyTemplate {
    /// Creates a template without options.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        property_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            property_type: property_type.into(),
            options: Vec::new(),
        }
    }

    /// Adds a select option.
    #[must_use]
    pub fn with_option(mut self, id: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.push(PropertyOption::new(id, value));
        self
    }

    /// Resolves an option id to its label.
    #[must_use]
    pub fn option_label(&self, option_id: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.id == option_id)
            .map(|o| o.value.as_str())
    }
}

/// A named collection of cards sharing one property schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    /// Board identifier.
    pub id: String,
    /// Board title.
    #[serde(default)]
    pub title: String,
    /// Ordered property templates; this order is the default column order.
    #[serde(default)]
    pub card_properties: Vec<PropertyTemplate>,
}

impl Board {
    /// Creates an empty board.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            card_properties: Vec::new(),
        }
    }

    /// Appends a property template.
    #[must_use]
    pub fn with_property(mut self, template: PropertyTemplate) -> Self {
        self.card_properties.push(template);
        self
    }

    /// Looks up a template by id.
    #[must_use]
    pub fn template(&self, id: &str) -> Option<&PropertyTemplate> {
        self.card_properties.iter().find(|t| t.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_deserializes_camel_case() {
        let json = r#"{
            "id": "b1",
            "title": "Sprint",
            "cardProperties": [
                {"id": "p1", "name": "Status", "type": "select",
                 "options": [{"id": "o1", "value": "Open", "color": "propColorRed"}]},
                {"id": "p2", "name": "Owner", "type": "person"}
            ]
        }"#;

        let board: Board = serde_json::from_str(json).unwrap();
        assert_eq!(board.card_properties.len(), 2);
        assert_eq!(board.card_properties[0].property_type, "select");
        assert_eq!(board.card_properties[0].option_label("o1"), Some("Open"));
        assert!(board.card_properties[1].options.is_empty());
    }

    #[test]
    fn test_unknown_type_tag_still_loads() {
        let json = r#"{"id": "p9", "name": "Rating", "type": "stars"}"#;
        let template: PropertyTemplate = serde_json::from_str(json).unwrap();
        assert_eq!(template.property_type, "stars");
    }

    #[test]
    fn test_template_lookup() {
        let board = Board::new("b1", "Sprint")
            .with_property(PropertyTemplate::new("p1", "Status", "text"));
        assert!(board.template("p1").is_some());
        assert!(board.template("missing").is_none());
    }
}
