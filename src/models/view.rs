//! View definitions.

use serde::{Deserialize, Serialize};

/// Layout kind of a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    /// Kanban columns.
    #[default]
    Board,
    /// Spreadsheet-like table.
    Table,
    /// Card gallery.
    Gallery,
    /// Calendar grouped by a date property.
    Calendar,
    /// Any kind this crate does not know about.
    #[serde(other)]
    Other,
}

/// A named projection of a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewDefinition {
    /// View identifier.
    pub id: String,
    /// Owning board.
    pub board_id: String,
    /// View title; becomes the export filename.
    #[serde(default)]
    pub title: String,
    /// Layout kind.
    #[serde(default)]
    pub view_type: ViewKind,
    /// Template ids shown by the view.
    #[serde(default)]
    pub visible_property_ids: Vec<String>,
    /// Date property used by calendar views for grouping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_display_property_id: Option<String>,
}

impl ViewDefinition {
    /// Creates a view with no visible properties.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        board_id: impl Into<String>,
        title: impl Into<String>,
        view_type: ViewKind,
    ) -> Self {
        Self {
            id: id.into(),
            board_id: board_id.into(),
            title: title.into(),
            view_type,
            visible_property_ids: Vec::new(),
            date_display_property_id: None,
        }
    }

    /// Sets the visible property ids.
    #[must_use]
    pub fn with_visible<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.visible_property_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the date display property.
    #[must_use]
    pub fn with_date_display(mut self, property_id: impl Into<String>) -> Self {
        self.date_display_property_id = Some(property_id.into());
        self
    }

    /// Returns the date display property when this kind honors it.
    #[must_use]
    pub fn calendar_date_property(&self) -> Option<&str> {
        if self.view_type == ViewKind::Calendar {
            self.date_display_property_id
                .as_deref()
                .filter(|id| !id.is_empty())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_view_kind_falls_back() {
        let json = r#"{"id": "v1", "boardId": "b1", "viewType": "timeline"}"#;
        let view: ViewDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(view.view_type, ViewKind::Other);
        assert!(view.visible_property_ids.is_empty());
    }

    #[test]
    fn test_date_property_only_for_calendar() {
        let table = ViewDefinition::new("v1", "b1", "T", ViewKind::Table).with_date_display("p3");
        assert_eq!(table.calendar_date_property(), None);

        let calendar =
            ViewDefinition::new("v2", "b1", "C", ViewKind::Calendar).with_date_display("p3");
        assert_eq!(calendar.calendar_date_property(), Some("p3"));
    }
}
