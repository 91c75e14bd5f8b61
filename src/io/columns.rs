//! Column selection for export.

use crate::models::{Board, PropertyTemplate, ViewDefinition};

/// Selects the property columns a view exports.
///
/// Columns follow the board's template order, not the view's id order, so a
/// board exports the same column order from every view. Ids that do not
/// resolve to a template of the board are skipped. A calendar view whose date
/// display property is not visible gets that template appended last.
///
/// The synthetic title column is not part of the result.
#[must_use]
pub fn select_columns<'a>(board: &'a Board, view: &ViewDefinition) -> Vec<&'a PropertyTemplate> {
    let mut columns: Vec<&PropertyTemplate> = board
        .card_properties
        .iter()
        .filter(|t| view.visible_property_ids.contains(&t.id))
        .collect();

    if let Some(date_id) = view.calendar_date_property() {
        let already_visible = view.visible_property_ids.iter().any(|id| id == date_id);
        if !already_visible {
            if let Some(template) = board.template(date_id) {
                columns.push(template);
            }
        }
    }

    columns
}
