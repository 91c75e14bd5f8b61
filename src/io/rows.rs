//! Row generation for export.

use super::codec::CodecRegistry;
use super::columns::select_columns;
use super::formats::csv::quote_title;
use super::formatting::Formatter;
use crate::models::{Board, PropertyTemplate, Record, ViewDefinition};

/// Turns records into header and data rows.
///
/// Every row has `1 + columns.len()` cells: the quoted title first, then one
/// codec-rendered cell per column.
pub struct RowGenerator<'a> {
    registry: &'a CodecRegistry,
    formatter: &'a dyn Formatter,
}

impl<'a> RowGenerator<'a> {
    /// Creates a generator over a codec registry and formatter.
    #[must_use]
    pub fn new(registry: &'a CodecRegistry, formatter: &'a dyn Formatter) -> Self {
        Self {
            registry,
            formatter,
        }
    }

    /// Builds the header row.
    #[must_use]
    pub fn header_row(&self, columns: &[&PropertyTemplate]) -> Vec<String> {
        std::iter::once(self.formatter.name_column())
            .chain(columns.iter().map(|t| t.name.clone()))
            .collect()
    }

    /// Builds the data row of one record.
    #[must_use]
    pub fn data_row(&self, record: &Record, columns: &[&PropertyTemplate]) -> Vec<String> {
        std::iter::once(quote_title(&record.title))
            .chain(
                columns
                    .iter()
                    .map(|t| self.registry.export_cell(record, t, self.formatter)),
            )
            .collect()
    }

    /// Builds the header and one data row per record, in caller order.
    #[must_use]
    pub fn generate(
        &self,
        board: &Board,
        view: &ViewDefinition,
        records: &[Record],
    ) -> Vec<Vec<String>> {
        let columns = select_columns(board, view);
        let mut rows = Vec::with_capacity(records.len() + 1);
        rows.push(self.header_row(&columns));
        rows.extend(records.iter().map(|r| self.data_row(r, &columns)));
        rows
    }
}
