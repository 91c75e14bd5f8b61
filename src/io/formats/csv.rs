//! CSV text encoding and decoding.
//!
//! Export and import are intentionally asymmetric. Export quotes only the
//! title cell and carries `#` in titles as a placeholder token until the rows
//! are written. Import treats `"` as an ordinary character, splits on bare
//! commas and line breaks, then strips every double quote; quoted fields with
//! embedded commas or newlines are not supported.

use crate::{Error, Result};
use std::collections::HashMap;

/// Placeholder standing in for `#` inside escaped titles until the rows are
/// written.
///
/// Restoration only touches title cells, so other cells may contain this text
/// freely. A title that itself contains the token text is written with `#` in
/// its place.
pub const HASH_SIGN_TOKEN: &str = "___hash_sign___";

/// Cell separator.
pub const CELL_SEPARATOR: u8 = b',';

/// UTF-8 byte-order mark some editors put at the start of a file.
const BYTE_ORDER_MARK: char = '\u{feff}';

/// Escapes a title for a quoted cell: doubles `"` and replaces `#` with
/// [`HASH_SIGN_TOKEN`].
#[must_use]
pub fn escape_title(title: &str) -> String {
    title.replace('"', "\"\"").replace('#', HASH_SIGN_TOKEN)
}

/// Escapes a title and wraps it in double quotes.
#[must_use]
pub fn quote_title(title: &str) -> String {
    format!("\"{}\"", escape_title(title))
}

/// Writes rows as CSV text.
///
/// Cells are written as given, separated by a bare comma, and every row,
/// including the last, ends with `\r\n`. Only titles arrive pre-quoted.
///
/// # Errors
///
/// Returns [`Error::OperationFailed`] if the writer rejects a row.
pub fn join_rows(rows: &[Vec<String>]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(CELL_SEPARATOR)
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());

    for row in rows {
        writer.write_record(row).map_err(|e| Error::OperationFailed {
            operation: "write_csv".to_string(),
            cause: e.to_string(),
        })?;
    }

    let bytes = writer.into_inner().map_err(|e| Error::OperationFailed {
        operation: "flush_csv".to_string(),
        cause: e.to_string(),
    })?;
    String::from_utf8(bytes).map_err(|e| Error::OperationFailed {
        operation: "write_csv".to_string(),
        cause: e.to_string(),
    })
}

/// Writes rows as the bytes stored on disk.
///
/// Like [`join_rows`], with the placeholders in every data row's title cell
/// restored to a literal `#`. The header row and other cells are untouched.
///
/// # Errors
///
/// Returns [`Error::OperationFailed`] if the writer rejects a row.
pub fn write_file_text(rows: &[Vec<String>]) -> Result<String> {
    let restored: Vec<Vec<String>> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut row = row.clone();
            if i > 0
                && let Some(title) = row.first_mut()
            {
                *title = restore_hash_signs(title);
            }
            row
        })
        .collect();
    join_rows(&restored)
}

/// Replaces every placeholder with a literal `#`.
#[must_use]
pub fn restore_hash_signs(text: &str) -> String {
    text.replace(HASH_SIGN_TOKEN, "#")
}

/// Reverses [`quote_title`] on a cell taken from exported text.
#[must_use]
pub fn decode_title_cell(cell: &str) -> String {
    let restored = restore_hash_signs(cell);
    let inner = restored
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(&restored);
    inner.replace("\"\"", "\"")
}

/// Decodes file bytes the way browsers read a text file.
///
/// Invalid UTF-8 sequences become U+FFFD and a leading byte-order mark is
/// dropped.
#[must_use]
pub fn decode_text(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(&text).to_string()
}

/// One data line of an imported file, keyed by header name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvRow {
    values: HashMap<String, String>,
}

impl CsvRow {
    /// Returns the value under a header, if the header exists.
    #[must_use]
    pub fn get(&self, header: &str) -> Option<&str> {
        self.values.get(header).map(String::as_str)
    }

    /// Returns the number of distinct headers in the row.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true when the row has no headers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Parsed import file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    /// Header names from the first non-blank line.
    pub headers: Vec<String>,
    /// Data rows in file order.
    pub rows: Vec<CsvRow>,
}

/// Strips every `"` from a raw field and trims it.
fn clean_field(field: &str) -> String {
    field.replace('"', "").trim().to_string()
}

/// Parses import text into a header-keyed table.
///
/// Lines split on `\n` with an optional preceding `\r`; lines that are blank
/// after trimming are dropped. A line shorter than the header maps the missing
/// headers to `""`, surplus fields are ignored, and a repeated header keeps
/// its right-most value. A leading byte-order mark is ignored.
///
/// Returns `Ok(None)` when no non-blank line remains.
///
/// # Errors
///
/// Returns [`Error::OperationFailed`] if the reader rejects a line.
pub fn parse_table(text: &str) -> Result<Option<CsvTable>> {
    let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);
    let lines: Vec<&str> = text.lines().filter(|line| !line.trim().is_empty()).collect();
    if lines.is_empty() {
        return Ok(None);
    }
    let text = lines.join("\n");

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .delimiter(CELL_SEPARATOR)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| Error::OperationFailed {
            operation: "read_csv_headers".to_string(),
            cause: e.to_string(),
        })?
        .iter()
        .map(clean_field)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| Error::OperationFailed {
            operation: "read_csv".to_string(),
            cause: e.to_string(),
        })?;
        let mut row = CsvRow::default();
        for (i, header) in headers.iter().enumerate() {
            let value = record.get(i).map(clean_field).unwrap_or_default();
            row.values.insert(header.clone(), value);
        }
        rows.push(row);
    }

    Ok(Some(CsvTable { headers, rows }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_title_quotes_and_hash() {
        assert_eq!(escape_title("plain"), "plain");
        assert_eq!(escape_title(r#"say "hi""#), r#"say ""hi"""#);
        assert_eq!(escape_title("issue #4"), "issue ___hash_sign___4");
    }

    #[test]
    fn test_quote_title() {
        assert_eq!(quote_title("Fix bug"), "\"Fix bug\"");
        assert_eq!(quote_title(""), "\"\"");
    }

    #[test]
    fn test_join_rows_crlf() {
        let rows = vec![
            vec!["Name".to_string(), "Status".to_string()],
            vec!["\"Fix bug\"".to_string(), "Open".to_string()],
        ];
        assert_eq!(join_rows(&rows).unwrap(), "Name,Status\r\n\"Fix bug\",Open\r\n");
        assert_eq!(join_rows(&[]).unwrap(), "");
    }

    #[test]
    fn test_decode_title_cell_reverses_quoting() {
        let title = r##"A "quoted" #1, really"##;
        let written = restore_hash_signs(&quote_title(title));
        assert_eq!(written, r##""A ""quoted"" #1, really""##);
        assert_eq!(decode_title_cell(&written), title);
    }

    #[test]
    fn test_parse_table_basic() {
        let table = parse_table("Name,Status\r\nTask A,Done\r\nTask B,\r\n").unwrap().unwrap();
        assert_eq!(table.headers, vec!["Name", "Status"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].get("Name"), Some("Task A"));
        assert_eq!(table.rows[0].get("Status"), Some("Done"));
        assert_eq!(table.rows[1].get("Name"), Some("Task B"));
        assert_eq!(table.rows[1].get("Status"), Some(""));
    }

    #[test]
    fn test_parse_table_strips_quotes_and_whitespace() {
        let table = parse_table("\"Name\" , Status\n\"Fix \"\"bug\"\"\",  Open  \n")
            .unwrap()
            .unwrap();
        assert_eq!(table.headers, vec!["Name", "Status"]);
        assert_eq!(table.rows[0].get("Name"), Some("Fix bug"));
        assert_eq!(table.rows[0].get("Status"), Some("Open"));
    }

    #[test]
    fn test_parse_table_skips_blank_lines() {
        let table = parse_table("\n  \r\nName\r\n\r\nOnly\r\n   \n").unwrap().unwrap();
        assert_eq!(table.headers, vec!["Name"]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].get("Name"), Some("Only"));
    }

    #[test]
    fn test_parse_table_short_and_long_rows() {
        let table = parse_table("A,B,C\n1\n1,2,3,4\n").unwrap().unwrap();
        assert_eq!(table.rows[0].get("A"), Some("1"));
        assert_eq!(table.rows[0].get("B"), Some(""));
        assert_eq!(table.rows[0].get("C"), Some(""));
        assert_eq!(table.rows[1].len(), 3);
        assert_eq!(table.rows[1].get("C"), Some("3"));
    }

    #[test]
    fn test_parse_table_duplicate_header_keeps_last() {
        let table = parse_table("Name,Name\nfirst,second\n").unwrap().unwrap();
        assert_eq!(table.rows[0].get("Name"), Some("second"));
    }

    #[test]
    fn test_parse_table_embedded_comma_is_split() {
        // Quoted commas are not supported; the quote is dropped and the field splits.
        let table = parse_table("Name,Status\n\"Hello, world\",Open\n")
            .unwrap()
            .unwrap();
        assert_eq!(table.rows[0].get("Name"), Some("Hello"));
        assert_eq!(table.rows[0].get("Status"), Some("world"));
    }

    #[test]
    fn test_parse_table_empty_input() {
        assert!(parse_table("").unwrap().is_none());
        assert!(parse_table(" \r\n\t\n\n").unwrap().is_none());
        assert!(parse_table("\u{feff}\r\n").unwrap().is_none());
    }

    #[test]
    fn test_parse_table_header_only() {
        let table = parse_table("Name,Status\r\n").unwrap().unwrap();
        assert_eq!(table.headers.len(), 2);
        assert!(table.rows.is_empty());
    }

    #[test]
    fn test_parse_table_ignores_byte_order_mark() {
        let table = parse_table("\u{feff}Name,Status\r\nTask A,Done\r\n")
            .unwrap()
            .unwrap();
        assert_eq!(table.headers, vec!["Name", "Status"]);
        assert_eq!(table.rows[0].get("Name"), Some("Task A"));
    }

    #[test]
    fn test_decode_text_is_lossy_and_drops_bom() {
        assert_eq!(decode_text(b"\xef\xbb\xbfName\n"), "Name\n");
        assert_eq!(decode_text(b"A\xffB"), "A\u{fffd}B");
        assert_eq!(decode_text(b""), "");
    }

    #[test]
    fn test_write_file_text_restores_title_cells_only() {
        let rows = vec![
            vec!["Name".to_string(), "Notes".to_string()],
            vec![quote_title("Bug #7"), format!("see {HASH_SIGN_TOKEN} and #8")],
        ];
        assert_eq!(
            write_file_text(&rows).unwrap(),
            "Name,Notes\r\n\"Bug #7\",see ___hash_sign___ and #8\r\n"
        );
    }

    #[test]
    fn test_join_rows_writes_cells_verbatim() {
        let rows = vec![vec!["\"a \"\"b\"\"\"".to_string(), "x\"y".to_string(), String::new()]];
        assert_eq!(join_rows(&rows).unwrap(), "\"a \"\"b\"\"\",x\"y,\r\n");
    }
}
