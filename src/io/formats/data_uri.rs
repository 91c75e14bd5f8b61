//! CSV-in-URI transport.
//!
//! Hosts that download through a link need the CSV as a `data:` URI. The
//! payload is percent-encoded the way `encodeURI` does it, which leaves `#`
//! alone; a raw `#` would start the fragment and truncate the download, so
//! every `#` in any cell becomes `%23` after encoding.

/// Scheme, media type and charset prefix of the URI.
pub const DATA_URI_PREFIX: &str = "data:text/csv;charset=utf-8,";

/// Characters `encodeURI` leaves unescaped besides ASCII alphanumerics.
const URI_KEPT: &str = ";,/?:@&=+$-_.!~*'()#";

/// Percent-encodes text with `encodeURI` semantics.
#[must_use]
pub fn encode_uri(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut buf = [0u8; 4];
    for c in text.chars() {
        if c.is_ascii_alphanumeric() || URI_KEPT.contains(c) {
            out.push(c);
        } else {
            out.push_str(&urlencoding::encode(c.encode_utf8(&mut buf)));
        }
    }
    out
}

/// Builds the data URI for CSV text as written to disk.
#[must_use]
pub fn to_data_uri(csv_text: &str) -> String {
    encode_uri(&format!("{DATA_URI_PREFIX}{csv_text}")).replace('#', "%23")
}
