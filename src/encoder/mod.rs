//! RFC4180-style CSV field encoding.
//!
//! Standard quoting with one addition: a leading or trailing space forces
//! quoting even without an embedded delimiter, so downstream consumers that
//! trim unquoted fields cannot silently alter the value.

use std::borrow::Cow;

use crate::schema::HEADER_COLUMNS;

/// Encode one field for CSV output.
///
/// Empty input stays empty (no quotes). When quoting is needed, internal
/// double quotes are doubled and the field is wrapped in double quotes.
pub fn encode_field(field: &str) -> Cow<'_, str> {
    if field.is_empty() {
        return Cow::Borrowed("");
    }

    let must_quote = field.contains(['"', ',', '\r', '\n'])
        || field.starts_with(' ')
        || field.ends_with(' ');
    if !must_quote {
        return Cow::Borrowed(field);
    }

    let mut quoted = String::with_capacity(field.len() + 2);
    quoted.push('"');
    for c in field.chars() {
        if c == '"' {
            quoted.push('"');
        }
        quoted.push(c);
    }
    quoted.push('"');
    Cow::Owned(quoted)
}

/// The comma-joined header row, each column name individually encoded.
pub fn header_line() -> String {
    let mut line = String::new();
    for (i, column) in HEADER_COLUMNS.iter().enumerate() {
        if i > 0 {
            line.push(',');
        }
        line.push_str(&encode_field(column));
    }
    line
}
