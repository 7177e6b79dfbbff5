//! TNT export line parser with encoding auto-detection.
//!
//! Each input line is `segment0;auxiliary;payload` where the payload is an
//! optionally quote-wrapped JSON document. Parsing flattens the immediate
//! properties of the payload's `receiver` object into a case-insensitive
//! attribute map. A line that carries no usable payload still produces a
//! [`Record`]; one corrupt line never fails the batch.

use serde::Serialize;
use std::collections::HashMap;

use crate::error::{InputError, InputResult};

/// What happened to the embedded JSON payload of a record.
///
/// `Missing` and `Invalid` behave identically downstream (empty attribute
/// map); they are kept apart so the pipeline can report parse failures
/// without changing per-record control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadOutcome {
    /// A `receiver` object was found and flattened.
    Mapped,
    /// The payload parsed but had no object-valued `receiver` property,
    /// or the line carried no payload at all.
    Missing,
    /// The payload was present but not valid JSON.
    Invalid,
}

/// One parsed input line.
///
/// Immutable after creation. Attribute keys are stored lowercased so
/// lookups are case-insensitive; a key mapped to `None` means the payload
/// carried an explicit JSON null for it (present, value absent).
#[derive(Debug, Clone, Serialize)]
pub struct Record {
    /// Zero-based input line position. Output row `index` corresponds to
    /// input line `index` (after any configured header skip).
    pub index: usize,
    /// The second `;`-separated segment of the line, kept verbatim.
    pub auxiliary: String,
    attributes: HashMap<String, Option<String>>,
    /// Payload diagnostics, see [`PayloadOutcome`].
    pub payload: PayloadOutcome,
}

impl Record {
    /// A record with no auxiliary field and no attributes, as produced for
    /// blank input lines.
    pub fn blank(index: usize) -> Self {
        Self {
            index,
            auxiliary: String::new(),
            attributes: HashMap::new(),
            payload: PayloadOutcome::Missing,
        }
    }

    /// Case-insensitive attribute lookup.
    ///
    /// Returns `None` both when the key is absent and when the payload held
    /// an explicit null; neither carries a usable value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .get(&key.to_lowercase())
            .and_then(|v| v.as_deref())
    }

    /// Number of flattened receiver attributes (nulls included).
    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }
}

/// Parse one input line into a [`Record`]. Never fails.
///
/// Splits on `;` into at most three segments, padding missing segments as
/// empty and trimming each. Segment 1 becomes the auxiliary field, segment 2
/// the payload.
pub fn parse_line(index: usize, line: &str) -> Record {
    if line.trim().is_empty() {
        return Record::blank(index);
    }

    let mut segments = line.splitn(3, ';').map(str::trim);
    let _ = segments.next().unwrap_or("");
    let auxiliary = segments.next().unwrap_or("").to_string();
    let payload = segments.next().unwrap_or("");

    let (attributes, outcome) = flatten_payload(&unquote_payload(payload));

    Record {
        index,
        auxiliary,
        attributes,
        payload: outcome,
    }
}

/// Undo the CSV-style escaping applied to the payload upstream: strip one
/// wrapping quote pair, then collapse every doubled quote.
fn unquote_payload(raw: &str) -> String {
    let inner = if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        &raw[1..raw.len() - 1]
    } else {
        raw
    };
    inner.replace("\"\"", "\"")
}

/// Flatten the immediate properties of the payload's `receiver` object.
///
/// String values pass through verbatim, numbers keep their decimal text,
/// booleans become `true`/`false`, nulls are stored as present-but-absent,
/// and anything nested is stored as its raw serialization. Any failure mode
/// yields an empty map, not an error.
fn flatten_payload(payload: &str) -> (HashMap<String, Option<String>>, PayloadOutcome) {
    let mut attributes = HashMap::new();

    if payload.is_empty() {
        return (attributes, PayloadOutcome::Missing);
    }

    let root: serde_json::Value = match serde_json::from_str(payload) {
        Ok(value) => value,
        Err(_) => return (attributes, PayloadOutcome::Invalid),
    };

    let receiver = match root.get("receiver") {
        Some(serde_json::Value::Object(map)) => map,
        _ => return (attributes, PayloadOutcome::Missing),
    };

    for (key, value) in receiver {
        let text = match value {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            serde_json::Value::Bool(b) => Some(b.to_string()),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        };
        attributes.insert(key.to_lowercase(), text);
    }

    (attributes, PayloadOutcome::Mapped)
}

// =============================================================================
// Input decoding
// =============================================================================

/// Detect the encoding of raw input bytes using chardet.
pub fn detect_encoding(bytes: &[u8]) -> String {
    let (charset, _, _) = chardet::detect(bytes);

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode input bytes using the given encoding name.
///
/// Legacy TNT exports are frequently ISO-8859-1 or Windows-1252; anything
/// unrecognized falls back to lossy UTF-8 so a stray byte cannot abort the
/// whole run.
pub fn decode_input(bytes: &[u8], encoding: &str) -> InputResult<String> {
    match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => Ok(String::from_utf8(bytes.to_vec())
            .unwrap_or_else(|_| String::from_utf8_lossy(bytes).into_owned())),
        "iso-8859-1" | "latin-1" | "latin1" => {
            Ok(encoding_rs::ISO_8859_15.decode(bytes).0.into_owned())
        }
        "windows-1252" | "cp1252" => Ok(encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned()),
        other => {
            let (text, _, had_errors) = encoding_rs::UTF_8.decode(bytes);
            if had_errors && !other.is_empty() {
                Err(InputError::Encoding(other.to_string()))
            } else {
                Ok(text.into_owned())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_line() {
        let record = parse_line(7, "   ");
        assert_eq!(record.index, 7);
        assert_eq!(record.auxiliary, "");
        assert_eq!(record.attribute_count(), 0);
        assert_eq!(record.payload, PayloadOutcome::Missing);
    }

    #[test]
    fn test_missing_segments_padded() {
        let record = parse_line(0, "only-one-segment");
        assert_eq!(record.auxiliary, "");
        assert_eq!(record.attribute_count(), 0);

        let record = parse_line(1, "first; second ");
        assert_eq!(record.auxiliary, "second");
        assert_eq!(record.attribute_count(), 0);
    }

    #[test]
    fn test_receiver_flattening() {
        let line = r#"X;AUX;{"receiver":{"city":"Lyon","zone":3,"active":true,"fax":null}}"#;
        let record = parse_line(0, line);
        assert_eq!(record.payload, PayloadOutcome::Mapped);
        assert_eq!(record.get("city"), Some("Lyon"));
        assert_eq!(record.get("zone"), Some("3"));
        assert_eq!(record.get("active"), Some("true"));
        // null is present-but-absent, indistinguishable from missing via get()
        assert_eq!(record.get("fax"), None);
        assert_eq!(record.attribute_count(), 4);
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let line = r#"X;AUX;{"receiver":{"contactName":"Alice"}}"#;
        let record = parse_line(0, line);
        assert_eq!(record.get("CONTACTNAME"), Some("Alice"));
        assert_eq!(record.get("contactname"), Some("Alice"));
    }

    #[test]
    fn test_quoted_payload_unescaped() {
        let line = r#"X;AUX;"{""receiver"":{""city"":""Oslo""}}""#;
        let record = parse_line(0, line);
        assert_eq!(record.payload, PayloadOutcome::Mapped);
        assert_eq!(record.get("city"), Some("Oslo"));
    }

    #[test]
    fn test_nested_value_kept_as_raw_text() {
        let line = r#"X;AUX;{"receiver":{"tags":["a","b"]}}"#;
        let record = parse_line(0, line);
        assert_eq!(record.get("tags"), Some(r#"["a","b"]"#));
    }

    #[test]
    fn test_invalid_json_degrades_to_empty_map() {
        let record = parse_line(0, "X;AUX;{not json at all");
        assert_eq!(record.payload, PayloadOutcome::Invalid);
        assert_eq!(record.auxiliary, "AUX");
        assert_eq!(record.attribute_count(), 0);
    }

    #[test]
    fn test_root_not_object_is_missing_data() {
        let record = parse_line(0, "X;AUX;[1,2,3]");
        assert_eq!(record.payload, PayloadOutcome::Missing);
        assert_eq!(record.attribute_count(), 0);
    }

    #[test]
    fn test_no_receiver_property() {
        let record = parse_line(0, r#"X;AUX;{"sender":{"city":"Oslo"}}"#);
        assert_eq!(record.payload, PayloadOutcome::Missing);
        assert_eq!(record.attribute_count(), 0);
    }

    #[test]
    fn test_extra_semicolons_stay_in_payload() {
        // splitn(3) keeps everything after the second separator together
        let record = parse_line(0, r#"X;AUX;{"receiver":{"note":"a;b"}}"#);
        assert_eq!(record.get("note"), Some("a;b"));
    }

    #[test]
    fn test_detect_encoding_utf8() {
        assert_eq!(detect_encoding("plain ascii text".as_bytes()), "utf-8");
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let decoded = decode_input(bytes, "iso-8859-1").unwrap();
        assert_eq!(decoded, "Société");
    }

    #[test]
    fn test_windows1252_decoding() {
        // 0x92 is the right single quotation mark in Windows-1252
        let bytes: &[u8] = &[0x4F, 0x92, 0x42, 0x72, 0x69, 0x65, 0x6E];
        let decoded = decode_input(bytes, "windows-1252").unwrap();
        assert_eq!(decoded, "O\u{2019}Brien");
    }
}
