//! Column rules for data resolution
//!
//! A [`ColumnRule`] describes how one output column obtains its value from a
//! parsed [`Record`]. The ordered rule sequence is static configuration data
//! (see [`crate::schema`]), evaluated by a single dispatch function instead
//! of per-column closures, so the mapping stays testable as plain data.

use serde::{Deserialize, Serialize};

use crate::parser::Record;

/// Where a column's value comes from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Source {
    /// A fixed value for every row. Empty means "always render empty".
    Constant { value: String },

    /// The record's auxiliary field (segment 1 of the input line).
    Auxiliary,

    /// Case-insensitive lookup in the record's attribute map.
    Attribute { key: String },

    /// Like `Attribute`, but falls back to `default` when the attribute is
    /// absent *or* present-but-empty. A present-but-empty attribute is
    /// treated as "no usable data".
    AttributeOr { key: String, default: String },
}

/// Post-resolution cleanup applied to the raw value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Normalizer {
    /// Pass the value through unchanged.
    #[default]
    None,

    /// Keep only ASCII decimal digits (phone-number columns).
    DigitsOnly,
}

impl Normalizer {
    /// Apply this normalizer to a resolved value.
    pub fn apply(&self, value: String) -> String {
        match self {
            Normalizer::None => value,
            Normalizer::DigitsOnly => {
                // Identity fast path: already pure digits
                if value.bytes().all(|b| b.is_ascii_digit()) {
                    value
                } else {
                    value.chars().filter(|c| c.is_ascii_digit()).collect()
                }
            }
        }
    }
}

/// How to compute one output column's value for a record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnRule {
    pub source: Source,
    #[serde(default)]
    pub normalizer: Normalizer,
}

impl ColumnRule {
    /// A column that always renders empty.
    pub fn empty() -> Self {
        Self::constant("")
    }

    pub fn constant(value: impl Into<String>) -> Self {
        Self {
            source: Source::Constant { value: value.into() },
            normalizer: Normalizer::None,
        }
    }

    pub fn auxiliary() -> Self {
        Self {
            source: Source::Auxiliary,
            normalizer: Normalizer::None,
        }
    }

    pub fn attribute(key: impl Into<String>) -> Self {
        Self {
            source: Source::Attribute { key: key.into() },
            normalizer: Normalizer::None,
        }
    }

    pub fn attribute_or(key: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            source: Source::AttributeOr {
                key: key.into(),
                default: default.into(),
            },
            normalizer: Normalizer::None,
        }
    }

    pub fn digits_only(mut self) -> Self {
        self.normalizer = Normalizer::DigitsOnly;
        self
    }

    /// Resolve this rule against a record.
    ///
    /// `None` means "render as empty cell". The mapper never escapes or
    /// transliterates; that belongs to later stages.
    pub fn resolve(&self, record: &Record) -> Option<String> {
        let raw = match &self.source {
            Source::Constant { value } => {
                if value.is_empty() {
                    None
                } else {
                    Some(value.clone())
                }
            }
            Source::Auxiliary => Some(record.auxiliary.clone()),
            Source::Attribute { key } => record.get(key).map(str::to_string),
            Source::AttributeOr { key, default } => match record.get(key) {
                Some(v) if !v.is_empty() => Some(v.to_string()),
                _ => Some(default.clone()),
            },
        };

        raw.map(|v| self.normalizer.apply(v))
            .filter(|v| !v.is_empty())
    }
}

/// Resolve every rule against a record, in order.
///
/// The output is aligned 1:1 with the rule sequence: entry `i` is the value
/// for output column `i`.
pub fn map_row(record: &Record, rules: &[ColumnRule]) -> Vec<Option<String>> {
    rules.iter().map(|rule| rule.resolve(record)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_line;

    fn sample_record() -> Record {
        parse_line(
            0,
            r#"X;NICK-42;{"receiver":{"phoneNumber":"+1 (555) 123-4567","city":"Berlin","state":""}}"#,
        )
    }

    #[test]
    fn test_constant() {
        let record = sample_record();
        assert_eq!(ColumnRule::constant("Y").resolve(&record), Some("Y".into()));
        assert_eq!(ColumnRule::empty().resolve(&record), None);
    }

    #[test]
    fn test_auxiliary() {
        let record = sample_record();
        assert_eq!(
            ColumnRule::auxiliary().resolve(&record),
            Some("NICK-42".into())
        );
    }

    #[test]
    fn test_attribute_lookup() {
        let record = sample_record();
        assert_eq!(
            ColumnRule::attribute("City").resolve(&record),
            Some("Berlin".into())
        );
        assert_eq!(ColumnRule::attribute("missing").resolve(&record), None);
    }

    #[test]
    fn test_default_on_absent_and_on_empty() {
        let record = sample_record();
        // absent key
        assert_eq!(
            ColumnRule::attribute_or("verified", "Y").resolve(&record),
            Some("Y".into())
        );
        // present but empty counts as absent
        assert_eq!(
            ColumnRule::attribute_or("state", "N").resolve(&record),
            Some("N".into())
        );
        // present and non-empty wins
        assert_eq!(
            ColumnRule::attribute_or("city", "N").resolve(&record),
            Some("Berlin".into())
        );
    }

    #[test]
    fn test_digits_only() {
        assert_eq!(
            Normalizer::DigitsOnly.apply("+1 (555) 123-4567".into()),
            "15551234567"
        );
        assert_eq!(Normalizer::DigitsOnly.apply("".into()), "");
        assert_eq!(Normalizer::DigitsOnly.apply("0800".into()), "0800");
    }

    #[test]
    fn test_digits_only_rule_on_attribute() {
        let record = sample_record();
        assert_eq!(
            ColumnRule::attribute("phonenumber")
                .digits_only()
                .resolve(&record),
            Some("15551234567".into())
        );
    }

    #[test]
    fn test_digits_only_empty_result_renders_empty() {
        let record = parse_line(0, r#"X;A;{"receiver":{"phoneNumber":"n/a"}}"#);
        assert_eq!(
            ColumnRule::attribute("phoneNumber")
                .digits_only()
                .resolve(&record),
            None
        );
    }

    #[test]
    fn test_map_row_alignment() {
        let record = sample_record();
        let rules = vec![
            ColumnRule::auxiliary(),
            ColumnRule::empty(),
            ColumnRule::attribute("city"),
        ];
        let row = map_row(&record, &rules);
        assert_eq!(
            row,
            vec![Some("NICK-42".into()), None, Some("Berlin".into())]
        );
    }
}
