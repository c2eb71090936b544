//! Core record types for representing translation data

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Field holding the locale identifier of a record
pub const LANGUAGE: &str = "language";
/// Field holding the human-readable label of a record
pub const LANGUAGE_NAME: &str = "language_name";

/// Return the segment of a locale code before its first `-`
///
/// The whole string is returned when there is no separator; no validation
/// of tag well-formedness is performed.
pub fn base_code(code: &str) -> &str {
    code.split_once('-').map_or(code, |(base, _)| base)
}

/// A single translation record: field name to value, in authored order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranslationRecord {
    fields: Map<String, Value>,
}

impl TranslationRecord {
    /// Create a record holding only the two mandatory fields
    pub fn new(language: impl Into<String>, language_name: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert(LANGUAGE.to_string(), Value::String(language.into()));
        fields.insert(LANGUAGE_NAME.to_string(), Value::String(language_name.into()));
        Self { fields }
    }

    /// Builder-style helper for adding a string field
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), Value::String(value.into()));
        self
    }

    /// Build a record from a parsed JSON value, checking the mandatory fields
    pub fn from_value(value: Value) -> std::result::Result<Self, String> {
        let fields = match value {
            Value::Object(fields) => fields,
            other => return Err(format!("expected an object, found {}", kind_of(&other))),
        };

        for required in [LANGUAGE, LANGUAGE_NAME] {
            match fields.get(required) {
                Some(Value::String(_)) => {}
                Some(other) => {
                    return Err(format!(
                        "field \"{}\" must be a string, found {}",
                        required,
                        kind_of(other)
                    ))
                }
                None => return Err(format!("missing field \"{}\"", required)),
            }
        }

        Ok(Self { fields })
    }

    /// The locale identifier, e.g. "en" or "en-US"
    pub fn language(&self) -> &str {
        self.str_field(LANGUAGE)
    }

    /// The human-readable label, e.g. "English"
    pub fn language_name(&self) -> &str {
        self.str_field(LANGUAGE_NAME)
    }

    /// Base code of this record's language
    pub fn base_code(&self) -> &str {
        base_code(self.language())
    }

    /// A record whose language equals its own base code
    pub fn is_base(&self) -> bool {
        self.base_code() == self.language()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Set a field, replacing any previous value
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    /// Field names in stored order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Fields in stored order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    fn str_field(&self, name: &str) -> &str {
        self.fields.get(name).and_then(Value::as_str).unwrap_or_default()
    }
}

/// An ordered sequence of translation records, stored as one file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranslationSet {
    records: Vec<TranslationRecord>,
}

impl TranslationSet {
    /// Create a new empty set
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn push(&mut self, record: TranslationRecord) {
        self.records.push(record);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TranslationRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[TranslationRecord] {
        &self.records
    }

    /// Find a record by its language code
    pub fn find(&self, language: &str) -> Option<&TranslationRecord> {
        self.records.iter().find(|r| r.language() == language)
    }

    /// Language codes in stored order
    pub fn languages(&self) -> Vec<&str> {
        self.records.iter().map(TranslationRecord::language).collect()
    }

    /// Language codes that appear more than once, in first-duplicate order
    pub fn duplicate_languages(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for language in self.languages() {
            if !seen.insert(language) && !duplicates.contains(&language) {
                duplicates.push(language);
            }
        }
        duplicates
    }
}

impl From<Vec<TranslationRecord>> for TranslationSet {
    fn from(records: Vec<TranslationRecord>) -> Self {
        Self { records }
    }
}

impl FromIterator<TranslationRecord> for TranslationSet {
    fn from_iter<I: IntoIterator<Item = TranslationRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for TranslationSet {
    type Item = TranslationRecord;
    type IntoIter = std::vec::IntoIter<TranslationRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a TranslationSet {
    type Item = &'a TranslationRecord;
    type IntoIter = std::slice::Iter<'a, TranslationRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_base_code() {
        assert_eq!(base_code("en"), "en");
        assert_eq!(base_code("en-US"), "en");
        assert_eq!(base_code("zh-Hant-TW"), "zh");
        assert_eq!(base_code(""), "");
        assert_eq!(base_code("-x"), "");
    }

    #[test]
    fn test_record_accessors() {
        let record = TranslationRecord::new("es-MX", "Spanish (es-MX)").with_field("title", "Hola");
        assert_eq!(record.language(), "es-MX");
        assert_eq!(record.language_name(), "Spanish (es-MX)");
        assert_eq!(record.base_code(), "es");
        assert!(!record.is_base());
        assert_eq!(record.get("title"), Some(&json!("Hola")));
        assert_eq!(
            record.field_names().collect::<Vec<_>>(),
            vec!["language", "language_name", "title"]
        );
    }

    #[test]
    fn test_from_value_rejects_non_object() {
        let err = TranslationRecord::from_value(json!([1, 2])).unwrap_err();
        assert!(err.contains("an array"));
    }

    #[test]
    fn test_from_value_requires_language_fields() {
        let err = TranslationRecord::from_value(json!({"language": "en"})).unwrap_err();
        assert!(err.contains("language_name"));

        let err =
            TranslationRecord::from_value(json!({"language": 5, "language_name": "x"})).unwrap_err();
        assert!(err.contains("must be a string"));
    }

    #[test]
    fn test_field_order_is_preserved() {
        let value = json!({"language": "en", "zeta": "z", "language_name": "English", "alpha": "a"});
        let record = TranslationRecord::from_value(value).unwrap();
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"language":"en","zeta":"z","language_name":"English","alpha":"a"}"#
        );
    }

    #[test]
    fn test_duplicate_languages() {
        let set: TranslationSet = vec![
            TranslationRecord::new("en", "English"),
            TranslationRecord::new("en-US", "English (en-US)"),
            TranslationRecord::new("en", "English again"),
        ]
        .into();
        assert_eq!(set.duplicate_languages(), vec!["en"]);
        assert!(set.find("en-US").is_some());
        assert!(set.find("fr").is_none());
    }
}
