//! Expansion engine for deriving locale variant records from base records
//!
//! Expansion never removes a record and never overwrites an existing field.
//! Running it twice with the same variation table yields the same set.

use crate::record::{base_code, TranslationRecord, TranslationSet, LANGUAGE, LANGUAGE_NAME};
use crate::variations::VariationTable;
use serde_json::Value;
use std::collections::{HashMap, HashSet};

/// Switches for the expansion passes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpandOptions {
    /// Copy fields missing on existing variants from their base record
    pub backfill: bool,
}

impl Default for ExpandOptions {
    fn default() -> Self {
        Self { backfill: true }
    }
}

/// Fields copied onto one existing variant record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackfilledRecord {
    pub language: String,
    pub fields: Vec<String>,
}

/// What an expansion changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandReport {
    /// Languages of newly generated records, in generation order
    pub added: Vec<String>,
    /// Existing variants that received missing fields
    pub backfilled: Vec<BackfilledRecord>,
    /// Variant codes from the table with no base record to derive from
    pub skipped_without_base: Vec<String>,
}

impl ExpandReport {
    /// True when the expanded set equals the input
    pub fn is_unchanged(&self) -> bool {
        self.added.is_empty() && self.backfilled.is_empty()
    }

    /// Total number of fields copied by the back-fill pass
    pub fn backfilled_field_count(&self) -> usize {
        self.backfilled.iter().map(|b| b.fields.len()).sum()
    }
}

/// Expands translation sets against a variation table
#[derive(Debug, Clone, Copy)]
pub struct Expander<'a> {
    table: &'a VariationTable,
    options: ExpandOptions,
}

impl<'a> Expander<'a> {
    pub fn new(table: &'a VariationTable) -> Self {
        Self {
            table,
            options: ExpandOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ExpandOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> ExpandOptions {
        self.options
    }

    /// Expand a set, discarding the report
    pub fn expand(&self, translations: &TranslationSet) -> TranslationSet {
        self.expand_with_report(translations).0
    }

    /// Expand a set and describe what was added or back-filled
    ///
    /// Output order is the input records in their original order, followed
    /// by generated variants in variation table order.
    pub fn expand_with_report(
        &self,
        translations: &TranslationSet,
    ) -> (TranslationSet, ExpandReport) {
        let bases = base_index(translations);
        let mut report = ExpandReport::default();
        let mut output = TranslationSet::new();
        let mut existing: HashSet<String> = HashSet::new();

        for record in translations {
            let mut record = record.clone();

            if self.options.backfill && !record.is_base() {
                if let Some(base) = bases.get(record.base_code()) {
                    let fields = backfill(&mut record, base);
                    if !fields.is_empty() {
                        report.backfilled.push(BackfilledRecord {
                            language: record.language().to_string(),
                            fields,
                        });
                    }
                }
            }

            existing.insert(record.language().to_string());
            output.push(record);
        }

        for code in self.table.variant_codes() {
            if existing.contains(code) {
                continue;
            }

            let Some(base) = bases.get(base_code(code)) else {
                report.skipped_without_base.push(code.to_string());
                continue;
            };

            output.push(derive_variant(base, code));
            existing.insert(code.to_string());
            report.added.push(code.to_string());
        }

        (output, report)
    }
}

/// Expand a translation set with default options
pub fn expand(translations: &TranslationSet, table: &VariationTable) -> TranslationSet {
    Expander::new(table).expand(translations)
}

/// Synthesize a variant record for `code` from a base record
pub fn derive_variant(base: &TranslationRecord, code: &str) -> TranslationRecord {
    let language_name = if code == base_code(code) {
        base.language_name().to_string()
    } else {
        format!("{} ({})", base.language_name(), code)
    };

    let mut variant = base.clone();
    variant.set(LANGUAGE, Value::String(code.to_string()));
    variant.set(LANGUAGE_NAME, Value::String(language_name));
    variant
}

/// Index records by base code; the first record seen for a code wins,
/// whether or not it is a bare base record
fn base_index(translations: &TranslationSet) -> HashMap<&str, &TranslationRecord> {
    let mut bases: HashMap<&str, &TranslationRecord> = HashMap::new();
    for record in translations {
        bases.entry(record.base_code()).or_insert(record);
    }
    bases
}

/// Copy fields present on `base` but absent on `variant`; returns their names
fn backfill(variant: &mut TranslationRecord, base: &TranslationRecord) -> Vec<String> {
    let missing: Vec<(String, Value)> = base
        .fields()
        .filter(|(name, _)| !variant.contains(name))
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect();

    let mut names = Vec::with_capacity(missing.len());
    for (name, value) in missing {
        names.push(name.clone());
        variant.set(name, value);
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn english_table() -> VariationTable {
        VariationTable::new().with_family("English", ["en", "en-US", "en-GB"])
    }

    fn set_of(records: Vec<TranslationRecord>) -> TranslationSet {
        records.into()
    }

    #[test]
    fn test_expand_generates_variants() {
        let input = set_of(vec![
            TranslationRecord::new("en", "English").with_field("title", "Hi"),
        ]);

        let output = expand(&input, &english_table());

        assert_eq!(output.languages(), vec!["en", "en-US", "en-GB"]);
        let us = output.find("en-US").unwrap();
        assert_eq!(us.language_name(), "English (en-US)");
        assert_eq!(us.get("title"), Some(&json!("Hi")));
        let gb = output.find("en-GB").unwrap();
        assert_eq!(gb.language_name(), "English (en-GB)");
        assert_eq!(gb.get("title"), Some(&json!("Hi")));
    }

    #[test]
    fn test_expand_is_idempotent() {
        let table = english_table()
            .with_family("Spanish", ["es", "es-ES", "es-MX"])
            .with_family("French", ["fr", "fr-CA"]);
        let input = set_of(vec![
            TranslationRecord::new("es", "Spanish").with_field("title", "Hola"),
            TranslationRecord::new("en", "English")
                .with_field("title", "Hi")
                .with_field("body", "Welcome"),
            TranslationRecord::new("en-US", "English (en-US)").with_field("title", "Howdy"),
        ]);

        let once = expand(&input, &table);
        let twice = expand(&once, &table);

        assert_eq!(once, twice);
        let (_, report) = Expander::new(&table).expand_with_report(&once);
        assert!(report.is_unchanged());
    }

    #[test]
    fn test_expand_never_duplicates_languages() {
        let table = VariationTable::new()
            .with_family("English", ["en-US", "en-GB"])
            .with_family("Also English", ["en-GB", "en-US", "en-AU"]);
        let input = set_of(vec![
            TranslationRecord::new("en", "English"),
            TranslationRecord::new("en-GB", "English (en-GB)"),
        ]);

        let output = expand(&input, &table);

        assert!(output.duplicate_languages().is_empty());
        assert_eq!(output.languages(), vec!["en", "en-GB", "en-US", "en-AU"]);
    }

    #[test]
    fn test_backfill_adds_missing_fields_only() {
        let input = set_of(vec![
            TranslationRecord::new("en", "English")
                .with_field("a", "base a")
                .with_field("b", "base b")
                .with_field("c", "base c"),
            TranslationRecord::new("en-US", "English (en-US)")
                .with_field("a", "us a")
                .with_field("b", "us b"),
        ]);

        let (output, report) = Expander::new(&VariationTable::new()).expand_with_report(&input);

        let us = output.find("en-US").unwrap();
        assert_eq!(us.get("a"), Some(&json!("us a")));
        assert_eq!(us.get("b"), Some(&json!("us b")));
        assert_eq!(us.get("c"), Some(&json!("base c")));
        assert_eq!(us.language_name(), "English (en-US)");
        assert_eq!(
            report.backfilled,
            vec![BackfilledRecord {
                language: "en-US".to_string(),
                fields: vec!["c".to_string()],
            }]
        );
        assert_eq!(report.backfilled_field_count(), 1);
    }

    #[test]
    fn test_backfill_can_be_disabled() {
        let input = set_of(vec![
            TranslationRecord::new("en", "English").with_field("c", "base c"),
            TranslationRecord::new("en-US", "English (en-US)"),
        ]);

        let table = english_table();
        let expander = Expander::new(&table).with_options(ExpandOptions { backfill: false });
        let (output, report) = expander.expand_with_report(&input);

        assert!(!output.find("en-US").unwrap().contains("c"));
        assert!(report.backfilled.is_empty());
        assert_eq!(output.find("en-GB").unwrap().get("c"), Some(&json!("base c")));
    }

    #[test]
    fn test_skip_without_base() {
        let table = english_table().with_family("German", ["de", "de-AT"]);
        let input = set_of(vec![TranslationRecord::new("en", "English")]);

        let (output, report) = Expander::new(&table).expand_with_report(&input);

        assert!(output.find("de-AT").is_none());
        assert!(output.find("de").is_none());
        assert_eq!(report.skipped_without_base, vec!["de", "de-AT"]);
        assert_eq!(report.added, vec!["en-US", "en-GB"]);
    }

    #[test]
    fn test_leading_variant_is_the_source() {
        let input = set_of(vec![
            TranslationRecord::new("en-US", "English (en-US)").with_field("title", "Howdy"),
        ]);

        let output = expand(&input, &english_table());

        assert_eq!(output.languages(), vec!["en-US", "en", "en-GB"]);
        let en = output.find("en").unwrap();
        assert_eq!(en.language_name(), "English (en-US)");
        assert_eq!(en.get("title"), Some(&json!("Howdy")));
        let gb = output.find("en-GB").unwrap();
        assert_eq!(gb.language_name(), "English (en-US) (en-GB)");

        assert_eq!(expand(&output, &english_table()), output);
    }

    #[test]
    fn test_first_record_wins() {
        let input = set_of(vec![
            TranslationRecord::new("pt-BR", "Portuguese (pt-BR)").with_field("title", "Oi"),
            TranslationRecord::new("pt", "Portuguese").with_field("title", "Olá"),
            TranslationRecord::new("pt", "Portuguese (duplicate)").with_field("title", "Ignored"),
        ]);
        let table = VariationTable::new().with_family("Portuguese", ["pt-PT"]);

        let output = expand(&input, &table);

        let pt = output.find("pt-PT").unwrap();
        assert_eq!(pt.language_name(), "Portuguese (pt-BR) (pt-PT)");
        assert_eq!(pt.get("title"), Some(&json!("Oi")));
    }

    #[test]
    fn test_output_order() {
        let table = VariationTable::new()
            .with_family("Spanish", ["es-MX", "es-ES"])
            .with_family("English", ["en-GB"]);
        let input = set_of(vec![
            TranslationRecord::new("en", "English"),
            TranslationRecord::new("fr", "French"),
            TranslationRecord::new("es", "Spanish"),
        ]);

        let output = expand(&input, &table);

        assert_eq!(
            output.languages(),
            vec!["en", "fr", "es", "es-MX", "es-ES", "en-GB"]
        );
    }

    #[test]
    fn test_derived_record_keeps_field_order() {
        let base = TranslationRecord::new("es", "Spanish")
            .with_field("header", "Hola")
            .with_field("footer", "Adiós");

        let variant = derive_variant(&base, "es-MX");

        assert_eq!(
            variant.field_names().collect::<Vec<_>>(),
            vec!["language", "language_name", "header", "footer"]
        );
        assert_eq!(variant.language_name(), "Spanish (es-MX)");
    }

    #[test]
    fn test_derive_variant_equal_to_base_code_keeps_name() {
        let base = TranslationRecord::new("es", "Spanish");
        let variant = derive_variant(&base, "es");
        assert_eq!(variant.language(), "es");
        assert_eq!(variant.language_name(), "Spanish");
    }

    #[test]
    fn test_malformed_language_is_taken_literally() {
        let input = set_of(vec![TranslationRecord::new("", "Nameless").with_field("x", "1")]);
        let table = VariationTable::new().with_family("Odd", ["-zz"]);

        let output = expand(&input, &table);

        let odd = output.find("-zz").unwrap();
        assert_eq!(odd.language_name(), "Nameless (-zz)");
        assert_eq!(odd.get("x"), Some(&json!("1")));
    }

    #[test]
    fn test_empty_inputs() {
        let output = expand(&TranslationSet::new(), &english_table());
        assert!(output.is_empty());

        let input = set_of(vec![TranslationRecord::new("en", "English")]);
        assert_eq!(expand(&input, &VariationTable::new()), input);
    }
}
