//! Variation table: language family name to ordered locale variant codes

use crate::error::{Error, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// One family of locale variants, e.g. "Spanish" -> ["es", "es-ES", "es-MX"]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariationFamily {
    /// Family name (e.g., "Spanish")
    pub name: String,
    /// Variant codes in the order they should be generated
    pub variants: Vec<String>,
}

/// Declarative mapping from family name to variant codes, in file order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VariationTable {
    families: Vec<VariationFamily>,
}

impl VariationTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a family; entries keep insertion order
    pub fn add_family<I, S>(&mut self, name: impl Into<String>, variants: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.families.push(VariationFamily {
            name: name.into(),
            variants: variants.into_iter().map(Into::into).collect(),
        });
    }

    /// Builder-style variant of [`VariationTable::add_family`]
    pub fn with_family<I, S>(mut self, name: impl Into<String>, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_family(name, variants);
        self
    }

    pub fn families(&self) -> &[VariationFamily] {
        &self.families
    }

    /// Find a family by name
    pub fn find_family(&self, name: &str) -> Option<&VariationFamily> {
        self.families.iter().find(|f| f.name == name)
    }

    /// All variant codes, in table order
    pub fn variant_codes(&self) -> impl Iterator<Item = &str> {
        self.families
            .iter()
            .flat_map(|f| f.variants.iter().map(String::as_str))
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    /// Load a variation table from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse_str(&content).map_err(|message| Error::InvalidVariationTable {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Parse a variation table from JSON text
    pub fn parse_str(content: &str) -> std::result::Result<Self, String> {
        let map: Map<String, Value> = serde_json::from_str(content).map_err(|e| e.to_string())?;

        let mut table = Self::new();
        for (name, value) in map {
            let variants = match value {
                Value::Array(items) => items
                    .into_iter()
                    .map(|item| match item {
                        Value::String(code) => Ok(code),
                        _ => Err(format!("family '{}' contains a non-string code", name)),
                    })
                    .collect::<std::result::Result<Vec<_>, _>>()?,
                _ => return Err(format!("family '{}' must map to a list of codes", name)),
            };
            table.families.push(VariationFamily { name, variants });
        }

        Ok(table)
    }
}
