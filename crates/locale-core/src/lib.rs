//! locale-core: Core library for expanding translation files into locale variants
//!
//! This library provides functionality to:
//! - Discover and parse translation files (JSON arrays of records keyed by `language`)
//! - Derive missing BCP-47 variant records from base records using a variation table
//! - Back-fill fields added to a base record onto its existing variants
//! - Write expanded sets back in place and validate every file in one pass

pub mod batch;
pub mod config;
pub mod error;
pub mod expander;
pub mod loader;
pub mod record;
pub mod validator;
pub mod variations;

pub use batch::{process_directory, process_file, write_translation_set, BatchProcessor, BatchSummary, FileStats};
pub use config::{ProjectConfig, CONFIG_FILE_NAME};
pub use error::{Error, Result};
pub use expander::{derive_variant, expand, ExpandOptions, ExpandReport, Expander};
pub use loader::{list_files, load_directory, load_file, parse_translation_set, FileFilter, LoadedFile, ParseContext};
pub use record::{base_code, TranslationRecord, TranslationSet};
pub use validator::{validate_directories, validate_directory, validate_file, ValidationReport, ValidationResult};
pub use variations::{VariationFamily, VariationTable};
