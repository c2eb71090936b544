//! Validation pass: re-parse translation files and collect every failure

use crate::error::Result;
use crate::loader::{list_files, load_file, FileFilter};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Outcome of validating one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub file: PathBuf,
    pub valid: bool,
    /// Description of the failure, including surrounding text when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Validation results across one or more directories, sorted by path
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub results: Vec<ValidationResult>,
}

impl ValidationReport {
    /// Iterate over the files that failed
    pub fn invalid(&self) -> impl Iterator<Item = &ValidationResult> {
        self.results.iter().filter(|r| !r.valid)
    }

    pub fn invalid_count(&self) -> usize {
        self.invalid().count()
    }

    pub fn is_valid(&self) -> bool {
        self.results.iter().all(|r| r.valid)
    }
}

/// Validate a single file; failures are recorded, never returned
pub fn validate_file<P: AsRef<Path>>(path: P) -> ValidationResult {
    let path = path.as_ref();
    match load_file(path) {
        Ok(_) => ValidationResult {
            file: path.to_path_buf(),
            valid: true,
            error: None,
        },
        Err(e) => {
            debug!("{} is invalid: {}", path.display(), e);
            ValidationResult {
                file: path.to_path_buf(),
                valid: false,
                error: Some(e.to_string()),
            }
        }
    }
}

/// Validate every qualifying file in a directory
///
/// Only a directory that cannot be listed is an error; bad files show up as
/// `valid: false` entries.
pub fn validate_directory<P: AsRef<Path>>(
    dir: P,
    filter: &FileFilter,
) -> Result<Vec<ValidationResult>> {
    let files = list_files(dir.as_ref(), filter)?;
    Ok(files.iter().map(validate_file).collect())
}

/// Validate every qualifying file in each directory
pub fn validate_directories<P: AsRef<Path>>(
    dirs: &[P],
    filter: &FileFilter,
) -> Result<ValidationReport> {
    let mut results = Vec::new();
    for dir in dirs {
        let dir = dir.as_ref();
        let found = validate_directory(dir, filter)?;
        info!("validated {} files in {}", found.len(), dir.display());
        results.extend(found);
    }
    results.sort_by(|a, b| a.file.cmp(&b.file));

    Ok(ValidationReport { results })
}
