//! Batch processing: load, expand and write back translation files
//!
//! A batch is all-or-nothing with respect to parsing: every file of an
//! invocation is loaded and expanded before the first one is written, so a
//! malformed file aborts the run with nothing modified. Writes are staged as
//! temporary files first and only renamed into place once all of them exist.

use crate::error::{Error, Result};
use crate::expander::{ExpandOptions, ExpandReport, Expander};
use crate::loader::{list_files, load_file, FileFilter};
use crate::record::TranslationSet;
use crate::variations::VariationTable;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Per-file result of a batch run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileStats {
    /// File that was processed
    pub file: PathBuf,
    /// Records before expansion
    pub original_count: usize,
    /// Records after expansion
    pub expanded_count: usize,
    /// Newly generated records
    pub added_count: usize,
    /// Fields copied onto existing variants
    pub backfilled_count: usize,
    /// Whether the file was rewritten
    pub written: bool,
}

/// Result of a batch run over one or more files
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSummary {
    pub files: Vec<FileStats>,
}

impl BatchSummary {
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn total_original(&self) -> usize {
        self.files.iter().map(|f| f.original_count).sum()
    }

    pub fn total_expanded(&self) -> usize {
        self.files.iter().map(|f| f.expanded_count).sum()
    }

    pub fn total_added(&self) -> usize {
        self.files.iter().map(|f| f.added_count).sum()
    }

    pub fn total_backfilled(&self) -> usize {
        self.files.iter().map(|f| f.backfilled_count).sum()
    }

    pub fn files_written(&self) -> usize {
        self.files.iter().filter(|f| f.written).count()
    }
}

/// An expanded file waiting to be written
#[derive(Debug)]
struct Pending {
    path: PathBuf,
    translations: TranslationSet,
    report: ExpandReport,
    original_count: usize,
}

impl Pending {
    fn stats(&self, written: bool) -> FileStats {
        FileStats {
            file: self.path.clone(),
            original_count: self.original_count,
            expanded_count: self.translations.len(),
            added_count: self.report.added.len(),
            backfilled_count: self.report.backfilled_field_count(),
            written,
        }
    }
}

/// Drives loader, expander and writer over files and directories
#[derive(Debug, Clone)]
pub struct BatchProcessor<'a> {
    expander: Expander<'a>,
    filter: FileFilter,
    dry_run: bool,
}

impl<'a> BatchProcessor<'a> {
    pub fn new(table: &'a VariationTable) -> Self {
        Self {
            expander: Expander::new(table),
            filter: FileFilter::default(),
            dry_run: false,
        }
    }

    pub fn with_options(mut self, options: ExpandOptions) -> Self {
        self.expander = self.expander.with_options(options);
        self
    }

    pub fn with_filter(mut self, filter: FileFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Compute statistics without writing anything
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Expand a single explicit file
    pub fn process_file<P: AsRef<Path>>(&self, path: P) -> Result<FileStats> {
        let pending = self.prepare(path.as_ref().to_path_buf())?;
        let mut stats = self.commit(vec![pending])?;
        stats.pop().ok_or_else(|| {
            Error::Io(std::io::Error::other("batch produced no statistics"))
        })
    }

    /// Expand every qualifying file in a directory
    pub fn process_directory<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<FileStats>> {
        Ok(self.process_directories(&[dir])?.files)
    }

    /// Expand every qualifying file in each directory, in the order given
    pub fn process_directories<P: AsRef<Path>>(&self, dirs: &[P]) -> Result<BatchSummary> {
        let mut pending = Vec::new();
        for dir in dirs {
            let dir = dir.as_ref();
            let files = list_files(dir, &self.filter)?;
            info!("expanding {} files in {}", files.len(), dir.display());
            for path in files {
                pending.push(self.prepare(path)?);
            }
        }

        Ok(BatchSummary {
            files: self.commit(pending)?,
        })
    }

    fn prepare(&self, path: PathBuf) -> Result<Pending> {
        let original = load_file(&path)?;
        let (translations, report) = self.expander.expand_with_report(&original);

        if !report.skipped_without_base.is_empty() {
            debug!(
                "{}: no base record for {}",
                path.display(),
                report.skipped_without_base.join(", ")
            );
        }

        Ok(Pending {
            path,
            original_count: original.len(),
            translations,
            report,
        })
    }

    /// Stage every file next to its target, then rename them all into place
    fn commit(&self, pending: Vec<Pending>) -> Result<Vec<FileStats>> {
        if self.dry_run {
            return Ok(pending.iter().map(|file| file.stats(false)).collect());
        }

        let mut staged = Vec::with_capacity(pending.len());
        for file in &pending {
            match stage_translation_set(&file.path, &file.translations) {
                Ok(tmp_path) => staged.push(tmp_path),
                Err(e) => {
                    for tmp_path in &staged {
                        let _ = fs::remove_file(tmp_path);
                    }
                    return Err(e);
                }
            }
        }

        let mut stats = Vec::with_capacity(pending.len());
        for (file, tmp_path) in pending.iter().zip(staged) {
            fs::rename(&tmp_path, &file.path).map_err(|e| Error::FileWrite {
                path: file.path.clone(),
                source: e,
            })?;
            debug!(
                "wrote {} ({} added, {} fields back-filled)",
                file.path.display(),
                file.report.added.len(),
                file.report.backfilled_field_count()
            );
            stats.push(file.stats(true));
        }
        Ok(stats)
    }
}

/// Expand a single file with default options
pub fn process_file<P: AsRef<Path>>(path: P, table: &VariationTable) -> Result<FileStats> {
    BatchProcessor::new(table).process_file(path)
}

/// Expand every qualifying file in a directory with default options
pub fn process_directory<P: AsRef<Path>>(dir: P, table: &VariationTable) -> Result<Vec<FileStats>> {
    BatchProcessor::new(table).process_directory(dir)
}

/// Serialize a translation set with two-space indentation and replace `path`
///
/// The content goes to a sibling temporary file that is flushed to disk and
/// then renamed over the target.
pub fn write_translation_set<P: AsRef<Path>>(path: P, translations: &TranslationSet) -> Result<()> {
    let path = path.as_ref();
    let tmp_path = stage_translation_set(path, translations)?;
    fs::rename(&tmp_path, path).map_err(|e| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write the serialized set to `.<name>.tmp` beside `path` and sync it
fn stage_translation_set(path: &Path, translations: &TranslationSet) -> Result<PathBuf> {
    let write_err = |e: std::io::Error| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    };

    let mut content = serde_json::to_string_pretty(translations)?;
    content.push('\n');

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| write_err(std::io::Error::other("path has no file name")))?;
    let tmp_path = path.with_file_name(format!(".{}.tmp", file_name));

    let file = File::create(&tmp_path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(content.as_bytes()).map_err(write_err)?;
    let file = writer.into_inner().map_err(|e| write_err(e.into_error()))?;
    file.sync_all().map_err(write_err)?;

    Ok(tmp_path)
}
