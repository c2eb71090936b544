//! Structured-file loader: discovers translation files and parses them
//!
//! Malformed input is always an error here. Parse failures carry a
//! [`ParseContext`] with a window of the surrounding text so the offending
//! spot can be found without opening the file.

use crate::error::{Error, Result};
use crate::record::{TranslationRecord, TranslationSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Number of characters shown on each side of a parse error
pub const CONTEXT_RADIUS: usize = 100;

/// Which files in a content directory are translation files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFilter {
    /// File extension without the dot (e.g., "json")
    pub extension: String,
    /// File name excluded from processing (e.g., "package.json")
    pub manifest: String,
}

impl Default for FileFilter {
    fn default() -> Self {
        Self {
            extension: "json".to_string(),
            manifest: "package.json".to_string(),
        }
    }
}

impl FileFilter {
    /// Check whether a path qualifies as a translation file
    pub fn matches(&self, path: &Path) -> bool {
        let is_manifest = path
            .file_name()
            .is_some_and(|name| name == self.manifest.as_str());
        let has_extension = path
            .extension()
            .is_some_and(|ext| ext == self.extension.as_str());
        has_extension && !is_manifest
    }
}

/// A translation set together with the file it came from
#[derive(Debug, Clone)]
pub struct LoadedFile {
    pub path: PathBuf,
    pub translations: TranslationSet,
}

/// Location and surrounding text of a parse failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseContext {
    /// 1-based line reported by the parser
    pub line: usize,
    /// 1-based column reported by the parser
    pub column: usize,
    /// Character offset of the failure within the whole text
    pub offset: usize,
    /// Up to [`CONTEXT_RADIUS`] characters before and after the offset
    pub snippet: String,
    /// Character position of the failure within `snippet`
    pub caret: usize,
}

impl ParseContext {
    /// Build a context window around a byte offset into `text`
    pub fn from_offset(text: &str, byte_offset: usize, line: usize, column: usize) -> Self {
        let mut byte_offset = byte_offset.min(text.len());
        while !text.is_char_boundary(byte_offset) {
            byte_offset -= 1;
        }

        let offset = text[..byte_offset].chars().count();
        let total = text.chars().count();
        let start = offset.saturating_sub(CONTEXT_RADIUS);
        let end = (offset + CONTEXT_RADIUS).min(total);
        let snippet: String = text.chars().skip(start).take(end - start).collect();

        Self {
            line,
            column,
            offset,
            snippet,
            caret: offset - start,
        }
    }

    /// Build a context from a serde_json error, if it carries a position
    pub fn from_json_error(text: &str, error: &serde_json::Error) -> Option<Self> {
        if error.line() == 0 {
            return None;
        }
        let line_start: usize = text
            .split_inclusive('\n')
            .take(error.line() - 1)
            .map(str::len)
            .sum();
        let byte_offset = line_start + error.column().saturating_sub(1);
        Some(Self::from_offset(text, byte_offset, error.line(), error.column()))
    }
}

impl fmt::Display for ParseContext {
    /// Renders the snippet with a caret line under the failing character
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chars: Vec<char> = self.snippet.chars().collect();
        let caret = self.caret.min(chars.len());

        let line_end = chars[caret..]
            .iter()
            .position(|&c| c == '\n')
            .map_or(chars.len(), |p| caret + p);
        let line_start = chars[..caret]
            .iter()
            .rposition(|&c| c == '\n')
            .map_or(0, |p| p + 1);

        let head: String = chars[..line_end].iter().collect();
        writeln!(f, "  --> line {}, column {}", self.line, self.column)?;
        writeln!(f, "{}", head)?;
        write!(f, "{}^", " ".repeat(caret - line_start))?;
        if line_end < chars.len() {
            let tail: String = chars[line_end..].iter().collect();
            write!(f, "{}", tail)?;
        }
        Ok(())
    }
}

/// List the qualifying translation files directly inside `dir`, sorted by name
pub fn list_files<P: AsRef<Path>>(dir: P, filter: &FileFilter) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(Error::NotADirectory(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if entry.file_type().is_file() && filter.matches(entry.path()) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Parse JSON text into a translation set
///
/// `path` is only used for error reporting.
pub fn parse_translation_set(content: &str, path: &Path) -> Result<TranslationSet> {
    let value: Value = serde_json::from_str(content).map_err(|e| Error::InvalidFile {
        path: path.to_path_buf(),
        message: e.to_string(),
        context: ParseContext::from_json_error(content, &e),
    })?;

    let items = match value {
        Value::Array(items) => items,
        _ => {
            return Err(Error::InvalidFile {
                path: path.to_path_buf(),
                message: "expected a JSON array of translation records".to_string(),
                context: None,
            })
        }
    };

    let set = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            TranslationRecord::from_value(item).map_err(|message| Error::InvalidRecord {
                path: path.to_path_buf(),
                index,
                message,
            })
        })
        .collect::<Result<TranslationSet>>()?;

    let duplicates = set.duplicate_languages();
    if !duplicates.is_empty() {
        warn!(
            "{} contains duplicate languages: {}",
            path.display(),
            duplicates.join(", ")
        );
    }

    Ok(set)
}

/// Read and parse a single translation file
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<TranslationSet> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let set = parse_translation_set(&content, path)?;
    debug!("loaded {} records from {}", set.len(), path.display());
    Ok(set)
}

/// Load every qualifying file in a directory, failing on the first bad one
pub fn load_directory<P: AsRef<Path>>(dir: P, filter: &FileFilter) -> Result<Vec<LoadedFile>> {
    list_files(dir, filter)?
        .into_iter()
        .map(|path| {
            let translations = load_file(&path)?;
            Ok(LoadedFile { path, translations })
        })
        .collect()
}
