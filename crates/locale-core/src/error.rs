//! Error types for locale-core

use crate::loader::ParseContext;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in locale-core
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File content is not valid JSON
    #[error("invalid JSON in '{path}': {message}{}", render_context(.context))]
    InvalidFile {
        path: PathBuf,
        message: String,
        context: Option<ParseContext>,
    },

    /// File parsed but is not an array of translation records
    #[error("invalid translation record #{index} in '{path}': {message}")]
    InvalidRecord {
        path: PathBuf,
        index: usize,
        message: String,
    },

    /// Variation table is not a map of family name to variant code list
    #[error("invalid variation table '{path}': {message}")]
    InvalidVariationTable { path: PathBuf, message: String },

    /// Project configuration file could not be understood
    #[error("invalid config '{path}': {message}")]
    InvalidConfig { path: PathBuf, message: String },

    /// A content directory does not exist
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Directory traversal error
    #[error("failed to traverse directory: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Suggested fixes shown to the user alongside the error
    pub fn remedies(&self) -> Vec<String> {
        match self {
            Error::FileRead { path, .. } => vec![
                format!("check that '{}' exists and is readable", path.display()),
            ],
            Error::FileWrite { path, .. } => vec![
                format!("check write permissions for '{}'", path.display()),
                "make sure no other process holds the file open".to_string(),
            ],
            Error::InvalidFile { path, .. } => vec![
                format!("fix the JSON syntax in '{}' near the marked position", path.display()),
                "look for trailing commas, missing quotes or unbalanced brackets".to_string(),
                "run `locale-cli validate` to list every malformed file at once".to_string(),
            ],
            Error::InvalidRecord { .. } => vec![
                "each file must be a JSON array of objects".to_string(),
                "every object needs string \"language\" and \"language_name\" fields".to_string(),
            ],
            Error::InvalidVariationTable { .. } => vec![
                "the variation table must map each family name to a list of locale codes"
                    .to_string(),
                "example: { \"English\": [\"en\", \"en-US\", \"en-GB\"] }".to_string(),
            ],
            Error::InvalidConfig { .. } => vec![
                "run `locale-cli init-config` to generate a fresh template".to_string(),
            ],
            Error::NotADirectory(path) => vec![
                format!("create '{}' or remove it from the configured directories", path.display()),
            ],
            Error::WalkDir(_) | Error::Io(_) => vec![
                "check that the content directories exist and are readable".to_string(),
            ],
            Error::Json(_) => Vec::new(),
        }
    }
}

fn render_context(context: &Option<ParseContext>) -> String {
    match context {
        Some(ctx) => format!("\n{}", ctx),
        None => String::new(),
    }
}
