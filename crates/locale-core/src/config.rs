//! Project configuration: where translation files and the variation table live

use crate::error::{Error, Result};
use crate::expander::ExpandOptions;
use crate::loader::FileFilter;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default config file name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "locale.config.json";

/// Run configuration, usually loaded from `locale.config.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Content directories holding translation files
    pub directories: Vec<PathBuf>,
    /// Variation table file
    pub variations: PathBuf,
    /// Extension of translation files, without the dot
    pub extension: String,
    /// File name skipped in every content directory
    pub manifest: String,
    /// Copy new base fields onto existing variants
    pub backfill: bool,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        let filter = FileFilter::default();
        Self {
            directories: vec![PathBuf::from("translations")],
            variations: PathBuf::from("language-variations.json"),
            extension: filter.extension,
            manifest: filter.manifest,
            backfill: true,
        }
    }
}

impl ProjectConfig {
    /// Load a config file; relative paths are resolved against its directory
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| Error::InvalidConfig {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(config.resolve(base))
    }

    /// Load `path` if it exists, otherwise fall back to the defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            debug!("no config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save the config file to JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut content = serde_json::to_string_pretty(self)?;
        content.push('\n');
        fs::write(path, content).map_err(|e| Error::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Make relative paths relative to `base`
    pub fn resolve(mut self, base: &Path) -> Self {
        self.directories = self
            .directories
            .into_iter()
            .map(|dir| join_relative(base, dir))
            .collect();
        self.variations = join_relative(base, self.variations);
        self
    }

    pub fn filter(&self) -> FileFilter {
        FileFilter {
            extension: self.extension.clone(),
            manifest: self.manifest.clone(),
        }
    }

    pub fn expand_options(&self) -> ExpandOptions {
        ExpandOptions {
            backfill: self.backfill,
        }
    }
}

fn join_relative(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: ProjectConfig = serde_json::from_str(r#"{"backfill": false}"#).unwrap();
        assert!(!config.backfill);
        assert_eq!(config.extension, "json");
        assert_eq!(config.manifest, "package.json");
        assert_eq!(config.directories, vec![PathBuf::from("translations")]);
    }

    #[test]
    fn test_load_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            r#"{"directories": ["emails", "/abs/sms"], "variations": "vars.json"}"#,
        )
        .unwrap();

        let config = ProjectConfig::load(&path).unwrap();

        assert_eq!(
            config.directories,
            vec![dir.path().join("emails"), PathBuf::from("/abs/sms")]
        );
        assert_eq!(config.variations, dir.path().join("vars.json"));
        assert!(config.backfill);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let config = ProjectConfig {
            directories: vec![PathBuf::from("content")],
            backfill: false,
            ..ProjectConfig::default()
        };

        config.save(&path).unwrap();
        let loaded = ProjectConfig::load(&path).unwrap();

        assert_eq!(loaded.directories, vec![dir.path().join("content")]);
        assert!(!loaded.backfill);
        assert_eq!(loaded.expand_options(), ExpandOptions { backfill: false });
    }

    #[test]
    fn test_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, r#"{"directories": "emails"}"#).unwrap();

        let err = ProjectConfig::load(&path).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }

    #[test]
    fn test_missing_config_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let config = ProjectConfig::load_or_default(dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config, ProjectConfig::default());
    }
}
