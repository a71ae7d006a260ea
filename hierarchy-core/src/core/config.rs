//! Hierarchy configuration and its JSON persistence.

use crate::{HierarchyError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Naming and journal settings for a hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HierarchyConfig {
    /// Appended to a node's name when it is duplicated.
    pub copy_suffix: String,
    /// Joins a taken name and its counter: `Folder`, `Folder-2`, `Folder-3`, ...
    pub name_separator: String,
    /// How many journal entries an [`OperationLog`](crate::OperationLog) built from this config keeps.
    pub journal_keep_last: usize,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            copy_suffix: " Copy".to_string(),
            name_separator: "-".to_string(),
            journal_keep_last: 1000,
        }
    }
}

impl HierarchyConfig {
    /// Rejects settings that would make generated names ambiguous.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyError::InvalidConfig`] for an empty separator.
    pub fn validate(&self) -> Result<()> {
        if self.name_separator.is_empty() {
            return Err(HierarchyError::InvalidConfig(
                "nameSeparator must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Loads a config from `path`; returns defaults if the file does not exist.
///
/// # Errors
///
/// Returns [`HierarchyError::Io`] if the file exists but cannot be read,
/// [`HierarchyError::Json`] if it is malformed, or
/// [`HierarchyError::InvalidConfig`] if it fails validation.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<HierarchyConfig> {
    let path = path.as_ref();
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(HierarchyConfig::default());
        }
        Err(e) => return Err(e.into()),
    };
    let config: HierarchyConfig = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Saves `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`HierarchyError::Io`] or [`HierarchyError::Json`] on failure.
pub fn save_config<P: AsRef<Path>>(path: P, config: &HierarchyConfig) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config(dir.path().join("absent.json")).unwrap();
        assert_eq!(config, HierarchyConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("hierarchy.json");
        let config = HierarchyConfig {
            copy_suffix: " (copy)".to_string(),
            ..HierarchyConfig::default()
        };
        save_config(&path, &config).unwrap();

        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded.copy_suffix, " (copy)");
        assert_eq!(loaded.journal_keep_last, 1000);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hierarchy.json");
        fs::write(&path, r#"{"journalKeepLast": 10}"#).unwrap();

        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded.journal_keep_last, 10);
        assert_eq!(loaded.copy_suffix, " Copy");
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hierarchy.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_config(&path), Err(HierarchyError::Json(_))));
    }

    #[test]
    fn test_empty_separator_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hierarchy.json");
        fs::write(&path, r#"{"nameSeparator": ""}"#).unwrap();
        assert!(matches!(load_config(&path), Err(HierarchyError::InvalidConfig(_))));
    }
}
