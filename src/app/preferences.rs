//! Per-project preferences
//!
//! A small key/value store kept next to the project (by default
//! `UserSettings/AssetOrganiser.toml`). Every write is persisted at once.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Key holding the name of the last applied preset
pub const LAST_APPLIED_PRESET_KEY: &str = "last_applied_preset";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(skip)]
    path: PathBuf,
    #[serde(default)]
    values: BTreeMap<String, String>,
}

impl Preferences {
    /// Empty store that will be written to `path`
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            values: BTreeMap::new(),
        }
    }

    /// Load preferences; a missing file yields an empty store
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::empty(path));
        }

        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read preferences {:?}", path))?;
        let mut preferences: Preferences = toml::from_str(&content)
            .context(format!("Failed to parse preferences {:?}", path))?;
        preferences.path = path.to_path_buf();
        Ok(preferences)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Set a value and persist the store
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.save()
    }

    /// Remove a value and persist the store; returns whether it was present
    pub fn remove(&mut self, key: &str) -> Result<bool> {
        let removed = self.values.remove(key).is_some();
        if removed {
            self.save()?;
        }
        Ok(removed)
    }

    pub fn last_applied_preset(&self) -> Option<&str> {
        self.get(LAST_APPLIED_PRESET_KEY)
    }

    pub fn set_last_applied_preset(&mut self, name: &str) -> Result<()> {
        self.set(LAST_APPLIED_PRESET_KEY, name)
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .context(format!("Failed to create {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self)?;

        let temp_path = self.path.with_extension("toml.tmp");
        std::fs::write(&temp_path, &content)
            .context("Failed to write temp preferences file")?;
        std::fs::rename(&temp_path, &self.path)
            .context("Failed to rename temp preferences file")?;

        tracing::debug!("Saved preferences to {:?}", self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let prefs = Preferences::load(temp_dir.path().join("prefs.toml")).unwrap();
        assert!(prefs.last_applied_preset().is_none());
    }

    #[test]
    fn test_set_persists_immediately() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("UserSettings").join("prefs.toml");

        let mut prefs = Preferences::load(&path).unwrap();
        prefs.set_last_applied_preset("Mobile").unwrap();

        let reloaded = Preferences::load(&path).unwrap();
        assert_eq!(reloaded.last_applied_preset(), Some("Mobile"));
        assert_eq!(reloaded.path(), path.as_path());
    }

    #[test]
    fn test_remove() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("prefs.toml");

        let mut prefs = Preferences::empty(&path);
        prefs.set("other", "value").unwrap();
        prefs.set_last_applied_preset("Mobile").unwrap();

        assert!(prefs.remove(LAST_APPLIED_PRESET_KEY).unwrap());
        assert!(!prefs.remove(LAST_APPLIED_PRESET_KEY).unwrap());

        let reloaded = Preferences::load(&path).unwrap();
        assert!(reloaded.last_applied_preset().is_none());
        assert_eq!(reloaded.get("other"), Some("value"));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("prefs.toml");
        std::fs::write(&path, "values = 12 [[[").unwrap();
        assert!(Preferences::load(&path).is_err());
    }
}
