//! Preset files
//!
//! One JSON file per preset in a fixed directory: `<directory>/<name>.json`.
//! The built-in `Default` preset is never read from or written to disk.

use super::error::{PresetError, PresetResult};
use crate::file::naming::validate_file_name;
use crate::tree::{DEFAULT_PRESET_NAME, FolderNode, Forest, default_forest};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const PRESET_EXTENSION: &str = "json";

/// On-disk wrapper; keeps the forest under a named field
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PresetFileRef<'a> {
    root_nodes: &'a [FolderNode],
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PresetFile {
    #[serde(default)]
    root_nodes: Option<Vec<FolderNode>>,
}

/// Returns true for the built-in preset name
pub fn is_reserved_name(name: &str) -> bool {
    name.trim().eq_ignore_ascii_case(DEFAULT_PRESET_NAME)
}

/// Check that `name` can be used as a preset file name.
pub fn validate_preset_name(name: &str) -> PresetResult<()> {
    validate_file_name(name).map_err(|e| PresetError::InvalidName {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

/// Reads and writes presets in one directory
#[derive(Debug, Clone)]
pub struct PresetStore {
    directory: PathBuf,
}

impl PresetStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of the file backing `name`
    pub fn preset_path(&self, name: &str) -> PathBuf {
        self.directory.join(format!("{}.{}", name, PRESET_EXTENSION))
    }

    pub fn exists(&self, name: &str) -> bool {
        is_reserved_name(name) || self.preset_path(name).is_file()
    }

    /// Write `forest` as preset `name`, replacing any existing file.
    pub fn save(&self, name: &str, forest: &Forest) -> PresetResult<PathBuf> {
        validate_preset_name(name)?;
        if is_reserved_name(name) {
            return Err(PresetError::Reserved(name.to_string()));
        }

        std::fs::create_dir_all(&self.directory)
            .map_err(|e| PresetError::io(&self.directory, e))?;

        let file = PresetFileRef {
            root_nodes: forest.roots(),
        };
        let content = serde_json::to_string_pretty(&file)
            .map_err(|e| PresetError::corrupt(name, e.to_string()))?;

        let path = self.preset_path(name);

        // Atomic write using temp file + rename
        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, &content).map_err(|e| PresetError::io(&temp_path, e))?;
        std::fs::rename(&temp_path, &path).map_err(|e| PresetError::io(&path, e))?;

        tracing::info!("Saved preset '{}' to {:?}", name, path);
        Ok(path)
    }

    /// Load preset `name`. Every call builds a new forest.
    pub fn load(&self, name: &str) -> PresetResult<Forest> {
        if is_reserved_name(name) {
            tracing::debug!("Loading built-in preset");
            return Ok(default_forest());
        }
        validate_preset_name(name)?;

        let path = self.preset_path(name);
        if !path.is_file() {
            return Err(PresetError::NotFound(name.to_string()));
        }

        let content = std::fs::read_to_string(&path).map_err(|e| PresetError::io(&path, e))?;
        let file: PresetFile = serde_json::from_str(&content)
            .map_err(|e| PresetError::corrupt(name, e.to_string()))?;
        let roots = file
            .root_nodes
            .ok_or_else(|| PresetError::corrupt(name, "missing rootNodes"))?;

        let forest = Forest::new(roots);
        forest
            .validate()
            .map_err(|e| PresetError::corrupt(name, e.to_string()))?;

        tracing::info!("Loaded preset '{}' ({} folders)", name, forest.node_count());
        Ok(forest)
    }

    /// Delete preset `name`. Returns false when there was nothing to delete.
    pub fn delete(&self, name: &str) -> PresetResult<bool> {
        validate_preset_name(name)?;
        if is_reserved_name(name) {
            return Err(PresetError::Reserved(name.to_string()));
        }

        let path = self.preset_path(name);
        if !path.is_file() {
            tracing::debug!("Preset '{}' not present, nothing to delete", name);
            return Ok(false);
        }

        std::fs::remove_file(&path).map_err(|e| PresetError::io(&path, e))?;
        tracing::info!("Deleted preset '{}'", name);
        Ok(true)
    }

    /// All preset names, `Default` first, saved presets alphabetically.
    pub fn list(&self) -> PresetResult<Vec<String>> {
        let mut names = Vec::new();

        if self.directory.is_dir() {
            let entries = std::fs::read_dir(&self.directory)
                .map_err(|e| PresetError::io(&self.directory, e))?;

            for entry in entries {
                let entry = entry.map_err(|e| PresetError::io(&self.directory, e))?;
                let path = entry.path();

                let is_json = path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext == PRESET_EXTENSION);
                if !is_json || !path.is_file() {
                    continue;
                }

                match path.file_stem().and_then(|stem| stem.to_str()) {
                    Some(stem) if !is_reserved_name(stem) => names.push(stem.to_string()),
                    Some(_) => {
                        tracing::warn!("Ignoring {:?}: name is reserved for the built-in preset", path)
                    }
                    None => tracing::warn!("Ignoring preset file with non-UTF-8 name: {:?}", path),
                }
            }
        }

        names.sort();
        names.insert(0, DEFAULT_PRESET_NAME.to_string());
        Ok(names)
    }
}
