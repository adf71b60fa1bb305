use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration (saved to config/settings.toml)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub structure: StructureConfig,
    #[serde(default)]
    pub organiser: OrganiserConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Directory containing `Assets/`; relative paths resolve against the CWD
    #[serde(default = "default_project_root")]
    pub project_root: PathBuf,
}

fn default_project_root() -> PathBuf {
    PathBuf::from(".")
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            project_root: default_project_root(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureConfig {
    /// Every folder that may be created must live under this prefix
    #[serde(default = "default_root_prefix")]
    pub root_prefix: String,
    /// Project-relative directory holding `<preset>.json` files
    #[serde(default = "default_preset_directory")]
    pub preset_directory: String,
    /// Project-relative file for per-project preferences
    #[serde(default = "default_preferences_file")]
    pub preferences_file: String,
}

fn default_root_prefix() -> String {
    crate::tree::ROOT_MARKER.to_string()
}

fn default_preset_directory() -> String {
    "Assets/Editor/AssetOrganiser/Presets".to_string()
}

fn default_preferences_file() -> String {
    "UserSettings/AssetOrganiser.toml".to_string()
}

impl Default for StructureConfig {
    fn default() -> Self {
        Self {
            root_prefix: default_root_prefix(),
            preset_directory: default_preset_directory(),
            preferences_file: default_preferences_file(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganiserConfig {
    /// Move imported assets at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Assets under these prefixes are never moved
    #[serde(default = "default_excluded_prefixes")]
    pub excluded_prefixes: Vec<String>,
}

fn default_enabled() -> bool {
    true
}

fn default_excluded_prefixes() -> Vec<String> {
    vec!["Assets/Editor/".to_string()]
}

impl Default for OrganiserConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            excluded_prefixes: default_excluded_prefixes(),
        }
    }
}

impl Config {
    /// Load configuration from the config directory, falling back to defaults
    pub fn load() -> anyhow::Result<Self> {
        use anyhow::Context;

        let config_path = crate::util::paths::get_app_config_path()?;

        let config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .context(format!("Failed to read {:?}", config_path))?;
            toml::from_str(&content).context(format!("Failed to parse {:?}", config_path))?
        } else {
            tracing::info!("Application config not found, using defaults");
            Self::default()
        };

        config.validated()
    }

    /// Save configuration to the config directory
    pub fn save(&self) -> anyhow::Result<()> {
        use anyhow::Context;

        if let Err(errors) = crate::app::settings::validate_config(self) {
            return Err(anyhow::anyhow!(
                "Cannot save invalid config: {}",
                errors
                    .iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }

        let config_path = crate::util::paths::get_app_config_path()?;

        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;

        // Atomic write using temp file + rename
        let temp_path = config_path.with_extension("toml.tmp");
        std::fs::write(&temp_path, &content)
            .context("Failed to write temp config file")?;
        std::fs::rename(&temp_path, &config_path)
            .context("Failed to rename temp config file")?;

        tracing::info!("Saved application config to {:?}", config_path);
        Ok(())
    }

    fn validated(self) -> anyhow::Result<Self> {
        if let Err(errors) = crate::app::settings::validate_config(&self) {
            return Err(anyhow::anyhow!(
                "Invalid configuration: {}",
                errors
                    .iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }
        Ok(self)
    }

    pub fn project_root(&self) -> PathBuf {
        self.general.project_root.clone()
    }

    /// Absolute-or-CWD-relative location of the preset directory
    pub fn preset_directory_path(&self) -> PathBuf {
        crate::util::paths::resolve_in_project(
            &self.general.project_root,
            &self.structure.preset_directory,
        )
    }

    pub fn preferences_path(&self) -> PathBuf {
        crate::util::paths::resolve_in_project(
            &self.general.project_root,
            &self.structure.preferences_file,
        )
    }

    #[cfg(test)]
    fn load_from(path: &std::path::Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str::<Self>(&content)?.validated()
        } else {
            Ok(Self::default())
        }
    }

    #[cfg(test)]
    fn save_to(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
