use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while saving, loading or deleting presets
#[derive(Error, Debug)]
pub enum PresetError {
    /// Preset name cannot be used as a file name
    #[error("Invalid preset name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// The built-in preset name cannot be written or deleted
    #[error("'{0}' is a built-in preset and cannot be modified")]
    Reserved(String),

    /// No file for this preset
    #[error("Preset not found: {0}")]
    NotFound(String),

    /// File exists but is not a valid preset
    #[error("Preset '{name}' is corrupted or in the wrong format: {reason}")]
    Corrupt { name: String, reason: String },

    /// Filesystem failure
    #[error("Preset file error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for preset operations
pub type PresetResult<T> = Result<T, PresetError>;

impl PresetError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn corrupt(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Corrupt {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Validation failures are reported before anything touches the disk
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidName { .. } | Self::Reserved(_))
    }
}
