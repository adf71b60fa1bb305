use thiserror::Error;

/// Errors raised while editing a folder tree
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// Folder name is blank or contains characters the filesystem rejects
    #[error("Invalid folder name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// Extension could not be normalised
    #[error("Invalid extension '{extension}': {reason}")]
    InvalidExtension { extension: String, reason: String },

    /// No node with the given id or path
    #[error("Folder not found: {0}")]
    NodeNotFound(String),

    /// Another node already uses this path
    #[error("A folder with path '{0}' already exists")]
    DuplicatePath(String),

    /// The project root folder cannot be removed
    #[error("The root folder '{0}' cannot be removed")]
    ProtectedRoot(String),

    /// Extension is already mapped to a different folder
    #[error("Extension '{extension}' is already mapped to '{owner_name}' ({owner_path})")]
    ExtensionConflict {
        extension: String,
        owner_name: String,
        owner_path: String,
    },
}

impl TreeError {
    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_extension(extension: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidExtension {
            extension: extension.into(),
            reason: reason.into(),
        }
    }

    /// Returns true for user input problems (as opposed to lookups and conflicts)
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidName { .. } | Self::InvalidExtension { .. })
    }
}

/// Result type for tree operations
pub type TreeResult<T> = Result<T, TreeError>;
