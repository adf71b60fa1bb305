//! Folder structure model
//!
//! The desired project layout is a forest of [`FolderNode`]s. Each node may
//! own a set of file extensions; within one forest an extension belongs to at
//! most one node.

pub mod defaults;
pub mod error;
pub mod extension;
pub mod forest;
pub mod node;

pub use defaults::{DEFAULT_PRESET_NAME, ROOT_MARKER, default_forest};
pub use error::{TreeError, TreeResult};
pub use extension::{extension_of, normalize_extension};
pub use forest::{EnsureReport, Forest};
pub use node::{FolderNode, NodeId};
