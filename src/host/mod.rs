//! Host collaborators
//!
//! The organiser never touches the filesystem directly. Directory creation,
//! existence checks, asset moves and database refreshes go through
//! [`AssetHost`], so an editor integration can route them to its own asset
//! database while the CLI uses [`FsHost`].

pub mod fs;

pub use fs::FsHost;

/// Primitives the organiser needs from the host. All paths are
/// project-relative and `/` separated.
pub trait AssetHost {
    /// Whether `path` is an existing folder
    fn folder_exists(&self, path: &str) -> bool;

    /// Whether `path` is an existing asset file
    fn asset_exists(&self, path: &str) -> bool;

    /// Create `leaf` inside `parent` (empty parent means the project root).
    /// Returns an opaque token on success, `None` on failure.
    fn create_folder(&mut self, parent: &str, leaf: &str) -> Option<String>;

    /// Move an asset. An `Err` carries the host's error message.
    fn move_asset(&mut self, from: &str, to: &str) -> Result<(), String>;

    /// Ask the host to rescan the project
    fn refresh(&mut self);
}
