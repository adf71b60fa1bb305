use super::AssetHost;
use crate::util::paths::{join_asset_path, resolve_in_project};
use std::path::{Path, PathBuf};

/// [`AssetHost`] backed by the plain filesystem under a project root
#[derive(Debug, Clone)]
pub struct FsHost {
    project_root: PathBuf,
}

impl FsHost {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        resolve_in_project(&self.project_root, path)
    }

    fn meta_path(path: &Path) -> PathBuf {
        let mut meta = path.as_os_str().to_owned();
        meta.push(".meta");
        PathBuf::from(meta)
    }
}

impl AssetHost for FsHost {
    fn folder_exists(&self, path: &str) -> bool {
        self.resolve(path).is_dir()
    }

    fn asset_exists(&self, path: &str) -> bool {
        self.resolve(path).is_file()
    }

    fn create_folder(&mut self, parent: &str, leaf: &str) -> Option<String> {
        let relative = join_asset_path(parent, leaf);
        let full = self.resolve(&relative);
        match std::fs::create_dir(&full) {
            Ok(()) => {
                tracing::debug!("Created folder {:?}", full);
                Some(relative)
            }
            Err(e) => {
                tracing::error!("Failed to create folder {:?}: {}", full, e);
                None
            }
        }
    }

    fn move_asset(&mut self, from: &str, to: &str) -> Result<(), String> {
        let source = self.resolve(from);
        let target = self.resolve(to);

        if !source.is_file() {
            return Err(format!("Source asset '{}' does not exist", from));
        }
        if target.exists() {
            return Err(format!("Destination '{}' already exists", to));
        }
        match target.parent() {
            Some(parent) if parent.is_dir() => {}
            _ => return Err(format!("Destination folder for '{}' does not exist", to)),
        }

        std::fs::rename(&source, &target)
            .map_err(|e| format!("Failed to move '{}' to '{}': {}", from, to, e))?;

        // Keep the sidecar next to its asset
        let source_meta = Self::meta_path(&source);
        if source_meta.is_file() {
            let target_meta = Self::meta_path(&target);
            if let Err(e) = std::fs::rename(&source_meta, &target_meta) {
                tracing::warn!("Moved '{}' but not its .meta file: {}", from, e);
            }
        }

        Ok(())
    }

    fn refresh(&mut self) {
        tracing::debug!("Refresh requested for {:?}", self.project_root);
    }
}
