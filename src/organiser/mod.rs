//! Import-time dispatch
//!
//! Moving files happens in two phases. [`Organiser::dispatch`] runs while the
//! host is still processing an import and only decides where each file
//! belongs. [`Organiser::commit`] performs one move later, once the host says
//! it is safe to touch the filesystem.

use crate::app::config::OrganiserConfig;
use crate::file::naming::ensure_unique_filename;
use crate::host::AssetHost;
use crate::tree::{Forest, extension_of};
use crate::util::paths::{file_name_of, join_asset_path, normalize_asset_path, same_asset_path};
use serde::{Deserialize, Serialize};

/// Paths reported by the host after an import. Only `imported` is acted on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportBatch {
    pub imported: Vec<String>,
    #[serde(default)]
    pub deleted: Vec<String>,
    #[serde(default)]
    pub moved: Vec<String>,
    #[serde(default)]
    pub moved_from: Vec<String>,
}

impl ImportBatch {
    pub fn imported<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            imported: paths.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

/// A resolved move waiting to be committed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingMove {
    pub asset_path: String,
    pub destination_folder: String,
}

/// Result of committing a [`PendingMove`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MoveOutcome {
    Moved { from: String, to: String },
    AlreadyInPlace { path: String },
    SourceMissing { path: String },
    Failed { from: String, to: String, error: String },
}

impl MoveOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Decides where imported assets go and moves them
#[derive(Debug, Clone)]
pub struct Organiser {
    enabled: bool,
    excluded_prefixes: Vec<String>,
}

impl Organiser {
    pub fn new(config: &OrganiserConfig) -> Self {
        Self {
            enabled: config.enabled,
            excluded_prefixes: config
                .excluded_prefixes
                .iter()
                .map(|prefix| normalize_asset_path(prefix))
                .collect(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn is_excluded(&self, asset_path: &str) -> bool {
        self.excluded_prefixes
            .iter()
            .any(|prefix| asset_path.starts_with(prefix.as_str()))
    }

    /// Where `asset_path` belongs according to `forest`, if anywhere.
    pub fn resolve(&self, asset_path: &str, forest: &Forest) -> Option<PendingMove> {
        let asset_path = normalize_asset_path(asset_path);

        if self.is_excluded(&asset_path) {
            tracing::trace!("Skipping excluded asset: {}", asset_path);
            return None;
        }

        let extension = extension_of(&asset_path)?;
        match forest.find_target_path(&extension) {
            Some(destination) => Some(PendingMove {
                asset_path,
                destination_folder: destination.to_string(),
            }),
            None => {
                tracing::debug!(
                    "No defined folder found in structure for extension: {} (Asset: {})",
                    extension,
                    asset_path
                );
                None
            }
        }
    }

    /// First phase: resolve every imported path of a batch.
    pub fn dispatch(&self, batch: &ImportBatch, forest: &Forest) -> Vec<PendingMove> {
        if !self.enabled {
            tracing::debug!("Organiser disabled, ignoring {} imported assets", batch.imported.len());
            return Vec::new();
        }

        batch
            .imported
            .iter()
            .filter_map(|path| self.resolve(path, forest))
            .collect()
    }

    /// Second phase: perform one move through the host.
    pub fn commit<H>(&self, pending: &PendingMove, host: &mut H) -> MoveOutcome
    where
        H: AssetHost + ?Sized,
    {
        let asset_path = &pending.asset_path;

        if !host.asset_exists(asset_path) {
            tracing::debug!("Asset '{}' no longer exists, skipping move", asset_path);
            return MoveOutcome::SourceMissing {
                path: asset_path.clone(),
            };
        }

        let file_name = file_name_of(asset_path);
        let target = join_asset_path(&pending.destination_folder, file_name);

        if same_asset_path(asset_path, &target) {
            tracing::debug!(
                "Asset '{}' is already in the correct folder '{}'",
                file_name,
                pending.destination_folder
            );
            return MoveOutcome::AlreadyInPlace {
                path: asset_path.clone(),
            };
        }

        let unique_name =
            ensure_unique_filename(&pending.destination_folder, file_name, |p| host.asset_exists(p));
        let target = if unique_name != file_name {
            let unique = join_asset_path(&pending.destination_folder, &unique_name);
            tracing::warn!("Asset already exists at '{}'. Moving to '{}' instead.", target, unique);
            unique
        } else {
            target
        };

        match host.move_asset(asset_path, &target) {
            Ok(()) => {
                tracing::info!("Asset moved to: {}", target);
                MoveOutcome::Moved {
                    from: asset_path.clone(),
                    to: target,
                }
            }
            Err(error) => {
                tracing::error!(
                    "Asset move failed for '{}' to '{}'. Error: {}",
                    asset_path,
                    target,
                    error
                );
                MoveOutcome::Failed {
                    from: asset_path.clone(),
                    to: target,
                    error,
                }
            }
        }
    }
}
