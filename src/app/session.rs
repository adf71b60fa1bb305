//! Organiser session
//!
//! A [`Session`] owns everything that used to be process-wide state in an
//! editor integration: the active (applied) forest, the working copy being
//! edited, the preset store, the preferences and the queue of moves waiting
//! to be committed. [`Session::startup`] is the explicit initialisation
//! routine that restores the last applied preset.

use super::config::Config;
use super::preferences::Preferences;
use crate::host::{AssetHost, FsHost};
use crate::organiser::{ImportBatch, MoveOutcome, Organiser, PendingMove};
use crate::preset::store::is_reserved_name;
use crate::preset::{PresetError, PresetStore};
use crate::tree::{DEFAULT_PRESET_NAME, EnsureReport, Forest, default_forest};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Mutable copy of a forest being edited
#[derive(Debug)]
pub struct WorkingCopy {
    /// Preset the copy was taken from (or last saved as)
    pub source: String,
    pub forest: Forest,
}

pub struct Session<H = FsHost> {
    config: Config,
    host: H,
    store: PresetStore,
    preferences: Preferences,
    organiser: Organiser,
    active: Forest,
    active_name: String,
    working: Option<WorkingCopy>,
    pending: Vec<PendingMove>,
}

impl<H: AssetHost> Session<H> {
    /// Build a session and restore the last applied preset.
    ///
    /// A missing or unreadable preset falls back to `Default` with a warning.
    pub fn startup(config: Config, host: H) -> Self {
        let store = PresetStore::new(config.preset_directory_path());
        let organiser = Organiser::new(&config.organiser);

        let preferences_path = config.preferences_path();
        let preferences = Preferences::load(&preferences_path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load preferences, starting empty: {:#}", e);
            Preferences::empty(&preferences_path)
        });

        let remembered = preferences
            .last_applied_preset()
            .unwrap_or(DEFAULT_PRESET_NAME)
            .to_string();

        let (active_name, active) = match store.load(&remembered) {
            Ok(forest) => (remembered, forest),
            Err(e) => {
                tracing::warn!(
                    "Failed to restore preset '{}', using {}: {}",
                    remembered,
                    DEFAULT_PRESET_NAME,
                    e
                );
                (DEFAULT_PRESET_NAME.to_string(), default_forest())
            }
        };

        tracing::info!("Active folder structure: {}", active_name);

        Self {
            config,
            host,
            store,
            preferences,
            organiser,
            active,
            active_name,
            working: None,
            pending: Vec::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn store(&self) -> &PresetStore {
        &self.store
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// Forest used to resolve imports
    pub fn active(&self) -> &Forest {
        &self.active
    }

    pub fn active_name(&self) -> &str {
        &self.active_name
    }

    fn root_prefix(&self) -> &str {
        &self.config.structure.root_prefix
    }

    // --- Editing ---

    /// Start editing a copy of preset `name`, replacing any current working copy.
    pub fn begin_edit(&mut self, name: &str) -> Result<&mut Forest> {
        let forest = self.store.load(name)?;
        let working = self.working.insert(WorkingCopy {
            source: name.to_string(),
            forest,
        });
        Ok(&mut working.forest)
    }

    /// Start editing a copy of the active forest.
    pub fn begin_edit_from_active(&mut self) -> &mut Forest {
        let working = self.working.insert(WorkingCopy {
            source: self.active_name.clone(),
            forest: self.active.deep_clone(),
        });
        &mut working.forest
    }

    pub fn working_copy(&self) -> Option<&WorkingCopy> {
        self.working.as_ref()
    }

    pub fn working_copy_mut(&mut self) -> Option<&mut WorkingCopy> {
        self.working.as_mut()
    }

    pub fn discard_edit(&mut self) -> Option<WorkingCopy> {
        self.working.take()
    }

    /// Save the working copy as preset `name`.
    pub fn save_working_copy(&mut self, name: &str) -> Result<PathBuf> {
        let working = self
            .working
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("No folder structure is being edited"))?;

        let path = self.store.save(name, &working.forest)?;
        working.source = name.to_string();
        Ok(path)
    }

    // --- Presets ---

    pub fn list_presets(&self) -> Result<Vec<String>> {
        Ok(self.store.list()?)
    }

    pub fn load_preset(&self, name: &str) -> Result<Forest> {
        Ok(self.store.load(name)?)
    }

    /// Delete a saved preset. If it was the remembered one, the next session
    /// starts from `Default`.
    pub fn delete_preset(&mut self, name: &str) -> Result<bool> {
        let deleted = self.store.delete(name)?;
        if deleted && self.preferences.last_applied_preset() == Some(name) {
            self.preferences
                .remove(super::preferences::LAST_APPLIED_PRESET_KEY)
                .context("Failed to clear remembered preset")?;
        }
        Ok(deleted)
    }

    // --- Applying ---

    /// Materialise `forest` on disk, make it the active forest and remember
    /// `name` for the next session.
    ///
    /// Folder creation failures are per node and never abort the apply; they
    /// are listed in the returned report. Callers must only pass names that
    /// load again at startup (a saved preset or the built-in one).
    fn apply(&mut self, name: &str, forest: &Forest) -> Result<EnsureReport> {
        let root_prefix = self.root_prefix().to_string();
        let report = forest.ensure_folders_exist(&mut self.host, &root_prefix);
        self.host.refresh();

        self.active = forest.deep_clone();
        self.active_name = name.to_string();
        tracing::info!("Applied folder structure '{}'", name);

        self.preferences
            .set_last_applied_preset(name)
            .context("Failed to remember applied preset")?;

        Ok(report)
    }

    /// Load preset `name` and apply it.
    pub fn apply_preset(&mut self, name: &str) -> Result<EnsureReport> {
        let forest = self.store.load(name)?;
        self.apply(name, &forest)
    }

    /// Save the working copy as `name` and apply it.
    ///
    /// The built-in name can only be applied while the working copy still
    /// matches the built-in layout.
    pub fn apply_working_copy(&mut self, name: &str) -> Result<EnsureReport> {
        let forest = match &self.working {
            Some(working) => working.forest.deep_clone(),
            None => anyhow::bail!("No folder structure is being edited"),
        };

        if is_reserved_name(name) {
            if forest != default_forest() {
                return Err(PresetError::Reserved(name.to_string()).into());
            }
        } else {
            self.save_working_copy(name)?;
        }

        self.apply(name, &forest)
    }

    // --- Importing ---

    /// Where `asset_path` would go under the active forest
    pub fn resolve(&self, asset_path: &str) -> Option<PendingMove> {
        self.organiser.resolve(asset_path, &self.active)
    }

    /// First phase of an import: queue moves for every mapped asset.
    /// Returns how many moves were queued.
    pub fn handle_import(&mut self, batch: &ImportBatch) -> usize {
        let moves = self.organiser.dispatch(batch, &self.active);
        let queued = moves.len();
        self.pending.extend(moves);
        tracing::debug!("Queued {} moves ({} pending)", queued, self.pending.len());
        queued
    }

    pub fn pending(&self) -> &[PendingMove] {
        &self.pending
    }

    /// Second phase: commit every queued move in order.
    pub fn flush_pending(&mut self) -> Vec<MoveOutcome> {
        let pending = std::mem::take(&mut self.pending);
        let outcomes: Vec<MoveOutcome> = pending
            .iter()
            .map(|pending| self.organiser.commit(pending, &mut self.host))
            .collect();

        if outcomes.iter().any(|o| matches!(o, MoveOutcome::Moved { .. })) {
            self.host.refresh();
        }
        outcomes
    }
}
