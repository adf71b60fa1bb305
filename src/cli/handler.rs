use super::error;
use super::output;
use super::{Commands, ConfigAction, FolderAction, MapAction, PresetAction};
use crate::app::config::Config;
use crate::app::settings::validate_config;
use crate::host::AssetHost;
use crate::organiser::ImportBatch;
use crate::preset::PresetError;
use crate::tree::defaults::suggested_extensions;
use crate::tree::{Forest, TreeError};
use crate::Session;
use anyhow::Result;

/// Handle a CLI command and return exit code
pub fn handle_command<H: AssetHost>(command: Commands, session: &mut Session<H>) -> i32 {
    let result = match command {
        Commands::Tree { preset, json } => handle_tree(session, preset, json),
        Commands::Resolve { paths } => handle_resolve(session, &paths),
        Commands::Import { paths, dry_run } => handle_import(session, paths, dry_run),
        Commands::Apply { name } => handle_apply(session, &name),
        Commands::Preset { action } => handle_preset(action, session),
        Commands::Folder { action } => handle_folder(action, session),
        Commands::Map { action } => handle_map(action, session),
        Commands::Extensions { json } => handle_extensions(session, json),
        Commands::Config { action } => handle_config(action, session),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            exit_code_for(&e)
        }
    }
}

/// Map typed errors to automation-friendly exit codes
fn exit_code_for(err: &anyhow::Error) -> i32 {
    if let Some(tree_error) = err.downcast_ref::<TreeError>() {
        return match tree_error {
            TreeError::NodeNotFound(_) => error::NOT_FOUND,
            TreeError::DuplicatePath(_) | TreeError::ExtensionConflict { .. } => error::CONFLICT,
            TreeError::ProtectedRoot(_) => error::INVALID_INPUT,
            e if e.is_validation() => error::INVALID_INPUT,
            _ => error::ERROR,
        };
    }

    if let Some(preset_error) = err.downcast_ref::<PresetError>() {
        return match preset_error {
            PresetError::NotFound(_) => error::NOT_FOUND,
            e if e.is_validation() => error::INVALID_INPUT,
            _ => error::ERROR,
        };
    }

    error::ERROR
}

/// Show the active structure or a saved preset
fn handle_tree<H: AssetHost>(session: &Session<H>, preset: Option<String>, json: bool) -> Result<i32> {
    match preset {
        Some(name) => {
            let forest = session.load_preset(&name)?;
            println!("{}", output::format_tree(&forest, json));
        }
        None => {
            if !json {
                println!("Active: {}\n", session.active_name());
            }
            println!("{}", output::format_tree(session.active(), json));
        }
    }
    Ok(error::SUCCESS)
}

/// Show where each path would go
fn handle_resolve<H: AssetHost>(session: &Session<H>, paths: &[String]) -> Result<i32> {
    for path in paths {
        match session.resolve(path) {
            Some(pending) => println!("{} -> {}", pending.asset_path, pending.destination_folder),
            None => println!("{} -> (not organised)", path),
        }
    }
    Ok(error::SUCCESS)
}

/// Dispatch and commit moves for the given paths
fn handle_import<H: AssetHost>(session: &mut Session<H>, paths: Vec<String>, dry_run: bool) -> Result<i32> {
    let batch = ImportBatch::imported(paths);
    let queued = session.handle_import(&batch);

    if queued == 0 {
        println!("Nothing to organise.");
        return Ok(error::SUCCESS);
    }

    if dry_run {
        println!("{}", output::format_pending(session.pending()));
        return Ok(error::SUCCESS);
    }

    let outcomes = session.flush_pending();
    for outcome in &outcomes {
        println!("{}", output::format_outcome(outcome));
    }

    if outcomes.iter().any(|o| o.is_failure()) {
        Ok(error::ERROR)
    } else {
        Ok(error::SUCCESS)
    }
}

/// Apply a preset
fn handle_apply<H: AssetHost>(session: &mut Session<H>, name: &str) -> Result<i32> {
    let report = session.apply_preset(name)?;
    println!("Applied '{}'", name);
    println!("{}", output::format_report(&report));

    if report.failed.is_empty() {
        Ok(error::SUCCESS)
    } else {
        Ok(error::ERROR)
    }
}

fn handle_preset<H: AssetHost>(action: PresetAction, session: &mut Session<H>) -> Result<i32> {
    match action {
        PresetAction::List { json } => {
            let names = session.list_presets()?;
            println!("{}", output::format_presets(&names, session.active_name(), json));
            Ok(error::SUCCESS)
        }
        PresetAction::Show { name, json } => {
            let forest = session.load_preset(&name)?;
            println!("{}", output::format_tree(&forest, json));
            Ok(error::SUCCESS)
        }
        PresetAction::Delete { name } => {
            if session.delete_preset(&name)? {
                println!("Deleted preset: {}", name);
                Ok(error::SUCCESS)
            } else {
                Err(PresetError::NotFound(name).into())
            }
        }
        PresetAction::Copy { from, to } => {
            session.begin_edit(&from)?;
            let result = session.save_working_copy(&to);
            session.discard_edit();
            let path = result?;
            println!("Saved '{}' as '{}' ({})", from, to, path.display());
            Ok(error::SUCCESS)
        }
    }
}

/// Load `preset`, apply `edit` to it and save it back (or under `save_as`).
/// Nothing is written if the edit fails.
fn edit_preset<H, F>(session: &mut Session<H>, preset: &str, save_as: Option<String>, edit: F) -> Result<String>
where
    H: AssetHost,
    F: FnOnce(&mut Forest, &str) -> Result<String>,
{
    let root_prefix = session.config().structure.root_prefix.clone();
    let forest = session.begin_edit(preset)?;

    let result = edit(forest, &root_prefix).and_then(|message| {
        let target = save_as.unwrap_or_else(|| preset.to_string());
        session.save_working_copy(&target)?;
        Ok(format!("{} (saved as '{}')", message, target))
    });

    session.discard_edit();
    result
}

fn handle_folder<H: AssetHost>(action: FolderAction, session: &mut Session<H>) -> Result<i32> {
    let message = match action {
        FolderAction::Add { name, parent, preset, save_as } => {
            edit_preset(session, &preset, save_as, |forest, _| {
                let parent_id = forest
                    .find_by_path(&parent)
                    .map(|node| node.id)
                    .ok_or_else(|| TreeError::NodeNotFound(parent.clone()))?;
                let id = forest.add_folder(parent_id, &name)?;
                let path = forest.find(id).map(|node| node.path.clone()).unwrap_or_default();
                Ok(format!("Added folder {}", path))
            })?
        }
        FolderAction::Remove { path, preset, save_as } => {
            edit_preset(session, &preset, save_as, |forest, root_prefix| {
                let id = forest
                    .find_by_path(&path)
                    .map(|node| node.id)
                    .ok_or_else(|| TreeError::NodeNotFound(path.clone()))?;
                let removed = forest.remove_folder(id, root_prefix)?;
                Ok(format!("Removed folder {}", removed.path))
            })?
        }
    };

    println!("{}", message);
    Ok(error::SUCCESS)
}

fn handle_map<H: AssetHost>(action: MapAction, session: &mut Session<H>) -> Result<i32> {
    let message = match action {
        MapAction::Add { extension, folder, preset, save_as } => {
            edit_preset(session, &preset, save_as, |forest, _| {
                let id = forest
                    .find_by_path(&folder)
                    .map(|node| node.id)
                    .ok_or_else(|| TreeError::NodeNotFound(folder.clone()))?;
                let extension = forest.add_mapping(id, &extension)?;
                Ok(format!("Mapped {} to {}", extension, folder))
            })?
        }
        MapAction::Remove { extension, folder, preset, save_as } => {
            edit_preset(session, &preset, save_as, |forest, _| {
                let id = forest
                    .find_by_path(&folder)
                    .map(|node| node.id)
                    .ok_or_else(|| TreeError::NodeNotFound(folder.clone()))?;
                if forest.remove_mapping(id, &extension)? {
                    Ok(format!("Unmapped {} from {}", extension, folder))
                } else {
                    Err(TreeError::NodeNotFound(format!("{} in {}", extension, folder)).into())
                }
            })?
        }
    };

    println!("{}", message);
    Ok(error::SUCCESS)
}

/// Suggested extensions with their current owner in the active structure
fn handle_extensions<H: AssetHost>(session: &Session<H>, json: bool) -> Result<i32> {
    let entries: Vec<output::ExtensionEntry> = suggested_extensions()
        .into_iter()
        .map(|extension| output::ExtensionEntry {
            extension: extension.to_string(),
            folder: session.active().find_target_path(extension).map(str::to_string),
        })
        .collect();

    println!("{}", output::format_extensions(&entries, json));
    Ok(error::SUCCESS)
}

fn handle_config<H: AssetHost>(action: ConfigAction, session: &Session<H>) -> Result<i32> {
    match action {
        ConfigAction::Get { key } => {
            println!("{}", get_config_value(session.config(), &key)?);
            Ok(error::SUCCESS)
        }
        ConfigAction::Set { key, value } => {
            let mut config = session.config().clone();
            set_config_value(&mut config, &key, &value)?;
            config.save()?;
            println!("Configuration updated: {} = {}", key, value);
            Ok(error::SUCCESS)
        }
        ConfigAction::Show { json } => {
            let config = session.config();
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("{}", toml::to_string_pretty(config)?);
            }
            Ok(error::SUCCESS)
        }
        ConfigAction::Validate => match validate_config(session.config()) {
            Ok(()) => {
                println!("Configuration is valid");
                Ok(error::SUCCESS)
            }
            Err(errors) => {
                println!("Configuration has {} error(s):", errors.len());
                for e in &errors {
                    println!("  - {}", e);
                }
                Ok(error::INVALID_INPUT)
            }
        },
    }
}

/// Get configuration value by dot notation key
fn get_config_value(config: &Config, key: &str) -> Result<String> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["general", "project_root"] => Ok(config.general.project_root.display().to_string()),
        ["structure", "root_prefix"] => Ok(config.structure.root_prefix.clone()),
        ["structure", "preset_directory"] => Ok(config.structure.preset_directory.clone()),
        ["structure", "preferences_file"] => Ok(config.structure.preferences_file.clone()),
        ["organiser", "enabled"] => Ok(config.organiser.enabled.to_string()),
        ["organiser", "excluded_prefixes"] => Ok(config.organiser.excluded_prefixes.join(",")),
        _ => Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }
}

/// Set configuration value by dot notation key
fn set_config_value(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["general", "project_root"] => config.general.project_root = value.into(),
        ["structure", "root_prefix"] => config.structure.root_prefix = value.to_string(),
        ["structure", "preset_directory"] => config.structure.preset_directory = value.to_string(),
        ["structure", "preferences_file"] => config.structure.preferences_file = value.to_string(),
        ["organiser", "enabled"] => config.organiser.enabled = value.parse()?,
        ["organiser", "excluded_prefixes"] => {
            config.organiser.excluded_prefixes = value
                .split(',')
                .map(str::trim)
                .filter(|prefix| !prefix.is_empty())
                .map(str::to_string)
                .collect()
        }
        _ => return Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }

    Ok(())
}
