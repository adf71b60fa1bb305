use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

// Global config directory override (for --config flag and tests)
static CONFIG_DIR_OVERRIDE: RwLock<Option<PathBuf>> = RwLock::new(None);

/// Set config directory override (used by --config flag and tests)
pub fn set_config_dir_override(path: Option<PathBuf>) {
    let mut override_path = CONFIG_DIR_OVERRIDE
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *override_path = path;
}

/// Get current config directory override
pub fn get_config_dir_override() -> Option<PathBuf> {
    CONFIG_DIR_OVERRIDE
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone()
}

/// Find config directory by searching in priority order:
/// 1. Override from --config flag or set_config_dir_override() (highest priority)
/// 2. Environment variable ASSORT_CONFIG_DIR
/// 3. User config directory (`~/.config/assort/` on Unix, `%APPDATA%\assort\` on Windows)
/// 4. Current working directory (`./config/`)
/// 5. Executable directory (`<exe_dir>/config/`)
///
/// If no config directory is found, creates one in the user config directory.
pub fn find_config_directory() -> Result<PathBuf> {
    // Priority 1: Override from --config flag or tests
    if let Some(override_path) = get_config_dir_override() {
        if override_path.exists() || std::env::var("ASSORT_TEST_MODE").is_ok() {
            tracing::debug!("Using config directory override: {:?}", override_path);
            return Ok(override_path);
        }
        tracing::warn!("Config directory override does not exist: {:?}", override_path);
    }

    // Priority 2: Environment variable
    if let Ok(env_path) = std::env::var("ASSORT_CONFIG_DIR") {
        let env_config = PathBuf::from(env_path);
        if env_config.exists() {
            tracing::debug!("Found config directory from ASSORT_CONFIG_DIR: {:?}", env_config);
            return Ok(env_config);
        }
    }

    // Priority 3: User config directory (platform standard location)
    if let Ok(user_config) = get_user_config_dir() {
        if user_config.exists() {
            tracing::debug!("Found config directory at: {:?}", user_config);
            return Ok(user_config);
        }
    }

    // Priority 4: Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        let cwd_config = cwd.join("config");
        if cwd_config.exists() {
            tracing::debug!("Found config directory at: {:?}", cwd_config);
            return Ok(cwd_config);
        }
    }

    // Priority 5: Executable directory
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let exe_config = exe_dir.join("config");
            if exe_config.exists() {
                tracing::debug!("Found config directory at: {:?}", exe_config);
                return Ok(exe_config);
            }
        }
    }

    // Fallback: Create in user config directory
    let user_config = get_user_config_dir()?;
    std::fs::create_dir_all(&user_config)
        .context("Failed to create user config directory")?;
    tracing::info!("Created config directory at: {:?}", user_config);
    Ok(user_config)
}

/// Get platform-specific user config directory
/// - Windows: `%APPDATA%\assort`
/// - Unix: `~/.config/assort`
fn get_user_config_dir() -> Result<PathBuf> {
    let base_dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine user config directory"))?;
    Ok(base_dir.join("assort"))
}

/// Get absolute path to settings.toml (application-level)
pub fn get_app_config_path() -> Result<PathBuf> {
    let config_dir = find_config_directory()?;
    Ok(config_dir.join("settings.toml"))
}

/// Get absolute path to application-wide logs directory
pub fn get_logs_dir() -> Result<PathBuf> {
    let config_dir = find_config_directory()?;
    Ok(config_dir.join(".logs"))
}

/// Resolve a project-relative location (`Assets/Art`, `UserSettings/x.toml`)
/// against the project root on disk.
pub fn resolve_in_project(project_root: &Path, relative: &str) -> PathBuf {
    let trimmed = relative.trim_matches('/');
    if trimmed.is_empty() {
        return project_root.to_path_buf();
    }
    trimmed
        .split('/')
        .filter(|part| !part.is_empty())
        .fold(project_root.to_path_buf(), |acc, part| acc.join(part))
}

/// Convert backslashes to forward slashes and collapse repeated separators.
pub fn normalize_asset_path(path: &str) -> String {
    let replaced = path.replace('\\', "/");
    let mut result = String::with_capacity(replaced.len());
    let mut previous_slash = false;
    for c in replaced.chars() {
        if c == '/' {
            if !previous_slash {
                result.push(c);
            }
            previous_slash = true;
        } else {
            result.push(c);
            previous_slash = false;
        }
    }
    result
}

/// Join a folder path and a single name with exactly one `/`.
pub fn join_asset_path(folder: &str, name: &str) -> String {
    let folder = folder.trim_end_matches('/');
    if folder.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", folder, name)
    }
}

/// Split `Assets/Art/Models/` into `("Assets/Art", "Models")`.
///
/// A top-level folder has an empty parent.
pub fn split_parent_leaf(path: &str) -> (&str, &str) {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(pos) => (&trimmed[..pos], &trimmed[pos + 1..]),
        None => ("", trimmed),
    }
}

/// Last component of an asset path (`Assets/Art/Rock.fbx` -> `Rock.fbx`).
pub fn file_name_of(path: &str) -> &str {
    split_parent_leaf(path).1
}

/// Compare two asset paths the way the editor does: separator-normalised,
/// trailing slashes ignored, case-insensitive.
pub fn same_asset_path(a: &str, b: &str) -> bool {
    let a = normalize_asset_path(a);
    let b = normalize_asset_path(b);
    a.trim_end_matches('/')
        .eq_ignore_ascii_case(b.trim_end_matches('/'))
}
