use clap::{Parser, Subcommand};

pub mod error;
pub mod handler;
pub mod output;

/// Asset organiser - keeps a project's folder layout and files in their place
#[derive(Parser, Debug)]
#[command(name = "assort")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Override config directory path
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<std::path::PathBuf>,

    /// Override the project root from the configuration
    #[arg(long, global = true, value_name = "DIR")]
    pub project: Option<std::path::PathBuf>,

    /// Enable verbose logging (TRACE level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the active folder structure or a saved preset
    Tree {
        /// Preset to show instead of the active structure
        #[arg(long)]
        preset: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show where assets would be moved, without moving them
    Resolve {
        /// Asset paths (e.g., Assets/Rock.fbx)
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Organise imported assets into their folders
    Import {
        /// Asset paths (e.g., Assets/Rock.fbx)
        #[arg(required = true)]
        paths: Vec<String>,

        /// Only list the moves that would be made
        #[arg(long)]
        dry_run: bool,
    },

    /// Create a preset's folders and make it the active structure
    Apply {
        /// Preset name
        name: String,
    },

    /// Manage presets
    Preset {
        /// Preset action
        #[command(subcommand)]
        action: PresetAction,
    },

    /// Edit the folders of a preset
    Folder {
        /// Folder action
        #[command(subcommand)]
        action: FolderAction,
    },

    /// Edit the extension mappings of a preset
    Map {
        /// Mapping action
        #[command(subcommand)]
        action: MapAction,
    },

    /// List suggested extensions and the folder each maps to
    Extensions {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        /// Configuration action
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Preset actions
#[derive(Subcommand, Debug)]
pub enum PresetAction {
    /// List saved presets
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a preset's folder structure
    Show {
        /// Preset name
        name: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a saved preset
    Delete {
        /// Preset name
        name: String,
    },

    /// Save a copy of a preset under a new name
    Copy {
        /// Source preset
        from: String,

        /// New preset name
        to: String,
    },
}

/// Folder editing actions
#[derive(Subcommand, Debug)]
pub enum FolderAction {
    /// Add a child folder
    Add {
        /// Folder name
        name: String,

        /// Path of the parent folder (e.g., Assets/Art)
        #[arg(long)]
        parent: String,

        /// Preset to edit
        #[arg(long)]
        preset: String,

        /// Save the result under another name
        #[arg(long)]
        save_as: Option<String>,
    },

    /// Remove a folder and its subtree
    Remove {
        /// Path of the folder to remove
        path: String,

        /// Preset to edit
        #[arg(long)]
        preset: String,

        /// Save the result under another name
        #[arg(long)]
        save_as: Option<String>,
    },
}

/// Mapping editing actions
#[derive(Subcommand, Debug)]
pub enum MapAction {
    /// Map an extension to a folder
    Add {
        /// Extension (e.g., .fbx)
        extension: String,

        /// Path of the target folder
        #[arg(long)]
        folder: String,

        /// Preset to edit
        #[arg(long)]
        preset: String,

        /// Save the result under another name
        #[arg(long)]
        save_as: Option<String>,
    },

    /// Remove an extension from a folder
    Remove {
        /// Extension (e.g., .fbx)
        extension: String,

        /// Path of the folder
        #[arg(long)]
        folder: String,

        /// Preset to edit
        #[arg(long)]
        preset: String,

        /// Save the result under another name
        #[arg(long)]
        save_as: Option<String>,
    },
}

/// Configuration actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Get a configuration value
    Get {
        /// Configuration key (e.g., structure.root_prefix)
        key: String,
    },

    /// Set a configuration value and save it
    Set {
        /// Configuration key (e.g., organiser.enabled)
        key: String,

        /// Configuration value (comma-separated for organiser.excluded_prefixes)
        value: String,
    },

    /// Show all configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate configuration
    Validate,
}
