use clap::Parser;
use assort::{
    app::{config::Config, session::Session},
    cli::{self, Cli},
    host::FsHost,
};
use std::path::PathBuf;
use tracing_subscriber::prelude::*;

fn main() {
    // Parse CLI arguments first to get verbose flag
    let cli = Cli::parse();

    // Set config directory override if --config flag was used
    if let Some(ref config_dir) = cli.config {
        assort::util::paths::set_config_dir_override(Some(config_dir.clone()));
    }

    // Get logs directory (creates if needed)
    let logs_dir = assort::util::paths::get_logs_dir().unwrap_or_else(|_| PathBuf::from("."));
    std::fs::create_dir_all(&logs_dir).ok();

    // Set up daily rotating file appender
    let file_appender = tracing_appender::rolling::daily(&logs_dir, "app.jsonl");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Set log level based on verbose flag
    let log_level = if cli.verbose {
        tracing::Level::TRACE
    } else {
        tracing::Level::INFO
    };

    // Initialize logging with JSON format for structured logs
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(tracing_subscriber::filter::LevelFilter::from_level(
                    log_level,
                )),
        )
        .init();

    tracing::info!("Starting assort...");
    if cli.verbose {
        tracing::info!("Verbose logging enabled (TRACE level)");
    }
    tracing::trace!("CLI arguments: {:?}", cli);

    if let Some(ref config_dir) = cli.config {
        tracing::info!("Using config directory override: {:?}", config_dir);
    }

    // Load configuration
    let mut config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            tracing::error!("Failed to load configuration: {:#}", e);
            drop(guard);
            std::process::exit(cli::error::INVALID_INPUT);
        }
    };

    if let Some(project) = cli.project {
        tracing::info!("Using project root override: {:?}", project);
        config.general.project_root = project;
    }
    tracing::info!("Config loaded: {:?}", config);

    let host = FsHost::new(config.project_root());
    let mut session = Session::startup(config, host);

    let exit_code = cli::handler::handle_command(cli.command, &mut session);

    // Flush the non-blocking writer before exiting
    drop(guard);
    std::process::exit(exit_code);
}
