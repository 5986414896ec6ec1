//! Sclicky CLI
//!
//! Command-line interface for Sclicky - save links, count clicks, search
//! and prune them.

use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use sclicky_core::{Config, FileStore, LinkRegistry};

mod commands;
mod loading;
mod output;
mod prompt;

use loading::LoadingScreen;
use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "sclicky")]
#[command(about = "Sclicky - your social links, saved locally")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use this config file instead of the default
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Save a new link
    Add {
        /// URL to save
        url: String,
        /// Platform label (Twitter, Instagram, Facebook, LinkedIn, YouTube, TikTok, Other)
        #[arg(short, long)]
        platform: Option<String>,
    },
    /// List all saved links
    #[command(alias = "ls")]
    List,
    /// Show link details
    Show {
        /// Link ID (full or prefix)
        id: String,
    },
    /// Count a click and open the link in the browser
    Open {
        /// Link ID (full or prefix)
        id: String,
        /// Print the URL instead of launching a browser
        #[arg(long)]
        no_browser: bool,
    },
    /// Copy a link's URL to the clipboard
    Copy {
        /// Link ID (full or prefix)
        id: String,
    },
    /// Delete a link
    #[command(alias = "rm")]
    Delete {
        /// Link ID (full or prefix)
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Search links by URL or platform
    Search {
        /// Search query (case-insensitive)
        query: String,
    },
    /// List the platform labels
    Platforms,
    /// Show status (counts, storage location)
    Status,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, storage_key, startup_delay_ms, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let command = cli.command.unwrap_or(Commands::List);

    // Commands that don't need the registry
    match command {
        Commands::Config { command } => {
            return handle_config_command(command, cli.config.as_ref(), &output);
        }
        Commands::Platforms => {
            output.print_platforms();
            return Ok(());
        }
        _ => {}
    }

    let config = Config::load_with_cli_override(cli.config.as_ref())?;
    init_logging(&config);

    // Only list views get the loading screen
    let loading = match (&command, output.is_human()) {
        (Commands::List | Commands::Search { .. }, true) => Some(LoadingScreen::start(
            Duration::from_millis(config.startup_delay_ms),
        )),
        _ => None,
    };

    let mut registry = LinkRegistry::open(config.file_store(), config.storage_key.as_str());

    if let Some(mut loading) = loading {
        let interrupted = tokio::select! {
            _ = loading.wait() => false,
            _ = tokio::signal::ctrl_c() => true,
        };
        if interrupted {
            loading.cancel();
            return Ok(());
        }
    }

    let result = run(command, &mut registry, &config, &output);

    if let Some(e) = registry.last_persist_error() {
        output.warning(&format!("Changes are not saved yet: {}", e));
        if let Some(hint) = e.recovery_suggestion() {
            output.warning(hint);
        }
    }

    result
}

fn run(
    command: Commands,
    registry: &mut LinkRegistry<FileStore>,
    config: &Config,
    output: &Output,
) -> Result<()> {
    match command {
        Commands::Add { url, platform } => commands::link::add(registry, url, platform, output),
        Commands::List => commands::link::list(registry, output),
        Commands::Show { id } => commands::link::show(registry, id, output),
        Commands::Open { id, no_browser } => {
            commands::link::open(registry, id, no_browser, output)
        }
        Commands::Copy { id } => commands::link::copy(registry, id, output),
        Commands::Delete { id, yes } => commands::link::delete(registry, id, yes, output),
        Commands::Search { query } => commands::link::search(registry, query, output),
        Commands::Status => commands::status::show(registry, config, output),
        Commands::Platforms | Commands::Config { .. } => unreachable!(), // Handled in main
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Initialize logging
///
/// Only initializes if SCLICKY_LOG environment variable is set.
/// Logs to config.log_file when set, otherwise to stderr.
fn init_logging(config: &Config) {
    let Ok(log_level) = std::env::var("SCLICKY_LOG") else {
        return;
    };

    let env_filter = EnvFilter::new(format!("sclicky_core={},sclicky={}", log_level, log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false);

    match &config.log_file {
        Some(path) => {
            let log_file = match File::create(path) {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("Warning: Could not create log file {:?}: {}", path, e);
                    return;
                }
            };
            let _ = builder.with_ansi(false).with_writer(log_file).try_init();
            info!("Logging initialized to {:?}", path);
        }
        None => {
            let _ = builder.with_writer(std::io::stderr).try_init();
        }
    }
}
