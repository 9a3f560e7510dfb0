mod commands;
mod render;
mod utils;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use shiftsync_core::SyncConfig;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "shiftsync")]
#[command(about = "Sync the shifts in your timesheet workbook to your calendar")]
struct Cli {
    /// Config file (defaults to ~/.config/shiftsync/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create calendar events for the shifts in the workbook (default)
    Sync,
    /// Show the shifts found in the workbook without touching the calendar
    Entries {
        /// Also list skipped columns and why
        #[arg(short, long)]
        verbose: bool,
    },
    Auth {
        #[arg(default_value = shiftsync_core::constants::DEFAULT_PROVIDER)]
        provider: String, // e.g. "google"
    },
    /// Show where shiftsync reads its files from
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command.unwrap_or(Commands::Sync) {
        Commands::Sync => {
            let config = load_config(cli.config)?;
            commands::sync::run(&config).await
        }
        Commands::Entries { verbose } => {
            let config = load_config(cli.config)?;
            commands::entries::run(&config, verbose)
        }
        Commands::Auth { provider } => commands::auth::run(&provider).await,
        Commands::Config => commands::config::run(cli.config),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Load the config, writing a template on first use of the default path.
fn load_config(explicit: Option<PathBuf>) -> Result<SyncConfig> {
    let path = match explicit {
        Some(path) => path,
        None => {
            let path = SyncConfig::default_path()?;
            if !path.exists() {
                SyncConfig::create_template(&path)?;
                anyhow::bail!(
                    "No config found.\n\n\
                    A template was written to {}\n\
                    Fill in the calendar and workbook settings, then run:\n  \
                    shiftsync auth\n  \
                    shiftsync",
                    path.display()
                );
            }
            path
        }
    };

    debug!(path = %path.display(), "Loading config");
    SyncConfig::load(&path).with_context(|| format!("Failed to load {}", path.display()))
}
