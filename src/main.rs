mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use feedcal_core::config::FeedConfig;
use feedcal_core::store::FileStore;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "feedcal")]
#[command(about = "Import .ics files into your feedcal store and publish them as one feed")]
struct Cli {
    /// Use this store directory instead of the configured data_dir
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import events from an .ics file (events with a known UID are updated)
    Import { file: PathBuf },
    /// Decode an .ics file and show what an import would pick up
    Check { file: PathBuf },
    /// Write the published feed
    Feed {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the events in the feed
    List,
    /// Take an event out of the feed
    Delete { uid: String },
    /// Show the configuration in effect
    Config,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Import { file } => commands::import::run(&open_store(cli.data_dir)?, &file),
        Commands::Check { file } => commands::check::run(&file),
        Commands::Feed { output } => {
            commands::feed::run(&open_store(cli.data_dir)?, output.as_deref())
        }
        Commands::List => commands::list::run(&open_store(cli.data_dir)?),
        Commands::Delete { uid } => commands::delete::run(&open_store(cli.data_dir)?, &uid),
        Commands::Config => commands::config::run(&load_config()?),
    }
}

fn load_config() -> Result<FeedConfig> {
    FeedConfig::load().context("Failed to load configuration")
}

fn open_store(data_dir: Option<PathBuf>) -> Result<FileStore> {
    let path = match data_dir {
        Some(path) => path,
        None => load_config()?.data_path(),
    };

    tracing::debug!(path = %path.display(), "Opening event store");
    FileStore::open(&path)
        .with_context(|| format!("Failed to open event store at {}", path.display()))
}
