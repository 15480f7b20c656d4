//! feedcal configuration.
//!
//! Read from `~/.config/feedcal/config.toml`, with `FEEDCAL_*` environment
//! variables layered on top (e.g. `FEEDCAL_BIND_ADDR=0.0.0.0:8080`).

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, Map};
use serde::{Deserialize, Serialize};

use crate::error::{FeedError, FeedResult};

static DEFAULT_DATA_DIR: &str = "~/.local/share/feedcal";
static DEFAULT_BIND_ADDR: &str = "127.0.0.1:4096";
static DEFAULT_FEED_FILENAME: &str = "calendar.ics";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 1024 * 1024;
const DEFAULT_FEED_MAX_AGE: u64 = 1800;

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_bind_addr() -> String {
    DEFAULT_BIND_ADDR.to_string()
}

fn default_feed_filename() -> String {
    DEFAULT_FEED_FILENAME.to_string()
}

fn default_max_upload_bytes() -> usize {
    DEFAULT_MAX_UPLOAD_BYTES
}

fn default_feed_max_age() -> u64 {
    DEFAULT_FEED_MAX_AGE
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Where the event store lives
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Address the HTTP server listens on
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Base URL used when telling uploaders where the feed is.
    /// Taken from the request's Host header when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_url: Option<String>,

    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Cache-Control max-age for the published feed, in seconds
    #[serde(default = "default_feed_max_age")]
    pub feed_max_age: u64,

    /// Filename suggested to clients downloading the feed
    #[serde(default = "default_feed_filename")]
    pub feed_filename: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        FeedConfig {
            data_dir: default_data_dir(),
            bind_addr: default_bind_addr(),
            public_url: None,
            max_upload_bytes: default_max_upload_bytes(),
            feed_max_age: default_feed_max_age(),
            feed_filename: default_feed_filename(),
        }
    }
}

impl FeedConfig {
    pub fn config_path() -> FeedResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| FeedError::Config("Could not determine config directory".into()))?
            .join("feedcal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the global config, writing a commented default file first if
    /// there is none.
    pub fn load() -> FeedResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from a specific file (which may be missing) plus the environment.
    pub fn load_from(path: &Path) -> FeedResult<Self> {
        Self::load_layered(path, None)
    }

    /// `env` stands in for the process environment when given.
    fn load_layered(path: &Path, env: Option<Map<String, String>>) -> FeedResult<Self> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix("FEEDCAL")
                    .try_parsing(true)
                    .source(env),
            )
            .build()
            .map_err(|e| FeedError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| FeedError::Config(e.to_string()))
    }

    /// `data_dir` with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_dir.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    pub fn to_toml(&self) -> FeedResult<String> {
        toml::to_string_pretty(self).map_err(|e| FeedError::Config(e.to_string()))
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> FeedResult<()> {
        let contents = format!(
            "\
# feedcal configuration

# Where the event store lives:
# data_dir = \"{}\"

# Address the feed server listens on:
# bind_addr = \"{}\"

# Public base URL of the server (defaults to the request's Host header):
# public_url = \"https://calendar.example.com\"

# Largest accepted upload, in bytes:
# max_upload_bytes = {}

# Cache-Control max-age for /feed.ics, in seconds:
# feed_max_age = {}

# Filename offered when downloading the feed:
# feed_filename = \"{}\"
",
            DEFAULT_DATA_DIR,
            DEFAULT_BIND_ADDR,
            DEFAULT_MAX_UPLOAD_BYTES,
            DEFAULT_FEED_MAX_AGE,
            DEFAULT_FEED_FILENAME
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                FeedError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| FeedError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
