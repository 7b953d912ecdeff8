//! Configuration management for the Spotify Playlist Migrator.
//!
//! This module handles loading configuration values from environment
//! variables and `.env` files. Values are read once at startup into a
//! [`MigratorConfig`]; the migration engine only ever sees that value.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Command-line flags (highest priority, handled by the CLI)
//! 2. Environment variables
//! 3. `.env` file in the local data directory
//! 4. Application defaults

use std::{env, io::ErrorKind, path::PathBuf};

use crate::{Res, types::Credential};

pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";

/// Largest page size the playlist listing endpoint accepts.
pub const MAX_PAGE_LIMIT: u32 = 50;

/// Loads environment variables from a `.env` file in the local data directory.
///
/// The file lives under `playlist-migrator/.env` in the platform-specific
/// local data directory:
/// - Linux: `~/.local/share/playlist-migrator/.env`
/// - macOS: `~/Library/Application Support/playlist-migrator/.env`
/// - Windows: `%LOCALAPPDATA%/playlist-migrator/.env`
///
/// A missing file is fine: everything can also come from the environment or
/// from command-line flags.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file exists
/// but cannot be parsed.
pub async fn load_env() -> Res<()> {
    let path = env_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    match dotenv::from_path(&path) {
        Ok(()) => Ok(()),
        Err(dotenv::Error::Io(e)) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(format!("{}: {}", path.display(), e).into()),
    }
}

fn env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("playlist-migrator/.env");
    path
}

/// Runtime settings gathered once at startup.
#[derive(Debug, Clone)]
pub struct MigratorConfig {
    /// Base URL of the Web API, without trailing slash.
    pub api_url: String,
    /// Page size requested when listing playlists.
    pub page_limit: u32,
    /// Serve fixtures instead of calling the network.
    pub demo: bool,
    pub source_token: Option<Credential>,
    pub target_token: Option<Credential>,
}

impl Default for MigratorConfig {
    fn default() -> Self {
        MigratorConfig {
            api_url: DEFAULT_API_URL.to_string(),
            page_limit: MAX_PAGE_LIMIT,
            demo: false,
            source_token: None,
            target_token: None,
        }
    }
}

impl MigratorConfig {
    /// Reads the configuration from the process environment.
    ///
    /// - `SPOTIFY_API_URL` - API base URL (default `https://api.spotify.com/v1`)
    /// - `MIGRATOR_PAGE_LIMIT` - playlist page size, clamped to 1..=50
    /// - `MIGRATOR_DEMO` - `1` or `true` enables demo mode
    /// - `MIGRATOR_SOURCE_TOKEN` / `MIGRATOR_TARGET_TOKEN` - default credentials
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let api_url = lookup("SPOTIFY_API_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or(defaults.api_url);

        let page_limit = lookup("MIGRATOR_PAGE_LIMIT")
            .and_then(|limit| limit.trim().parse::<u32>().ok())
            .map(|limit| limit.clamp(1, MAX_PAGE_LIMIT))
            .unwrap_or(defaults.page_limit);

        let demo = lookup("MIGRATOR_DEMO")
            .map(|flag| parse_flag(&flag))
            .unwrap_or(defaults.demo);

        MigratorConfig {
            api_url,
            page_limit,
            demo,
            source_token: credential(lookup("MIGRATOR_SOURCE_TOKEN")),
            target_token: credential(lookup("MIGRATOR_TARGET_TOKEN")),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn credential(value: Option<String>) -> Option<Credential> {
    value.map(Credential::new).filter(|c| !c.is_empty())
}
