//! Configuration management.
//!
//! Settings come from environment variables. Before they are read,
//! [`load_env`] loads `.env` files, first from the local data directory and
//! then from the working directory. Variables that are already set win over
//! both files.
//!
//! The local data directory is platform specific:
//! - Linux: `~/.local/share/relcast/.env`
//! - macOS: `~/Library/Application Support/relcast/.env`
//! - Windows: `%LOCALAPPDATA%/relcast/.env`

use std::{env, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment variable {0} must be set")]
    Missing(&'static str),
}

/// Loads `.env` files from the local data directory and the working
/// directory. Missing files are not an error.
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    dotenv::dotenv().ok();
    Ok(())
}

/// Directory holding the `.env` file and, unless overridden, the release
/// histories.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("relcast");
    path
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or(ConfigError::Missing(name))
}

fn optional(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

pub fn lastfm_api_key() -> Result<String, ConfigError> {
    required("LASTFM_API_KEY")
}

pub fn lastfm_api_url() -> String {
    optional("LASTFM_API_URL", "https://ws.audioscrobbler.com/2.0/")
}

/// Path of a newline separated list of allowed tags, if configured.
pub fn tag_whitelist_path() -> Option<PathBuf> {
    env::var("RELCAST_TAG_WHITELIST").ok().map(PathBuf::from)
}

pub fn spotify_client_id() -> Result<String, ConfigError> {
    required("SPOTIFY_CLIENT_ID")
}

pub fn spotify_client_secret() -> Result<String, ConfigError> {
    required("SPOTIFY_CLIENT_SECRET")
}

pub fn spotify_api_url() -> String {
    optional("SPOTIFY_API_URL", "https://api.spotify.com/v1")
}

pub fn spotify_token_url() -> String {
    optional("SPOTIFY_TOKEN_URL", "https://accounts.spotify.com/api/token")
}

/// Market used to decide which releases are available, `UA` by default.
pub fn spotify_market() -> String {
    optional("SPOTIFY_MARKET", "UA")
}

pub fn bluesky_service() -> String {
    optional("BLUESKY_SERVICE", "https://bsky.social")
}

pub fn bluesky_identifier() -> Result<String, ConfigError> {
    required("BLUESKY_IDENTIFIER")
}

/// Use an app password, not the account password.
pub fn bluesky_password() -> Result<String, ConfigError> {
    required("BLUESKY_PASSWORD")
}

pub fn telegram_api_url() -> String {
    optional("TELEGRAM_API_URL", "https://api.telegram.org")
}

pub fn telegram_bot_token() -> Result<String, ConfigError> {
    required("TELEGRAM_BOT_TOKEN")
}

/// Channel username (`@channel`) or numeric chat id.
pub fn telegram_channel() -> Result<String, ConfigError> {
    required("TELEGRAM_CHANNEL")
}

/// Folder holding one release history file per artist.
pub fn releases_dir() -> PathBuf {
    env::var("RELCAST_DATA_DIR")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| data_dir().join("releases"))
}

/// Artist list CSV, `artist-ids.csv` in the working directory by default.
pub fn artists_file() -> PathBuf {
    PathBuf::from(optional("RELCAST_ARTISTS", "artist-ids.csv"))
}
