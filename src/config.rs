//! Configuration management for spotstat.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file in the local data directory:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use std::{env, path::PathBuf};

use chrono::{
    FixedOffset, Offset, Utc,
    format::{self, Parsed, StrftimeItems},
};

use crate::error::{Error, Result};

const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";
const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_SCOPE: &str = "user-library-read playlist-read-collaborative playlist-read-private playlist-modify-public playlist-modify-private user-read-private user-read-email user-top-read user-follow-read user-follow-modify";

/// Returns the application directory inside the platform data directory.
///
/// - Linux: `~/.local/share/spotstat`
/// - macOS: `~/Library/Application Support/spotstat`
/// - Windows: `%LOCALAPPDATA%/spotstat`
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotstat");
    path
}

/// Loads environment variables from `<data_dir>/.env`.
///
/// Creates the data directory when it does not exist. A missing `.env` file
/// is not an error, variables may just as well come from the environment.
///
/// # Errors
///
/// Fails if the directory cannot be created or an existing `.env` file
/// cannot be parsed.
pub async fn load_env() -> Result<()> {
    let dir = data_dir();
    async_fs::create_dir_all(&dir).await?;

    let path = dir.join(".env");
    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| Error::Config(e.to_string()))?;
    }
    Ok(())
}

fn required(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("{} must be set", name)))
}

fn or_default(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Address the local OAuth callback server binds to (`SERVER_ADDRESS`).
pub fn server_addr() -> String {
    or_default("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS)
}

/// Client ID of the registered Spotify application (`SPOTIFY_API_AUTH_CLIENT_ID`).
pub fn spotify_client_id() -> Result<String> {
    required("SPOTIFY_API_AUTH_CLIENT_ID")
}

/// OAuth redirect URI (`SPOTIFY_API_REDIRECT_URI`).
///
/// Must match the redirect URI registered for the application and point at
/// the callback server, e.g. `http://127.0.0.1:8888/callback`.
pub fn spotify_redirect_uri() -> Result<String> {
    required("SPOTIFY_API_REDIRECT_URI")
}

pub fn spotify_scope() -> String {
    or_default("SPOTIFY_API_AUTH_SCOPE", DEFAULT_SCOPE)
}

pub fn spotify_apiauth_url() -> String {
    or_default("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL)
}

pub fn spotify_apitoken_url() -> String {
    or_default("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL)
}

pub fn spotify_apiurl() -> String {
    or_default("SPOTIFY_API_URL", DEFAULT_API_URL)
}

/// Path of the SQLite login database (`SPOTSTAT_DATABASE`).
pub fn database_path() -> PathBuf {
    match env::var("SPOTSTAT_DATABASE") {
        Ok(path) => PathBuf::from(path),
        Err(_) => data_dir().join("spotstat.db"),
    }
}

/// Time zone used for calendar bucketing (`SPOTSTAT_UTC_OFFSET`, e.g. `+02:00`).
///
/// Returns `Ok(None)` when unset, callers then fall back to the host's local
/// zone.
pub fn stats_utc_offset() -> Result<Option<FixedOffset>> {
    match env::var("SPOTSTAT_UTC_OFFSET") {
        Ok(raw) => parse_utc_offset(&raw).map(Some),
        Err(_) => Ok(None),
    }
}

/// Parses `Z`, `UTC`, `+HH:MM`, `-HH:MM`, `+HHMM` or `+HH` into a fixed offset.
pub fn parse_utc_offset(raw: &str) -> Result<FixedOffset> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("utc") {
        return Ok(Utc.fix());
    }

    let mut parsed = Parsed::new();
    format::parse(&mut parsed, raw, StrftimeItems::new("%#z"))
        .and_then(|()| parsed.to_fixed_offset())
        .map_err(|e| Error::Config(format!("invalid UTC offset '{}': {}", raw, e)))
}
