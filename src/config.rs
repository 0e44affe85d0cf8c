//! Configuration management for the Spotify top charts service.
//!
//! This module handles loading and accessing configuration values from
//! environment variables and `.env` files. The configuration system follows a
//! hierarchical approach:
//!
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the current working directory
//! 3. `.env` file in the local data directory
//! 4. Application defaults (where applicable)
//!
//! All values are read once at startup into [`Settings`], which is then
//! shared with the request handlers. Missing credentials are a fatal startup
//! condition.

use std::{env, fmt, path::PathBuf};

use reqwest::Url;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_AUTHORIZE_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_MARKET: &str = "US";
pub const DEFAULT_STATIC_DIR: &str = "client/build";

/// Loads environment variables from `.env` files.
///
/// Reads `./.env` first and then `.env` in the platform-specific local data
/// directory under `spotcharts/.env`. Neither file has to exist. Variables
/// that are already set in the process environment are never overridden.
///
/// # Directory Structure
///
/// The second file is looked up in:
/// - Linux: `~/.local/share/spotcharts/.env`
/// - macOS: `~/Library/Application Support/spotcharts/.env`
/// - Windows: `%LOCALAPPDATA%/spotcharts/.env`
///
/// # Errors
///
/// Returns an error string if an existing `.env` file cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    if let Err(e) = dotenv::dotenv() {
        if !e.not_found() {
            return Err(e.to_string());
        }
    }

    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotcharts/.env");
    if async_fs::metadata(&path).await.is_ok() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }

    Ok(())
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid { key, reason } => write!(f, "{} is invalid: {}", key, reason),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Runtime settings of the service.
///
/// Built once at startup by [`Settings::from_env`]. Tests construct it with
/// [`Settings::from_lookup`] so they never mutate the process environment.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Client ID of the registered Spotify application (`SPOTIFY_CLIENT_ID`).
    pub client_id: String,
    /// Client secret of the registered Spotify application (`SPOTIFY_CLIENT_SECRET`).
    pub client_secret: String,
    /// Callback URL registered with Spotify (`SPOTIFY_CLIENT_REDIRECT`).
    pub redirect_uri: String,
    /// Port the HTTP server listens on (`PORT`).
    pub port: u16,
    /// Spotify authorize endpoint (`SPOTIFY_API_AUTH_URL`).
    pub authorize_url: Url,
    /// Spotify token endpoint (`SPOTIFY_API_TOKEN_URL`).
    pub token_url: Url,
    /// Base URL of the Web API without trailing slash (`SPOTIFY_API_URL`).
    pub api_url: String,
    /// Market used for artist top tracks (`SPOTIFY_MARKET`).
    pub market: String,
    /// Directory holding the built frontend (`STATIC_DIR`).
    pub static_dir: PathBuf,
}

impl Settings {
    /// Reads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when `SPOTIFY_CLIENT_ID`,
    /// `SPOTIFY_CLIENT_SECRET` or `SPOTIFY_CLIENT_REDIRECT` is unset or empty,
    /// and [`ConfigError::Invalid`] when a value cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| optional(key).ok_or(ConfigError::Missing(key));

        let port = match optional("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                key: "PORT",
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let authorize_url = parse_url(
            "SPOTIFY_API_AUTH_URL",
            optional("SPOTIFY_API_AUTH_URL").as_deref().unwrap_or(DEFAULT_AUTHORIZE_URL),
        )?;
        let token_url = parse_url(
            "SPOTIFY_API_TOKEN_URL",
            optional("SPOTIFY_API_TOKEN_URL").as_deref().unwrap_or(DEFAULT_TOKEN_URL),
        )?;
        let api_url = optional("SPOTIFY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        parse_url("SPOTIFY_API_URL", &api_url)?;

        Ok(Settings {
            client_id: required("SPOTIFY_CLIENT_ID")?,
            client_secret: required("SPOTIFY_CLIENT_SECRET")?,
            redirect_uri: required("SPOTIFY_CLIENT_REDIRECT")?,
            port,
            authorize_url,
            token_url,
            api_url: api_url.trim_end_matches('/').to_string(),
            market: optional("SPOTIFY_MARKET").unwrap_or_else(|| DEFAULT_MARKET.to_string()),
            static_dir: optional("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
        })
    }
}

fn parse_url(key: &'static str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::Invalid {
        key,
        reason: e.to_string(),
    })
}
