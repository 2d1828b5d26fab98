//! Configuration management for Dewey.
//!
//! Credentials come from a TOML file passed on the command line. It holds a
//! single `[CREDENTIALS]` table:
//!
//! ```toml
//! [CREDENTIALS]
//! CLIENT_ID = "..."
//! CLIENT_SECRET = "..."
//! REDIRECT_URI = "http://localhost:8888/callback"
//! ```
//!
//! Spotify endpoint URLs default to the public service and can be overridden
//! through environment variables, either set directly or placed in a `.env`
//! file in the local data directory.

use std::{env, fs, path::Path, path::PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Permissions requested during authorization: read saved tracks, follow
/// artists, save albums.
pub const SPOTIFY_SCOPE: &str = "user-library-read user-follow-modify user-library-modify";

const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Application credentials registered with Spotify's developer platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
}

#[derive(Deserialize)]
struct ConfigFile {
    #[serde(rename = "CREDENTIALS")]
    credentials: Option<CredentialsSection>,
}

#[derive(Deserialize)]
struct CredentialsSection {
    #[serde(rename = "CLIENT_ID")]
    client_id: Option<String>,
    #[serde(rename = "CLIENT_SECRET")]
    client_secret: Option<String>,
    #[serde(rename = "REDIRECT_URI")]
    redirect_uri: Option<String>,
}

/// Reads and validates the credentials file at `path`.
///
/// # Errors
///
/// - [`ConfigError::Read`] if the file cannot be read
/// - [`ConfigError::Parse`] if it is not valid TOML
/// - [`ConfigError::MissingFields`] if any credential is absent or blank
pub fn load(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&contents)
}

/// Parses the contents of a credentials file.
pub fn parse(contents: &str) -> Result<Config, ConfigError> {
    let file: ConfigFile = toml::from_str(contents)?;
    let section = file.credentials.unwrap_or(CredentialsSection {
        client_id: None,
        client_secret: None,
        redirect_uri: None,
    });

    let mut missing = Vec::new();
    let client_id = required(section.client_id, "CLIENT_ID", &mut missing);
    let client_secret = required(section.client_secret, "CLIENT_SECRET", &mut missing);
    let redirect_uri = required(section.redirect_uri, "REDIRECT_URI", &mut missing);

    match (client_id, client_secret, redirect_uri) {
        (Some(client_id), Some(client_secret), Some(redirect_uri)) => Ok(Config {
            credentials: Credentials {
                client_id,
                client_secret,
                redirect_uri,
            },
        }),
        _ => Err(ConfigError::MissingFields(missing)),
    }
}

fn required(
    value: Option<String>,
    key: &'static str,
    missing: &mut Vec<&'static str>,
) -> Option<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Some(v),
        _ => {
            missing.push(key);
            None
        }
    }
}

/// Loads environment overrides from `.env` in the local data directory.
///
/// The file is optional; a missing file leaves the environment untouched.
/// Returns the path that was loaded, if any.
pub fn load_env() -> Option<PathBuf> {
    let path = data_dir().join(".env");
    match dotenv::from_path(&path) {
        Ok(()) => Some(path),
        Err(e) => {
            log::debug!("No environment file loaded from {}: {}", path.display(), e);
            None
        }
    }
}

/// Platform-specific local data directory for Dewey.
///
/// - Linux: `~/.local/share/dewey`
/// - macOS: `~/Library/Application Support/dewey`
/// - Windows: `%LOCALAPPDATA%/dewey`
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("dewey");
    path
}

/// Returns the Spotify Web API base URL (`SPOTIFY_API_URL`).
pub fn spotify_apiurl() -> String {
    env::var("SPOTIFY_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string())
}

/// Returns the Spotify OAuth authorization URL (`SPOTIFY_API_AUTH_URL`).
pub fn spotify_apiauth_url() -> String {
    env::var("SPOTIFY_API_AUTH_URL").unwrap_or_else(|_| DEFAULT_AUTH_URL.to_string())
}

/// Returns the Spotify OAuth token exchange URL (`SPOTIFY_API_TOKEN_URL`).
pub fn spotify_apitoken_url() -> String {
    env::var("SPOTIFY_API_TOKEN_URL").unwrap_or_else(|_| DEFAULT_TOKEN_URL.to_string())
}
