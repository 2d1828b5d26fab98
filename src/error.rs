//! Error types for every layer of a curation run.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Problems with the credentials file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Config file is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// One or more of the `[CREDENTIALS]` keys is absent or blank.
    #[error("Config file missing required param(s): {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
}

/// Failures while obtaining or refreshing an authorized session.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Token endpoint rejected the request: {0}")]
    TokenExchange(String),

    #[error("Invalid redirect URI '{0}'")]
    InvalidRedirectUri(String),

    #[error("Cannot start callback server: {0}")]
    CallbackServer(#[source] io::Error),

    #[error("Token cache error: {0}")]
    Cache(String),

    #[error("Authorization was denied: {0}")]
    Denied(String),

    #[error("Authentication failed or timed out")]
    Timeout,
}

/// Failures of a single call against the Spotify Web API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Spotify API responded with {status}: {message}")]
    Status { status: u16, message: String },

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Outcome of a saved-tracks fetch that could not complete.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Cannot look up your account: {0}")]
    AccountUnreachable(#[source] ApiError),

    #[error("Page at offset {offset} failed after {attempts} attempts: {source}")]
    PageFailed {
        offset: u64,
        attempts: u32,
        #[source]
        source: ApiError,
    },
}

/// Invalid or unreadable interactive answers.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Cannot read input: {0}")]
    Io(#[from] io::Error),

    #[error("'{0}' is not a whole number")]
    NotANumber(String),
}

/// Failures that end a curation run after authorization.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Sorry, I couldn't fetch your saved tracks. {0}")]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Prompt(#[from] PromptError),
}
