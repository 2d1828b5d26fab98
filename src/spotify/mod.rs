//! # Spotify Integration Module
//!
//! The integration layer between Dewey and the Spotify Web API.
//!
//! ```text
//! Curation Layer (fetch, tally, update)
//!          ↓
//! LibraryService trait
//!          ↓
//! SpotifySession (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! - [`auth`] - Authorization code flow, token exchange and refresh
//! - [`library`] - Saved tracks, followed artists and saved albums endpoints
//!
//! The curation code only ever talks to [`LibraryService`], so a session is
//! always passed explicitly and tests can substitute an in-memory service.

pub mod auth;
pub mod library;

use reqwest::Client;

use crate::{error::ApiError, management::TokenManager, types::SavedTracksPage};

/// Capabilities Dewey needs from the remote service.
#[allow(async_fn_in_trait)]
pub trait LibraryService {
    /// Fetches a page of the current user's saved tracks.
    async fn saved_tracks(&mut self, limit: u32, offset: u64) -> Result<SavedTracksPage, ApiError>;

    /// Follows every artist in `ids` (at most 50).
    async fn follow_artists(&mut self, ids: &[String]) -> Result<(), ApiError>;

    /// Saves every album in `ids` to the library (at most 50).
    async fn save_albums(&mut self, ids: &[String]) -> Result<(), ApiError>;
}

/// Authorized handle to the Spotify Web API.
pub struct SpotifySession {
    client: Client,
    api_url: String,
    tokens: TokenManager,
}

impl SpotifySession {
    /// Creates a session that authorizes every request through `tokens`.
    ///
    /// # Arguments
    ///
    /// * `tokens` - Token manager holding a token with the required scope
    /// * `api_url` - Base URL of the Web API; a trailing slash is dropped
    pub fn new(tokens: TokenManager, api_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            tokens,
        }
    }
}
