use reqwest::Response;
use serde_json::json;

use crate::{
    error::ApiError,
    spotify::{LibraryService, SpotifySession},
    types::{ErrorResponse, SavedTracksPage},
};

impl LibraryService for SpotifySession {
    /// Retrieves a page of saved tracks via `GET /me/tracks`.
    ///
    /// `limit` is capped by Spotify at 50. The response carries the total
    /// number of saved tracks, which the fetcher uses to drive pagination.
    async fn saved_tracks(&mut self, limit: u32, offset: u64) -> Result<SavedTracksPage, ApiError> {
        let token = self.tokens.get_valid_token().await?;
        let api_url = format!("{uri}/me/tracks", uri = self.api_url);
        log::debug!("GET {} limit={} offset={}", api_url, limit, offset);

        let response = self
            .client
            .get(&api_url)
            .query(&[("limit", limit.to_string()), ("offset", offset.to_string())])
            .bearer_auth(token)
            .send()
            .await?;

        let page = check_status(response)
            .await?
            .json::<SavedTracksPage>()
            .await?;
        Ok(page)
    }

    /// Follows artists via `PUT /me/following?type=artist`.
    async fn follow_artists(&mut self, ids: &[String]) -> Result<(), ApiError> {
        let token = self.tokens.get_valid_token().await?;
        let api_url = format!("{uri}/me/following", uri = self.api_url);
        log::debug!("PUT {} ({} artists)", api_url, ids.len());

        let response = self
            .client
            .put(&api_url)
            .query(&[("type", "artist")])
            .bearer_auth(token)
            .json(&json!({ "ids": ids }))
            .send()
            .await?;

        check_status(response).await?;
        Ok(())
    }

    /// Saves albums via `PUT /me/albums`.
    async fn save_albums(&mut self, ids: &[String]) -> Result<(), ApiError> {
        let token = self.tokens.get_valid_token().await?;
        let api_url = format!("{uri}/me/albums", uri = self.api_url);
        log::debug!("PUT {} ({} albums)", api_url, ids.len());

        let response = self
            .client
            .put(&api_url)
            .bearer_auth(token)
            .json(&json!({ "ids": ids }))
            .send()
            .await?;

        check_status(response).await?;
        Ok(())
    }
}

/// Turns a non-success response into [`ApiError::Status`], keeping Spotify's
/// own error message when the body carries one.
async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(err) => err.error.message,
        Err(_) if body.is_empty() => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
        Err(_) => body,
    };

    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}
