use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::{config, config::Credentials, error::AuthError, spotify, types::Token, utils};

/// Seconds before the reported expiry at which a token counts as expired.
const EXPIRY_BUFFER_SECS: u64 = 240;

pub struct TokenManager {
    token: Token,
    credentials: Credentials,
    path: PathBuf,
}

impl TokenManager {
    pub fn new(token: Token, credentials: Credentials) -> Self {
        let path = Self::token_path(&credentials.client_id);
        TokenManager {
            token,
            credentials,
            path,
        }
    }

    /// Uses `path` instead of the default cache location.
    pub fn with_path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = path.as_ref().to_path_buf();
        self
    }

    pub async fn load(credentials: Credentials) -> Result<Self, AuthError> {
        let path = Self::token_path(&credentials.client_id);
        Self::load_from(credentials, path).await
    }

    pub async fn load_from(
        credentials: Credentials,
        path: impl AsRef<Path>,
    ) -> Result<Self, AuthError> {
        let path = path.as_ref().to_path_buf();
        let content = async_fs::read_to_string(&path)
            .await
            .map_err(|e| AuthError::Cache(e.to_string()))?;
        let token: Token =
            serde_json::from_str(&content).map_err(|e| AuthError::Cache(e.to_string()))?;
        Ok(Self {
            token,
            credentials,
            path,
        })
    }

    pub async fn persist(&self) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| AuthError::Cache(e.to_string()))?;
        }

        let json = serde_json::to_string_pretty(&self.token)
            .map_err(|e| AuthError::Cache(e.to_string()))?;
        async_fs::write(&self.path, json)
            .await
            .map_err(|e| AuthError::Cache(e.to_string()))
    }

    /// Returns an access token, refreshing and re-persisting it when expired.
    pub async fn get_valid_token(&mut self) -> Result<String, AuthError> {
        if self.is_expired() {
            log::debug!("Access token expired, refreshing");
            let refreshed =
                spotify::auth::refresh_token(&self.credentials, &self.token.refresh_token).await?;
            self.token = refreshed;
            if let Err(e) = self.persist().await {
                log::warn!("Cannot update token cache: {}", e);
            }
        }

        Ok(self.token.access_token.clone())
    }

    /// True when the cached token was granted every permission Dewey needs.
    pub fn has_scope(&self) -> bool {
        utils::covers_scopes(&self.token.scope, config::SPOTIFY_SCOPE)
    }

    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        let expires_at = self.token.obtained_at + self.token.expires_in;
        now >= expires_at.saturating_sub(EXPIRY_BUFFER_SECS)
    }

    pub fn token_path(client_id: &str) -> PathBuf {
        let mut path = config::data_dir();
        path.push(format!(
            "cache/token-{key}.json",
            key = utils::cache_key(client_id)
        ));
        path
    }

    pub fn current_token(&self) -> &Token {
        &self.token
    }
}
