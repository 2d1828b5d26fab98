use std::{sync::Arc, time::Duration};

use chrono::Utc;
use reqwest::{Client, Response, Url};
use tokio::{net::TcpListener, sync::Mutex};

use crate::{
    config::{self, Credentials},
    error::AuthError,
    info,
    management::TokenManager,
    server::start_api_server,
    spotify::SpotifySession,
    success,
    types::{OAuthErrorResponse, PendingAuth, Token, TokenResponse},
    utils, warning,
};

/// How long to wait for the user to finish authorizing in the browser.
const AUTH_TIMEOUT: Duration = Duration::from_secs(120);

/// Produces an authorized session for `credentials`.
///
/// A cached token granted the full scope is reused (it is refreshed lazily
/// once expired). Otherwise the authorization code flow runs:
///
/// 1. **Server Start**: binds a local callback server on the redirect URI's host and port
/// 2. **Browser Launch**: opens the Spotify authorization URL in the default browser
/// 3. **Callback Handling**: the server checks `state` and exchanges the code for a token
/// 4. **Token Persistence**: the token is cached for the next run
///
/// # Errors
///
/// Fails when the redirect URI cannot be served locally, when the code
/// exchange fails, or when nobody completes the flow within two minutes.
pub async fn authorize(credentials: &Credentials) -> Result<SpotifySession, AuthError> {
    match TokenManager::load(credentials.clone()).await {
        Ok(manager) if manager.has_scope() => {
            info!("Using cached authorization.");
            return Ok(SpotifySession::new(manager, config::spotify_apiurl()));
        }
        Ok(_) => log::debug!("Cached token lacks required scope, authorizing again"),
        Err(e) => log::debug!("No usable token cache: {}", e),
    }

    let token = run_authorization_flow(credentials).await?;
    let manager = TokenManager::new(token, credentials.clone());
    if let Err(e) = manager.persist().await {
        warning!("Failed to save token to cache: {}", e);
    }

    success!("Authentication successful!");
    Ok(SpotifySession::new(manager, config::spotify_apiurl()))
}

async fn run_authorization_flow(credentials: &Credentials) -> Result<Token, AuthError> {
    let redirect = Url::parse(&credentials.redirect_uri)
        .map_err(|_| AuthError::InvalidRedirectUri(credentials.redirect_uri.clone()))?;
    let (bind_addr, callback_path) = callback_endpoint(&redirect)?;

    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(AuthError::CallbackServer)?;
    log::debug!("Callback server listening on {}{}", bind_addr, callback_path);

    let state = utils::generate_state();
    let shared_state = Arc::new(Mutex::new(Some(PendingAuth {
        state: state.clone(),
        client_id: credentials.client_id.clone(),
        client_secret: credentials.client_secret.clone(),
        redirect_uri: credentials.redirect_uri.clone(),
        token: None,
        failure: None,
    })));

    let server_state = Arc::clone(&shared_state);
    let server = tokio::spawn(async move {
        if let Err(e) = start_api_server(listener, &callback_path, server_state).await {
            log::error!("Callback server stopped: {}", e);
        }
    });

    let auth_url = authorization_url(credentials, &state)?;
    if webbrowser::open(auth_url.as_str()).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    let outcome = wait_for_token(shared_state).await;
    server.abort();
    outcome
}

/// Builds the Spotify authorization URL for the code flow.
///
/// # Arguments
///
/// * `credentials` - Client id and redirect URI sent along
/// * `state` - Random value the callback must echo back
///
/// # Returns
///
/// The URL to open in the browser, requesting [`config::SPOTIFY_SCOPE`].
pub fn authorization_url(credentials: &Credentials, state: &str) -> Result<Url, AuthError> {
    let auth_url = config::spotify_apiauth_url();
    Url::parse_with_params(
        &auth_url,
        &[
            ("client_id", credentials.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", credentials.redirect_uri.as_str()),
            ("state", state),
            ("scope", config::SPOTIFY_SCOPE),
        ],
    )
    .map_err(|_| AuthError::InvalidRedirectUri(auth_url))
}

/// Splits a redirect URI into the local address to bind and the callback path.
///
/// `localhost` binds to the IPv4 loopback address.
///
/// # Returns
///
/// `(address, path)`, e.g. `("127.0.0.1:8888", "/callback")`.
pub fn callback_endpoint(redirect: &Url) -> Result<(String, String), AuthError> {
    let invalid = || AuthError::InvalidRedirectUri(redirect.to_string());

    let host = match redirect.host_str().ok_or_else(invalid)? {
        "localhost" => "127.0.0.1",
        host => host,
    };
    let port = redirect.port_or_known_default().ok_or_else(invalid)?;

    Ok((format!("{}:{}", host, port), redirect.path().to_string()))
}

/// Polls the shared state until the callback delivers a token or a failure.
async fn wait_for_token(shared_state: Arc<Mutex<Option<PendingAuth>>>) -> Result<Token, AuthError> {
    use std::time::Instant;

    let start = Instant::now();

    while start.elapsed() < AUTH_TIMEOUT {
        let lock = shared_state.lock().await;
        if let Some(pending) = lock.as_ref() {
            if let Some(token) = &pending.token {
                return Ok(token.clone());
            }
            if let Some(failure) = &pending.failure {
                return Err(AuthError::Denied(failure.clone()));
            }
        }
        drop(lock);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    Err(AuthError::Timeout)
}

/// Exchanges an authorization code for an access token.
///
/// The client authenticates with HTTP Basic credentials; `redirect_uri` must
/// match the one sent with the authorization request.
///
/// # Arguments
///
/// * `client_id` - Spotify application client id
/// * `client_secret` - Secret matching `client_id`
/// * `redirect_uri` - Redirect URI of the authorization request
/// * `code` - Code delivered to the callback
///
/// # Returns
///
/// - `Ok(Token)` - Fresh token stamped with the current time
/// - `Err(AuthError)` - Network failure, rejected code, or no refresh token
pub async fn exchange_code(
    client_id: &str,
    client_secret: &str,
    redirect_uri: &str,
    code: &str,
) -> Result<Token, AuthError> {
    let response = Client::new()
        .post(config::spotify_apitoken_url())
        .basic_auth(client_id, Some(client_secret))
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri),
        ])
        .send()
        .await?;

    let json = read_token_response(response).await?;
    let refresh_token = json.refresh_token.ok_or_else(|| {
        AuthError::TokenExchange("response did not include a refresh token".to_string())
    })?;

    Ok(Token {
        access_token: json.access_token,
        refresh_token,
        scope: json.scope,
        expires_in: json.expires_in,
        obtained_at: Utc::now().timestamp() as u64,
    })
}

/// Refreshes an expired access token using a refresh token.
///
/// Spotify may rotate the refresh token; when the response omits one the
/// previous refresh token stays valid and is kept.
pub async fn refresh_token(
    credentials: &Credentials,
    refresh_token: &str,
) -> Result<Token, AuthError> {
    let response = Client::new()
        .post(config::spotify_apitoken_url())
        .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .send()
        .await?;

    let json = read_token_response(response).await?;

    Ok(Token {
        access_token: json.access_token,
        refresh_token: json
            .refresh_token
            .unwrap_or_else(|| refresh_token.to_string()),
        scope: json.scope,
        expires_in: json.expires_in,
        obtained_at: Utc::now().timestamp() as u64,
    })
}

async fn read_token_response(response: Response) -> Result<TokenResponse, AuthError> {
    if response.status().is_success() {
        return Ok(response.json::<TokenResponse>().await?);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<OAuthErrorResponse>(&body) {
        Ok(err) => match err.error_description {
            Some(description) => format!("{}: {}", err.error, description),
            None => err.error,
        },
        Err(_) => format!("{} {}", status, body),
    };

    Err(AuthError::TokenExchange(message))
}
