use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, response::Html};
use tokio::sync::Mutex;

use crate::{spotify, types::PendingAuth, warning};

/// Completes the authorization code flow started by `spotify::auth::authorize`.
///
/// Spotify redirects here with either `code` and `state`, or `error`. The
/// outcome is written into the shared state, where the waiting flow picks it up.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared_state): Extension<Arc<Mutex<Option<PendingAuth>>>>,
) -> Html<&'static str> {
    let mut state = shared_state.lock().await;
    let Some(pending) = state.as_mut() else {
        return Html("<h4>No authorization in progress.</h4>");
    };

    if params.get("state") != Some(&pending.state) {
        warning!("Ignoring callback with unexpected state parameter.");
        return Html("<h4>State mismatch. Please retry the login.</h4>");
    }

    if let Some(error) = params.get("error") {
        pending.failure = Some(error.clone());
        return Html("<h4>Login was cancelled.</h4>");
    }

    let Some(code) = params.get("code") else {
        return Html("<h4>Missing authorization code.</h4>");
    };

    match spotify::auth::exchange_code(
        &pending.client_id,
        &pending.client_secret,
        &pending.redirect_uri,
        code,
    )
    .await
    {
        Ok(token) => {
            pending.token = Some(token);
            Html("<h2>Authentication successful.</h2><p>Close browser window.</p>")
        }
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            pending.failure = Some(e.to_string());
            Html("<h4>Login failed.</h4>")
        }
    }
}
