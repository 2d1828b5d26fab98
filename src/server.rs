use axum::{Extension, Router, routing::get};
use std::{io, sync::Arc};
use tokio::{net::TcpListener, sync::Mutex};

use crate::{api, types::PendingAuth};

/// Serves the OAuth callback on `callback_path` until the task is aborted.
pub async fn start_api_server(
    listener: TcpListener,
    callback_path: &str,
    state: Arc<Mutex<Option<PendingAuth>>>,
) -> io::Result<()> {
    let mut app = Router::new().route(callback_path, get(api::callback));
    if callback_path != "/health" {
        app = app.route("/health", get(api::health));
    }

    axum::serve(listener, app.layer(Extension(state))).await
}
