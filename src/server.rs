use axum::{Extension, Router, routing::get};
use std::{net::SocketAddr, sync::Arc};

use crate::{Res, api, api::AppState};

/// Routes of the local endpoint: `GET /` for the series, `GET /health`.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(api::measurements))
        .route("/health", get(api::health))
        .layer(Extension(state))
}

/// Binds `addr` and serves [`router`] until the process stops.
///
/// # Errors
///
/// Fails when the address cannot be bound or the server loop errors out.
pub async fn start_api_server(addr: SocketAddr, state: Arc<AppState>) -> Res<()> {
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router(state)).await?;
    Ok(())
}
