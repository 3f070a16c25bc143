use std::sync::Arc;

use axum::{
    Extension,
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::{
    healthplanet, info,
    types::{InnerscanQuery, SeriesResponse},
    warning,
};

use super::AppState;

/// Runs a complete fetch for every request and returns the series.
///
/// Each call builds its own session and token; nothing is cached between
/// requests. Upstream failures answer `502` with the failure kind so a
/// client can tell a login problem from unreadable data.
pub async fn measurements(
    Query(query): Query<InnerscanQuery>,
    Extension(state): Extension<Arc<AppState>>,
) -> Response {
    let result =
        healthplanet::fetch_with_fresh_session(&state.settings, &state.credentials, &query).await;

    match result {
        Ok(scale) => {
            if scale.dropped > 0 {
                warning!("Skipped {} malformed measurement entries", scale.dropped);
            }
            info!("Served {} measurements (tag {})", scale.records.len(), query.tag);
            Json(SeriesResponse::from(scale.records)).into_response()
        }
        Err(e) => {
            warning!("Fetch failed: {}", e);
            let body = json!({
                "error": e.kind().as_str(),
                "message": e.to_string(),
            });
            (StatusCode::BAD_GATEWAY, Json(body)).into_response()
        }
    }
}
