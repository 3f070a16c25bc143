use std::sync::Arc;

use axum::{Extension, response::Json};
use serde_json::{Value, json};

use super::AppState;

/// Liveness check. Does not contact HealthPlanet; only reports which
/// upstream a fetch would go to.
pub async fn health(Extension(state): Extension<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "upstream": state.settings.origin,
    }))
}
