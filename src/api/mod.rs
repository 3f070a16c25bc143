//! # API Module
//!
//! HTTP handlers of the local measurement endpoint.
//!
//! ## Endpoints
//!
//! - [`measurements`] - `GET /` runs a fresh HealthPlanet fetch and answers
//!   `{"data": [...], "data_length": N}`. Optional `date_type` and `tag`
//!   query parameters are forwarded to the innerscan request.
//! - [`health`] - `GET /health` reports status and crate version.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Extension, Router, routing::get};
//! use hpscan::api::{health, measurements};
//!
//! let app = Router::new()
//!     .route("/", get(measurements))
//!     .route("/health", get(health))
//!     .layer(Extension(state));
//! ```

mod health;
mod measurements;

pub use health::health;
pub use measurements::measurements;

use crate::{healthplanet::SessionSettings, types::Credentials};

/// Read-only state shared by the handlers. Holds no session: every request
/// builds its own.
#[derive(Debug, Clone)]
pub struct AppState {
    pub credentials: Credentials,
    pub settings: SessionSettings,
}
