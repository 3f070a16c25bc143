//! Error taxonomy for the HealthPlanet fetch pipeline.
//!
//! Every variant is fatal for the running fetch. Nothing is retried; the only
//! local recovery in the crate is skipping malformed measurement entries,
//! which never produces an error.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HealthPlanetError {
    /// An expected HTML form is missing from a page, usually markup drift.
    #[error("form `{0}` not found in page")]
    FormNotFound(&'static str),

    /// The redirect carried an explicit `error`, or neither `code` nor `error`.
    #[error("authorization failed: {0}")]
    Authorization(String),

    /// Network failure or a non-success status at any step.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("token response is not valid JSON: {0}")]
    TokenResponse(#[source] serde_json::Error),

    #[error("token response does not contain an access_token")]
    MissingToken,

    #[error("measurement response is invalid: {0}")]
    DataResponse(String),
}

/// Coarse classification of a failure, used to tell callers whether the
/// account could not be authenticated or the data could not be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Authentication,
    Data,
    Transport,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Authentication => "authentication_failed",
            FailureKind::Data => "data_unavailable",
            FailureKind::Transport => "upstream_unreachable",
        }
    }
}

impl HealthPlanetError {
    pub fn kind(&self) -> FailureKind {
        match self {
            HealthPlanetError::FormNotFound(_)
            | HealthPlanetError::Authorization(_)
            | HealthPlanetError::TokenResponse(_)
            | HealthPlanetError::MissingToken => FailureKind::Authentication,
            HealthPlanetError::DataResponse(_) => FailureKind::Data,
            HealthPlanetError::Http(_) => FailureKind::Transport,
        }
    }
}
