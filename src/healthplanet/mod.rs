//! # HealthPlanet Integration Module
//!
//! Client for the HealthPlanet OAuth2 API. HealthPlanet issues authorization
//! codes only through its HTML login and consent pages, so the module drives
//! those pages the way a browser would before talking to the JSON API.
//!
//! ```text
//! Facade (fetch_scale_data)
//!     ├── auth      login form → consent form → redirect → code → token
//!     │     └── form   HTML form scraping and browser-like submission
//!     └── innerscan measurement request and normalization
//!          ↓
//! Session (reqwest client with cookie store)
//! ```
//!
//! One [`Session`] belongs to one fetch. It carries the cookies the login
//! pages set, so it must never be shared between concurrent fetches; build a
//! fresh one per fetch with [`fetch_with_fresh_session`].

pub mod auth;
pub mod form;
pub mod innerscan;

use std::time::Duration;

use reqwest::{
    Client,
    header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue},
};

use crate::{
    config::{self, ConfigError},
    error::HealthPlanetError,
    types::{Credentials, InnerscanQuery, ScaleData},
};

pub use auth::{AuthCodeFlow, FlowState, exchange_code, parse_authorization_redirect};
pub use form::{FormSubmitter, HtmlForm, Page, resolve_action};
pub use innerscan::{fetch_innerscan, parse_innerscan_response, parse_measurements};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";
const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const LANGUAGES: &str = "ja,en-US;q=0.9,en;q=0.8";

/// Where a session points and how long each request may take.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub origin: String,
    pub timeout: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            origin: config::DEFAULT_ORIGIN.to_string(),
            timeout: Duration::from_secs(config::DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl SessionSettings {
    /// Reads `HEALTHPLANET_ORIGIN` and `HPSCAN_HTTP_TIMEOUT_SECS`, falling
    /// back to the defaults.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] when the timeout is not a positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            origin: config::origin(),
            timeout: config::http_timeout()?,
        })
    }
}

/// Cookie-carrying HTTP client scoped to a single fetch.
pub struct Session {
    client: Client,
    origin: String,
}

impl Session {
    /// Builds a session with an empty cookie store.
    ///
    /// The client sends browser-like `User-Agent`, `Accept` and
    /// `Accept-Language` headers, follows redirects and applies
    /// `settings.timeout` to every request.
    ///
    /// # Arguments
    ///
    /// * `settings` - Origin and per-request timeout. A trailing `/` on the
    ///   origin is dropped
    ///
    /// # Errors
    ///
    /// [`HealthPlanetError::Http`] when the TLS backend cannot be set up.
    ///
    /// # Example
    ///
    /// ```
    /// let session = Session::new(&SessionSettings::default())?;
    /// assert_eq!(session.url("/oauth/token"), "https://www.healthplanet.jp/oauth/token");
    /// ```
    pub fn new(settings: &SessionSettings) -> Result<Self, HealthPlanetError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(LANGUAGES));

        let client = Client::builder()
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(settings.timeout)
            .build()?;

        Ok(Self {
            client,
            origin: settings.origin.trim_end_matches('/').to_string(),
        })
    }

    /// Service origin without a trailing slash.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Absolute URL of `path` on the service origin.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.origin, path)
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }
}

/// Runs the whole pipeline on `session`: authorization code, access token,
/// innerscan data. The first failure aborts; nothing partial is returned.
///
/// # Arguments
///
/// * `session` - Fresh session; the login pages fill its cookie store
/// * `credentials` - Application and account credentials
/// * `query` - Which measurements to request
///
/// # Errors
///
/// Whatever step failed first. [`HealthPlanetError::kind`] tells
/// authentication, data and transport failures apart.
pub async fn fetch_scale_data(
    session: &Session,
    credentials: &Credentials,
    query: &InnerscanQuery,
) -> Result<ScaleData, HealthPlanetError> {
    let mut flow = AuthCodeFlow::new(session, credentials);
    let code = flow.run().await?;
    let token = exchange_code(session, credentials, &code).await?;
    fetch_innerscan(session, &token, query).await
}

/// Same as [`fetch_scale_data`] on a session built just for this call.
pub async fn fetch_with_fresh_session(
    settings: &SessionSettings,
    credentials: &Credentials,
    query: &InnerscanQuery,
) -> Result<ScaleData, HealthPlanetError> {
    let session = Session::new(settings)?;
    fetch_scale_data(&session, credentials, query).await
}
