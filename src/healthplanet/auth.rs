use std::fmt;

use serde_json::Value;
use url::{Url, form_urlencoded};

use crate::{
    error::HealthPlanetError,
    info,
    types::{AccessToken, AuthCode, Credentials},
};

use super::{
    Session,
    form::{FormSubmitter, HtmlForm, Page},
};

pub const AUTH_PATH: &str = "/oauth/auth";
pub const TOKEN_PATH: &str = "/oauth/token";
pub const SCOPE: &str = "innerscan";

pub const LOGIN_FORM: &str = "login.LoginForm";
pub const CONSENT_FORM: &str = "common.SiteInfoBaseForm";

/// Progress of an [`AuthCodeFlow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Init,
    LoggingIn,
    AwaitingConsent,
    Done,
    Failed,
}

impl fmt::Display for FlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FlowState::Init => "opening authorization page",
            FlowState::LoggingIn => "submitting login form",
            FlowState::AwaitingConsent => "waiting for consent",
            FlowState::Done => "authorization code received",
            FlowState::Failed => "authorization failed",
        };
        f.write_str(text)
    }
}

/// Builds the authorization page URL for `credentials` on `origin`.
///
/// Carries `client_id`, `redirect_uri`, `scope=innerscan` and
/// `response_type=code`, form-urlencoded.
///
/// # Example
///
/// ```
/// let url = authorization_url("https://www.healthplanet.jp", &credentials);
/// assert!(url.starts_with("https://www.healthplanet.jp/oauth/auth?client_id="));
/// ```
pub fn authorization_url(origin: &str, credentials: &Credentials) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("client_id", &credentials.client_id)
        .append_pair("redirect_uri", &credentials.redirect_uri)
        .append_pair("scope", SCOPE)
        .append_pair("response_type", "code")
        .finish();

    format!("{}{}?{}", origin.trim_end_matches('/'), AUTH_PATH, query)
}

/// Scripted login that yields an authorization code.
///
/// Runs once: GET the authorization page, submit the login form, submit the
/// consent form if one is shown, then read the code off the final URL. When
/// no consent form follows the login (consent granted earlier) the login
/// response itself is taken as the final redirect.
pub struct AuthCodeFlow<'a> {
    session: &'a Session,
    credentials: &'a Credentials,
    state: FlowState,
}

impl<'a> AuthCodeFlow<'a> {
    /// Creates a flow in [`FlowState::Init`]. Nothing is sent until
    /// [`AuthCodeFlow::run`].
    pub fn new(session: &'a Session, credentials: &'a Credentials) -> Self {
        Self {
            session,
            credentials,
            state: FlowState::Init,
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    /// Drives the login pages until HealthPlanet hands out a code.
    ///
    /// Every state change is reported with `info!`. Credentials and the code
    /// itself are never printed.
    ///
    /// # Returns
    ///
    /// The authorization code; the flow ends in [`FlowState::Done`].
    ///
    /// # Errors
    ///
    /// - [`HealthPlanetError::FormNotFound`] when the login page has no login
    ///   form
    /// - [`HealthPlanetError::Authorization`] when the final URL carries an
    ///   `error`, or neither `code` nor `error`, or when the flow already ran
    /// - [`HealthPlanetError::Http`] for network failures and error statuses
    ///
    /// Any of these leaves the flow in [`FlowState::Failed`].
    ///
    /// # Example
    ///
    /// ```
    /// let mut flow = AuthCodeFlow::new(&session, &credentials);
    /// let code = flow.run().await?;
    /// assert_eq!(flow.state(), FlowState::Done);
    /// ```
    pub async fn run(&mut self) -> Result<AuthCode, HealthPlanetError> {
        if self.state != FlowState::Init {
            return Err(HealthPlanetError::Authorization(
                "authorization flow already ran".to_string(),
            ));
        }

        info!("HealthPlanet login: {}", self.state);
        let result = self.drive().await;
        self.enter(match result {
            Ok(_) => FlowState::Done,
            Err(_) => FlowState::Failed,
        });
        result
    }

    fn enter(&mut self, next: FlowState) {
        self.state = next;
        info!("HealthPlanet login: {}", next);
    }

    async fn drive(&mut self) -> Result<AuthCode, HealthPlanetError> {
        let auth_url = authorization_url(self.session.origin(), self.credentials);
        let login_page = Page::get(self.session, &auth_url).await?;
        let login_form = HtmlForm::find(&login_page.body, LOGIN_FORM)
            .ok_or(HealthPlanetError::FormNotFound(LOGIN_FORM))?;

        self.enter(FlowState::LoggingIn);
        let mut login = FormSubmitter::new(self.session, login_form, &login_page.url);
        login.set_field("loginId", &self.credentials.user_id);
        login.set_field("passwd", &self.credentials.user_pass);
        login.set_field("send", "1");
        let after_login = login.submit().await?;

        self.enter(FlowState::AwaitingConsent);
        let last_page = match HtmlForm::find(&after_login.body, CONSENT_FORM) {
            Some(consent_form) => {
                info!("HealthPlanet login: granting consent");
                let mut consent =
                    FormSubmitter::new(self.session, consent_form, &after_login.url);
                consent.set_field("approval", "true");
                consent.submit().await?
            }
            None => {
                info!("HealthPlanet login: no consent form, reading login redirect");
                after_login
            }
        };

        parse_authorization_redirect(&last_page.url)
    }
}

/// Reads the outcome of the authorization redirect from its query string.
///
/// A non-empty `code` wins over `error`; a URL with neither is an error too.
pub fn parse_authorization_redirect(url: &str) -> Result<AuthCode, HealthPlanetError> {
    let pairs: Vec<(String, String)> = Url::parse(url)
        .map(|u| u.query_pairs().into_owned().collect())
        .unwrap_or_default();

    let code = pairs
        .iter()
        .find(|(k, _)| k == "code")
        .and_then(|(_, v)| AuthCode::new(v.clone()));
    if let Some(code) = code {
        return Ok(code);
    }

    if let Some((_, error)) = pairs.iter().find(|(k, _)| k == "error") {
        let error = if error.is_empty() { "unknown" } else { error };
        return Err(HealthPlanetError::Authorization(error.to_string()));
    }

    Err(HealthPlanetError::Authorization(
        "no code or error in response".to_string(),
    ))
}

/// Exchanges an authorization code for an access token.
///
/// POSTs `client_id`, `client_secret`, `redirect_uri`, `code` and
/// `grant_type=authorization_code` to the token endpoint on the same session.
///
/// # Arguments
///
/// * `session` - Session the code was obtained on
/// * `credentials` - Supplies the client id, secret and redirect URI
/// * `code` - Code read off the authorization redirect
///
/// # Errors
///
/// - [`HealthPlanetError::Http`] for network failures and error statuses
/// - [`HealthPlanetError::TokenResponse`] when the reply is not JSON
/// - [`HealthPlanetError::MissingToken`] when it has no usable `access_token`
///
/// # Example
///
/// ```
/// let code = AuthCodeFlow::new(&session, &credentials).run().await?;
/// let token = exchange_code(&session, &credentials, &code).await?;
/// ```
pub async fn exchange_code(
    session: &Session,
    credentials: &Credentials,
    code: &AuthCode,
) -> Result<AccessToken, HealthPlanetError> {
    let response = session
        .client()
        .post(session.url(TOKEN_PATH))
        .form(&[
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
            ("redirect_uri", credentials.redirect_uri.as_str()),
            ("code", code.as_str()),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await?
        .error_for_status()?;

    let body = response.text().await?;
    parse_token_response(&body)
}

/// Pulls `access_token` out of a token endpoint reply.
///
/// A missing, non-string or empty `access_token` is
/// [`HealthPlanetError::MissingToken`].
pub fn parse_token_response(body: &str) -> Result<AccessToken, HealthPlanetError> {
    let json: Value = serde_json::from_str(body).map_err(HealthPlanetError::TokenResponse)?;

    json.get("access_token")
        .and_then(Value::as_str)
        .filter(|token| !token.is_empty())
        .map(AccessToken::new)
        .ok_or(HealthPlanetError::MissingToken)
}
