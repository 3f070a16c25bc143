//! Configuration management for hpscan.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file. The lookup order is:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory (`<data_local_dir>/hpscan/.env`)
//! 3. `.env` file in the current working directory
//! 4. Application defaults (where applicable)

use std::{env, net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use thiserror::Error;

use crate::types::Credentials;

pub const CLIENT_ID: &str = "HEALTHPLANET_CLIENT_ID";
pub const CLIENT_SECRET: &str = "HEALTHPLANET_CLIENT_SECRET";
pub const USER_ID: &str = "HEALTHPLANET_USER_ID";
pub const USER_PASS: &str = "HEALTHPLANET_USER_PASS";
pub const REDIRECT_URI: &str = "HEALTHPLANET_REDIRECT_URI";
pub const ORIGIN: &str = "HEALTHPLANET_ORIGIN";
pub const HTTP_TIMEOUT_SECS: &str = "HPSCAN_HTTP_TIMEOUT_SECS";
pub const SERVER_ADDRESS: &str = "SERVER_ADDRESS";

pub const DEFAULT_ORIGIN: &str = "https://www.healthplanet.jp";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required configuration: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("invalid value `{value}` for {key}")]
    Invalid { key: &'static str, value: String },

    #[error("cannot prepare configuration directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot read .env file: {0}")]
    Dotenv(#[from] dotenv::Error),
}

/// Loads environment variables from `.env` files.
///
/// Creates `<data_local_dir>/hpscan/` if needed and loads its `.env` when it
/// exists, otherwise falls back to a `.env` in the working directory. Having
/// no `.env` at all is fine: the variables may already be exported.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or an existing `.env`
/// file cannot be parsed.
pub async fn load_env() -> Result<(), ConfigError> {
    let path = env_file_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if path.is_file() {
        dotenv::from_path(&path)?;
        return Ok(());
    }

    match dotenv::dotenv() {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn env_file_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("hpscan/.env");
    path
}

/// Returns the address the local HTTP server binds to.
///
/// Reads `SERVER_ADDRESS`, defaulting to `127.0.0.1:8000`.
pub fn server_addr() -> Result<SocketAddr, ConfigError> {
    let raw = env::var(SERVER_ADDRESS).unwrap_or_else(|_| DEFAULT_SERVER_ADDRESS.to_string());
    SocketAddr::from_str(&raw).map_err(|_| ConfigError::Invalid {
        key: SERVER_ADDRESS,
        value: raw,
    })
}

/// Returns the HealthPlanet origin every request is made against.
///
/// Reads `HEALTHPLANET_ORIGIN`, defaulting to `https://www.healthplanet.jp`.
/// A trailing slash is stripped.
pub fn origin() -> String {
    let raw = env::var(ORIGIN).unwrap_or_else(|_| DEFAULT_ORIGIN.to_string());
    raw.trim_end_matches('/').to_string()
}

/// Returns the per-request timeout for outbound HTTP calls.
///
/// Reads `HPSCAN_HTTP_TIMEOUT_SECS`, defaulting to 30 seconds.
pub fn http_timeout() -> Result<Duration, ConfigError> {
    match env::var(HTTP_TIMEOUT_SECS) {
        Ok(raw) => parse_timeout(&raw).ok_or(ConfigError::Invalid {
            key: HTTP_TIMEOUT_SECS,
            value: raw,
        }),
        Err(_) => Ok(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS)),
    }
}

fn parse_timeout(raw: &str) -> Option<Duration> {
    match raw.trim().parse::<u64>() {
        Ok(0) | Err(_) => None,
        Ok(secs) => Some(Duration::from_secs(secs)),
    }
}

/// Reads the five required credential values from the process environment.
pub fn credentials() -> Result<Credentials, ConfigError> {
    Credentials::from_lookup(|key| env::var(key).ok())
}

impl Credentials {
    /// Builds credentials from an arbitrary key lookup.
    ///
    /// Blank values count as missing. All missing keys are reported together.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut read = |key: &'static str| match lookup(key) {
            Some(v) if !v.trim().is_empty() => v,
            _ => {
                missing.push(key);
                String::new()
            }
        };

        let credentials = Credentials {
            client_id: read(CLIENT_ID),
            client_secret: read(CLIENT_SECRET),
            user_id: read(USER_ID),
            user_pass: read(USER_PASS),
            redirect_uri: read(REDIRECT_URI),
        };

        if missing.is_empty() {
            Ok(credentials)
        } else {
            Err(ConfigError::Missing(missing))
        }
    }
}
