use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tabled::Tabled;

/// Tag of the weight metric in the innerscan API.
pub const TAG_WEIGHT: &str = "6021";

/// `date_type=1` selects measurement time rather than registration time.
pub const DATE_TYPE_MEASURED: u8 = 1;

/// Application and account credentials. Loaded once, never mutated.
#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub user_id: String,
    pub user_pass: String,
    pub redirect_uri: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("user_id", &self.user_id)
            .field("user_pass", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .finish()
    }
}

/// Authorization code taken from the final redirect of the login flow.
///
/// Always non-empty; only the redirect parser creates one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCode(String);

impl AuthCode {
    pub(crate) fn new(code: String) -> Option<Self> {
        if code.is_empty() { None } else { Some(Self(code)) }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Parameters of an innerscan request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InnerscanQuery {
    #[serde(default = "default_date_type")]
    pub date_type: u8,
    #[serde(default = "default_tag")]
    pub tag: String,
}

fn default_date_type() -> u8 {
    DATE_TYPE_MEASURED
}

fn default_tag() -> String {
    TAG_WEIGHT.to_string()
}

impl Default for InnerscanQuery {
    fn default() -> Self {
        Self {
            date_type: default_date_type(),
            tag: default_tag(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

/// Result of one innerscan request.
#[derive(Debug, Clone)]
pub struct ScaleData {
    /// Response body exactly as HealthPlanet returned it.
    pub raw: Value,
    /// Parsed records in the order they were received.
    pub records: Vec<MeasurementRecord>,
    /// Number of raw entries skipped because they did not parse.
    pub dropped: usize,
}

/// Body served by the local endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesResponse {
    pub data: Vec<MeasurementRecord>,
    pub data_length: usize,
}

impl From<Vec<MeasurementRecord>> for SeriesResponse {
    fn from(data: Vec<MeasurementRecord>) -> Self {
        let data_length = data.len();
        Self { data, data_length }
    }
}

#[derive(Tabled)]
pub struct MeasurementTableRow {
    pub measured_at: String,
    pub value: String,
}

impl From<&MeasurementRecord> for MeasurementTableRow {
    fn from(record: &MeasurementRecord) -> Self {
        Self {
            measured_at: record.timestamp.format("%Y-%m-%d %H:%M").to_string(),
            value: format!("{:.2}", record.value),
        }
    }
}
