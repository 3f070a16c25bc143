use chrono::NaiveDateTime;
use serde_json::Value;

use crate::{
    error::HealthPlanetError,
    types::{AccessToken, InnerscanQuery, MeasurementRecord, ScaleData},
};

use super::Session;

pub const INNERSCAN_PATH: &str = "/status/innerscan.json";

/// Compact timestamp used by the innerscan API, e.g. `202401151230`.
pub const DATE_FORMAT: &str = "%Y%m%d%H%M";

/// Requests innerscan measurements for `query` with `token`.
///
/// # Arguments
///
/// * `session` - Session to send the request on
/// * `token` - Access token from [`super::exchange_code`]
/// * `query` - `date_type` and `tag` form fields
///
/// # Returns
///
/// Parsed series plus the raw body, see [`parse_innerscan_response`].
///
/// # Errors
///
/// [`HealthPlanetError::Http`] for network failures and error statuses,
/// [`HealthPlanetError::DataResponse`] for a body without a `data` array.
///
/// # Example
///
/// ```
/// let scale = fetch_innerscan(&session, &token, &InnerscanQuery::default()).await?;
/// for record in &scale.records {
///     println!("{} {}", record.timestamp, record.value);
/// }
/// ```
pub async fn fetch_innerscan(
    session: &Session,
    token: &AccessToken,
    query: &InnerscanQuery,
) -> Result<ScaleData, HealthPlanetError> {
    let date_type = query.date_type.to_string();
    let response = session
        .client()
        .post(session.url(INNERSCAN_PATH))
        .form(&[
            ("access_token", token.as_str()),
            ("date_type", date_type.as_str()),
            ("tag", query.tag.as_str()),
        ])
        .send()
        .await?
        .error_for_status()?;

    let body = response.text().await?;
    parse_innerscan_response(&body)
}

/// Parses an innerscan reply into [`ScaleData`].
///
/// The body must be a JSON object with a `data` array. Entries inside it
/// that do not parse are skipped and only counted.
pub fn parse_innerscan_response(body: &str) -> Result<ScaleData, HealthPlanetError> {
    let raw: Value = serde_json::from_str(body)
        .map_err(|e| HealthPlanetError::DataResponse(format!("body is not valid JSON: {e}")))?;

    let entries = match raw.get("data") {
        Some(Value::Array(entries)) => entries,
        Some(_) => {
            return Err(HealthPlanetError::DataResponse(
                "`data` field is not an array".to_string(),
            ));
        }
        None => {
            return Err(HealthPlanetError::DataResponse(
                "response has no `data` field".to_string(),
            ));
        }
    };

    let (records, dropped) = parse_measurements(entries);
    Ok(ScaleData {
        raw,
        records,
        dropped,
    })
}

/// Converts raw entries, keeping their order. Returns the records and the
/// number of entries that were dropped.
pub fn parse_measurements(entries: &[Value]) -> (Vec<MeasurementRecord>, usize) {
    let records: Vec<MeasurementRecord> = entries.iter().filter_map(parse_entry).collect();
    let dropped = entries.len() - records.len();
    (records, dropped)
}

fn parse_entry(entry: &Value) -> Option<MeasurementRecord> {
    let date = entry.get("date")?.as_str()?;
    let timestamp = NaiveDateTime::parse_from_str(date, DATE_FORMAT).ok()?;

    // an absent keydata reads as zero, a present but unparseable one drops the entry
    let value = match entry.get("keydata") {
        None => 0.0,
        Some(Value::String(s)) => s.trim().parse::<f64>().ok()?,
        Some(Value::Number(n)) => n.as_f64()?,
        Some(_) => return None,
    };

    Some(MeasurementRecord { timestamp, value })
}
