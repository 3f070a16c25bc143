mod common;

use chrono::NaiveDate;
use hpscan::{
    error::{FailureKind, HealthPlanetError},
    healthplanet::{Session, fetch_innerscan, parse_innerscan_response, parse_measurements},
    types::{AccessToken, InnerscanQuery},
};
use serde_json::json;
use wiremock::{MockServer, ResponseTemplate};

#[test]
fn test_entry_is_normalized() {
    let (records, dropped) =
        parse_measurements(&[json!({"date": "202401151230", "keydata": "65.4"})]);

    assert_eq!(dropped, 0);
    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0].timestamp,
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap()
    );
    assert_eq!(records[0].value, 65.4);
}

#[test]
fn test_malformed_entry_is_dropped_silently() {
    let entries = vec![
        json!({"date": "202401151230", "keydata": "65.4"}),
        json!({"date": "bad", "keydata": "x"}),
    ];
    let (records, dropped) = parse_measurements(&entries);

    assert_eq!(records.len(), entries.len() - 1);
    assert_eq!(dropped, 1);
}

#[test]
fn test_entries_failing_either_field_are_dropped() {
    let entries = vec![
        json!({"date": "202413011200", "keydata": "60.0"}), // month 13
        json!({"date": "202401151230", "keydata": "sixty"}),
        json!({"date": "202401151230", "keydata": ""}),
        json!({"keydata": "60.0"}),
        json!({"date": "20240115", "keydata": "60.0"}),
        json!({"date": "202401151230", "keydata": ["60.0"]}),
    ];
    let (records, dropped) = parse_measurements(&entries);

    assert!(records.is_empty());
    assert_eq!(dropped, entries.len());
}

#[test]
fn test_order_is_preserved() {
    let entries = vec![
        json!({"date": "202402010800", "keydata": "3"}),
        json!({"date": "202401010800", "keydata": "1"}),
        json!({"date": "oops", "keydata": "9"}),
        json!({"date": "202401150800", "keydata": "2"}),
    ];
    let (records, _) = parse_measurements(&entries);

    let values: Vec<f64> = records.iter().map(|r| r.value).collect();
    assert_eq!(values, vec![3.0, 1.0, 2.0]);
}

#[test]
fn test_response_keeps_raw_body() {
    let scale = parse_innerscan_response(common::INNERSCAN_JSON).unwrap();

    assert_eq!(scale.records.len(), 3);
    assert_eq!(scale.dropped, 2);
    assert_eq!(scale.raw["height"], "170");
    assert_eq!(scale.raw["data"].as_array().unwrap().len(), 5);
}

#[test]
fn test_response_with_empty_data() {
    let scale = parse_innerscan_response(r#"{"data": []}"#).unwrap();
    assert!(scale.records.is_empty());
    assert_eq!(scale.dropped, 0);
}

#[test]
fn test_response_without_data_is_data_error() {
    for body in [r#"{}"#, r#"{"data": null}"#, r#"{"data": {"date": "202401151230"}}"#, "not json"] {
        let err = parse_innerscan_response(body).unwrap_err();
        assert!(matches!(err, HealthPlanetError::DataResponse(_)), "body: {body}");
        assert_eq!(err.kind(), FailureKind::Data);
    }
}

#[tokio::test]
async fn test_fetch_innerscan_posts_token_and_query() {
    let server = MockServer::start().await;
    let session = Session::new(&common::settings(&server)).unwrap();
    common::mount_innerscan(&server, "T-1", common::innerscan_response()).await;

    let scale = fetch_innerscan(&session, &AccessToken::new("T-1"), &InnerscanQuery::default())
        .await
        .unwrap();

    assert_eq!(scale.records.len(), 3);
    assert_eq!(scale.records[0].value, 65.4);
    assert_eq!(scale.records[2].value, 64.9);
}

#[tokio::test]
async fn test_fetch_innerscan_error_status() {
    let server = MockServer::start().await;
    let session = Session::new(&common::settings(&server)).unwrap();
    common::mount_innerscan(&server, "T-1", ResponseTemplate::new(401)).await;

    let err = fetch_innerscan(&session, &AccessToken::new("T-1"), &InnerscanQuery::default())
        .await
        .unwrap_err();

    assert!(matches!(err, HealthPlanetError::Http(_)));
}
