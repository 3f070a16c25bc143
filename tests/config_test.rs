use std::collections::HashMap;

use hpscan::{
    config::{self, ConfigError},
    types::Credentials,
};

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

const ALL: [(&str, &str); 5] = [
    (config::CLIENT_ID, "cid"),
    (config::CLIENT_SECRET, "csecret"),
    (config::USER_ID, "user"),
    (config::USER_PASS, "hunter2"),
    (config::REDIRECT_URI, "https://www.healthplanet.jp/success.html"),
];

#[test]
fn test_credentials_from_complete_lookup() {
    let credentials = Credentials::from_lookup(lookup(&ALL)).unwrap();

    assert_eq!(credentials.client_id, "cid");
    assert_eq!(credentials.client_secret, "csecret");
    assert_eq!(credentials.user_id, "user");
    assert_eq!(credentials.user_pass, "hunter2");
    assert_eq!(credentials.redirect_uri, "https://www.healthplanet.jp/success.html");
}

#[test]
fn test_credentials_report_every_missing_key() {
    let partial = [(config::CLIENT_ID, "cid"), (config::USER_ID, "  ")];
    let err = Credentials::from_lookup(lookup(&partial)).unwrap_err();

    match err {
        ConfigError::Missing(keys) => assert_eq!(
            keys,
            vec![
                config::CLIENT_SECRET,
                config::USER_ID,
                config::USER_PASS,
                config::REDIRECT_URI
            ]
        ),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_credentials_debug_hides_secrets() {
    let credentials = Credentials::from_lookup(lookup(&ALL)).unwrap();
    let printed = format!("{credentials:?}");

    assert!(printed.contains("cid"));
    assert!(!printed.contains("csecret"));
    assert!(!printed.contains("hunter2"));
}
