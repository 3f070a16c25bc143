use std::time::Duration;

use crate::{
    config, error,
    error::FailureKind,
    healthplanet::{self, SessionSettings},
    success,
    types::{InnerscanQuery, SeriesResponse},
    utils, warning,
};

pub async fn fetch(query: InnerscanQuery, json: bool, timeout: Option<u64>) {
    // stdout is reserved for the JSON document
    crate::set_quiet(json);

    let credentials = match config::credentials() {
        Ok(c) => c,
        Err(e) => error!("Cannot load credentials. Err: {}", e),
    };

    let mut settings = match SessionSettings::from_env() {
        Ok(s) => s,
        Err(e) => error!("Cannot load configuration. Err: {}", e),
    };
    if let Some(secs) = timeout {
        settings.timeout = Duration::from_secs(secs);
    }

    let pb = utils::spinner("Fetching measurements from HealthPlanet...");
    let result = healthplanet::fetch_with_fresh_session(&settings, &credentials, &query).await;
    pb.finish_and_clear();

    let scale = match result {
        Ok(scale) => scale,
        Err(e) => match e.kind() {
            FailureKind::Authentication => {
                error!("Could not authenticate with HealthPlanet. Err: {}", e)
            }
            FailureKind::Data => error!("Could not read measurement data. Err: {}", e),
            FailureKind::Transport => error!("Could not reach HealthPlanet. Err: {}", e),
        },
    };

    if json {
        match serde_json::to_string_pretty(&SeriesResponse::from(scale.records)) {
            Ok(out) => println!("{}", out),
            Err(e) => error!("Cannot serialize measurements. Err: {}", e),
        }
        return;
    }

    if scale.records.is_empty() {
        warning!("No measurements found for tag {}.", query.tag);
    } else {
        println!("{}", utils::measurement_table(&scale.records));
        success!("Fetched {} measurements.", scale.records.len());
    }

    if scale.dropped > 0 {
        warning!("Skipped {} malformed entries.", scale.dropped);
    }
}
