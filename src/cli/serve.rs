use std::{net::SocketAddr, sync::Arc, time::Duration};

use crate::{api::AppState, config, error, healthplanet::SessionSettings, info, server};

pub async fn serve(addr: Option<SocketAddr>, timeout: Option<u64>) {
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

    let addr = match addr {
        Some(addr) => addr,
        None => match config::server_addr() {
            Ok(addr) => addr,
            Err(e) => error!("Failed to parse server address: {}", e),
        },
    };

    info!("Serving measurements on http://{}", addr);
    let state = Arc::new(AppState {
        credentials,
        settings,
    });
    if let Err(e) = server::start_api_server(addr, state).await {
        error!("Server stopped. Err: {}", e);
    }
}
