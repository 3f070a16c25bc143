#![allow(dead_code)]

use std::time::Duration;

use hpscan::{healthplanet::SessionSettings, types::Credentials};
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_string_contains, header, header_exists, method, path, query_param},
};

pub const LOGIN_HTML: &str = include_str!("../fixtures/login.html");
pub const CONSENT_HTML: &str = include_str!("../fixtures/consent.html");
pub const NO_FORM_HTML: &str = include_str!("../fixtures/no_form.html");
pub const TABLE_LOGIN_HTML: &str = include_str!("../fixtures/table_login.html");
pub const INNERSCAN_JSON: &str = include_str!("../fixtures/innerscan.json");

pub const SESSION_COOKIE: &str = "JSESSIONID=s-42";

pub fn credentials(server: &MockServer) -> Credentials {
    Credentials {
        client_id: "cid".to_string(),
        client_secret: "csecret".to_string(),
        user_id: "user@example.com".to_string(),
        user_pass: "p@ss word".to_string(),
        redirect_uri: format!("{}/success.html", server.uri()),
    }
}

pub fn settings(server: &MockServer) -> SessionSettings {
    SessionSettings {
        origin: server.uri(),
        timeout: Duration::from_secs(5),
    }
}

pub fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8")
}

/// 302 to the redirect URI with the given query string.
pub fn redirect_to_callback(server: &MockServer, query: &str) -> ResponseTemplate {
    ResponseTemplate::new(302).insert_header("location", format!("{}/success.html?{}", server.uri(), query))
}

/// Authorization page. Sets the session cookie the later steps must send.
pub async fn mount_login_page(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/oauth/auth"))
        .and(query_param("client_id", "cid"))
        .and(query_param("redirect_uri", format!("{}/success.html", server.uri())))
        .and(query_param("scope", "innerscan"))
        .and(query_param("response_type", "code"))
        .respond_with(response.insert_header("set-cookie", format!("{SESSION_COOKIE}; Path=/")))
        .expect(1)
        .mount(server)
        .await;
}

/// Login form target. Only matches a browser-like submission carrying the
/// credentials, the preserved hidden field and the session cookie.
pub async fn mount_login_submit(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/login_oauth.do"))
        .and(body_string_contains("loginId=user%40example.com"))
        .and(body_string_contains("passwd=p%40ss+word"))
        .and(body_string_contains("send=1"))
        .and(body_string_contains("csrf_token=tok-123"))
        .and(header("origin", server.uri().as_str()))
        .and(header_exists("referer"))
        .and(header("cookie", SESSION_COOKIE))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

pub async fn mount_consent_submit(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/approval.do"))
        .and(body_string_contains("approval=true"))
        .and(body_string_contains("oauth_token=hid-9"))
        .and(header("referer", format!("{}/login_oauth.do", server.uri()).as_str()))
        .and(header("cookie", SESSION_COOKIE))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

pub async fn mount_callback_page(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/success.html"))
        .respond_with(html("<html><body>success</body></html>"))
        .mount(server)
        .await;
}

pub async fn mount_token(server: &MockServer, code: &str, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains(format!("code={code}")))
        .and(body_string_contains("client_id=cid"))
        .and(body_string_contains("client_secret=csecret"))
        .and(body_string_contains("grant_type=authorization_code"))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

pub fn token_body(token: &str) -> Value {
    json!({
        "access_token": token,
        "expires_in": 2592000,
        "refresh_token": "refresh-1"
    })
}

pub async fn mount_innerscan(server: &MockServer, token: &str, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/status/innerscan.json"))
        .and(body_string_contains(format!("access_token={token}")))
        .and(body_string_contains("date_type=1"))
        .and(body_string_contains("tag=6021"))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

pub fn innerscan_response() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(INNERSCAN_JSON, "application/json")
}

/// Login, consent, token and innerscan endpoints all answering normally.
pub async fn mount_happy_path(server: &MockServer) {
    mount_login_page(server, html(LOGIN_HTML)).await;
    mount_login_submit(server, html(CONSENT_HTML)).await;
    mount_consent_submit(server, redirect_to_callback(server, "code=ABC&state=1")).await;
    mount_callback_page(server).await;
    mount_token(
        server,
        "ABC",
        ResponseTemplate::new(200).set_body_json(token_body("T-1")),
    )
    .await;
    mount_innerscan(server, "T-1", innerscan_response()).await;
}
