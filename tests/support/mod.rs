#![allow(dead_code)]

use fakturoid::{Config, Fakturoid};
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const SLUG: &str = "acme";

/// Mock server with a token endpoint that always issues `tok-1`.
pub async fn server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(token("tok-1"))
        .mount(&server)
        .await;
    server
}

pub fn token(value: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "access_token": value,
        "token_type": "Bearer",
        "expires_in": 7200
    }))
}

pub fn config(server: &MockServer) -> Config {
    Config::new(SLUG, "billing@acme.cz", "client", "secret").base_url(server.uri())
}

pub fn resource(endpoint: &str) -> String {
    format!("/accounts/{SLUG}/{endpoint}.json")
}

pub fn bearer(token: &str) -> wiremock::matchers::HeaderExactMatcher {
    header("authorization", format!("Bearer {token}").as_str())
}

/// Run blocking client code off the async test runtime.
pub async fn blocking<T, F>(server: &MockServer, f: F) -> T
where
    T: Send + 'static,
    F: FnOnce(Fakturoid) -> T + Send + 'static,
{
    let config = config(server);
    tokio::task::spawn_blocking(move || {
        let client = Fakturoid::new(config).expect("client connects");
        f(client)
    })
    .await
    .expect("blocking task panicked")
}

/// Minimal invoice JSON as the server returns it.
pub fn invoice_json(id: u64) -> Value {
    json!({
        "id": id,
        "number": format!("2024-{id:04}"),
        "status": "open",
        "subject_id": 16,
        "issued_on": "2024-01-15",
        "total": "1210.0",
        "lines": []
    })
}

pub fn invoice_page(first_id: u64, count: u64) -> Value {
    Value::Array((first_id..first_id + count).map(invoice_json).collect())
}
