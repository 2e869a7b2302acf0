// tests/common/mod.rs
use std::sync::{Arc, Mutex};

use httpmock::Method::POST;
use httpmock::{Mock, MockServer};
use serde_json::json;

use crate::api::diagnostics::{Diagnostic, DiagnosticSink};
use crate::api::ApiClient;
use crate::auth::TokenProvider;
use crate::cache::token::Token;
use crate::config::settings::{PreludeConfig, SettingsConfig};
use crate::config::store::{ConfigStore, MemoryConfigStore};

pub const TOKEN_PATH: &str = "/oauth/token";
pub const API_PATH: &str = "/api";
pub const CLIENT_ID: &str = "glpi-client";
pub const CLIENT_SECRET: &str = "s3cr3t";

/// Collects diagnostics for assertions.
#[derive(Debug, Default)]
pub struct MemorySink(Mutex<Vec<Diagnostic>>);

impl MemorySink {
    pub fn records(&self) -> Vec<Diagnostic> {
        self.0.lock().unwrap().clone()
    }
}

impl DiagnosticSink for MemorySink {
    fn record(&self, diagnostic: Diagnostic) {
        self.0.lock().unwrap().push(diagnostic);
    }
}

pub struct TestClient {
    pub client: ApiClient<MemoryConfigStore, MemorySink>,
    pub store: Arc<MemoryConfigStore>,
    pub sink: Arc<MemorySink>,
}

pub fn test_settings() -> SettingsConfig {
    SettingsConfig {
        connect_timeout_ms: 2000,
        request_timeout_ms: 2000,
        safety_margin_seconds: Some(10),
        ..SettingsConfig::default()
    }
}

pub fn build_test_client(prelude_url: &str) -> TestClient {
    build_test_client_with(prelude_url, test_settings())
}

pub fn build_test_client_with(prelude_url: &str, settings: SettingsConfig) -> TestClient {
    let store = Arc::new(MemoryConfigStore::new(prelude_config(prelude_url)));
    let sink = Arc::new(MemorySink::default());
    let provider = TokenProvider::new(store.clone(), &settings).unwrap();
    let client = ApiClient::with_diagnostics(provider, &settings, sink.clone()).unwrap();
    TestClient { client, store, sink }
}

pub fn prelude_config(prelude_url: &str) -> PreludeConfig {
    PreludeConfig::new(prelude_url, CLIENT_ID, CLIENT_SECRET)
}

pub async fn seed_token(store: &MemoryConfigStore, value: &str) {
    store
        .store_access_token(Token::from_expires_in(value.to_owned(), 3600, 10))
        .await
        .unwrap();
}

pub fn mock_token_endpoint<'a>(server: &'a MockServer, access_token: &str) -> Mock<'a> {
    server.mock(|when, then| {
        when.method(POST)
            .path(TOKEN_PATH)
            .body_includes("grant_type=client_credentials");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({
                "access_token": access_token,
                "token_type": "Bearer",
                "expires_in": 3600
            }));
    })
}

/// Url of a local port nothing listens on.
pub fn unused_local_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}
