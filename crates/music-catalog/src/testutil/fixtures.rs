//! Test fixtures
//!
//! Canned configuration, URLs and response bodies shared by unit tests.

use serde_json::{json, Value};

use super::mocks::MockHttpClient;
use crate::catalog::CATALOG_BASE_URL;
use crate::config::SessionConfig;

pub const TOKEN_SERVER: &str = "https://tokens.example.com/token";
pub const DEVELOPER_TOKEN: &str = "eyJhbGciOiJFUzI1NiJ9.dev";

/// A complete developer-mode session pointing at [`TOKEN_SERVER`]
pub fn session() -> SessionConfig {
    SessionConfig::new("KEY123", "TEAM456", TOKEN_SERVER)
}

/// Token server success body
pub fn token_body(token: &str) -> String {
    json!({ "token": token }).to_string()
}

/// Adds a token server that hands out [`DEVELOPER_TOKEN`]
pub fn with_token_server(mock: MockHttpClient) -> MockHttpClient {
    mock.on_post(TOKEN_SERVER, 200, token_body(DEVELOPER_TOKEN))
}

/// Catalog URL for the `us` storefront, e.g. `catalog_url("songs/1")`
pub fn catalog_url(path: &str) -> String {
    format!("{}/v1/catalog/us/{}", CATALOG_BASE_URL, path)
}

/// `{"data": [...]}` body
pub fn data_envelope(entries: Vec<Value>) -> String {
    json!({ "data": entries }).to_string()
}

/// `{"errors": [...]}` body with a single error
pub fn error_envelope(status: &str, code: &str, title: &str) -> String {
    json!({ "errors": [{ "status": status, "code": code, "title": title }] }).to_string()
}
