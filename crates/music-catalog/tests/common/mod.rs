//! Common test utilities for integration tests

#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use music_catalog::auth::{AuthorizationStatus, MediaAuthorizer};
use music_catalog::http::{HttpClient, HttpResponse};
use reqwest::header::HeaderMap;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const TOKEN_SERVER: &str = "https://tokens.example.com/token";
pub const DEVELOPER_TOKEN: &str = "developer-jwt";

/// HTTP stub serving canned bodies and counting requests
#[derive(Clone, Default)]
pub struct StubHttpClient {
    gets: Arc<Mutex<HashMap<String, (u16, String)>>>,
    posts: Arc<Mutex<HashMap<String, (u16, String)>>>,
    get_log: Arc<Mutex<Vec<String>>>,
    post_log: Arc<Mutex<Vec<Value>>>,
}

impl StubHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stub with a token server handing out [`DEVELOPER_TOKEN`]
    pub fn with_token_server() -> Self {
        Self::new().post(TOKEN_SERVER, 200, &json!({ "token": DEVELOPER_TOKEN }).to_string())
    }

    pub fn get(self, url: &str, status: u16, body: &str) -> Self {
        self.gets
            .lock()
            .unwrap()
            .insert(url.to_string(), (status, body.to_string()));
        self
    }

    pub fn post(self, url: &str, status: u16, body: &str) -> Self {
        self.posts
            .lock()
            .unwrap()
            .insert(url.to_string(), (status, body.to_string()));
        self
    }

    /// URLs requested with GET, in order
    pub fn get_urls(&self) -> Vec<String> {
        self.get_log.lock().unwrap().clone()
    }

    /// Bodies POSTed, in order
    pub fn post_bodies(&self) -> Vec<Value> {
        self.post_log.lock().unwrap().clone()
    }

    pub fn total_requests(&self) -> usize {
        self.get_log.lock().unwrap().len() + self.post_log.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpClient for StubHttpClient {
    async fn get_response(&self, url: &str, _headers: &HeaderMap) -> Result<HttpResponse> {
        self.get_log.lock().unwrap().push(url.to_string());
        let (status, body) = self
            .gets
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("connection refused: {}", url))?;
        Ok(HttpResponse { status, body })
    }

    async fn post_json(&self, url: &str, body: &Value, _headers: &HeaderMap) -> Result<HttpResponse> {
        self.post_log.lock().unwrap().push(body.clone());
        let (status, body) = self
            .posts
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("connection refused: {}", url))?;
        Ok(HttpResponse { status, body })
    }
}

/// Authorizer with a fixed answer
pub struct StubAuthorizer {
    pub status: AuthorizationStatus,
    pub user_token: Option<String>,
}

impl StubAuthorizer {
    pub fn granting(token: &str) -> Self {
        Self {
            status: AuthorizationStatus::Authorized,
            user_token: Some(token.to_string()),
        }
    }

    pub fn denying() -> Self {
        Self {
            status: AuthorizationStatus::Denied,
            user_token: None,
        }
    }

    pub fn failing_exchange() -> Self {
        Self {
            status: AuthorizationStatus::Authorized,
            user_token: None,
        }
    }
}

#[async_trait]
impl MediaAuthorizer for StubAuthorizer {
    async fn request_authorization(&self) -> AuthorizationStatus {
        self.status
    }

    async fn request_user_token(&self, _developer_token: &str) -> Result<String> {
        self.user_token
            .clone()
            .ok_or_else(|| anyhow::anyhow!("exchange failed"))
    }
}

/// Catalog URL for the `us` storefront
pub fn catalog_url(path: &str) -> String {
    format!("https://api.music.apple.com/v1/catalog/us/{}", path)
}
