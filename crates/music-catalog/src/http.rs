//! HTTP client abstraction shared by the token provider and the catalog dispatcher
//!
//! Both legs of a request chain go through [`HttpClient`] so they can be
//! replaced with canned responses in tests.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;

/// Trait for making HTTP requests
///
/// Implementations return the raw status and body; interpreting them is up to
/// the caller. A transport failure is an `Err`, never a synthetic status.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Makes a GET request and returns the raw response
    async fn get_response(&self, url: &str, headers: &HeaderMap) -> Result<HttpResponse>;

    /// POSTs a JSON body and returns the raw response
    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
        headers: &HeaderMap,
    ) -> Result<HttpResponse>;
}

/// Response from an HTTP request
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// Returns true if status is exactly 200
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Deserializes the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_str(&self.body)
    }
}

/// Production HTTP client using reqwest
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    inner: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a new reqwest-based HTTP client
    pub fn new() -> Self {
        Self {
            inner: reqwest::Client::new(),
        }
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get_response(&self, url: &str, headers: &HeaderMap) -> Result<HttpResponse> {
        let response = self
            .inner
            .get(url)
            .headers(headers.clone())
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status().as_u16();
        let body = response.text().await.context("Failed to read response body")?;

        Ok(HttpResponse { status, body })
    }

    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
        headers: &HeaderMap,
    ) -> Result<HttpResponse> {
        let response = self
            .inner
            .post(url)
            .headers(headers.clone())
            .json(body)
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status().as_u16();
        let body = response.text().await.context("Failed to read response body")?;

        Ok(HttpResponse { status, body })
    }
}
