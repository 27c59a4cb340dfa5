use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::json;

use super::authorizer::MediaAuthorizer;
use crate::config::{AuthMode, SessionConfig};
use crate::http::HttpClient;
use crate::logging::verbose;

/// Developer token acquisition errors
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Missing token information (key id, team id or token server)")]
    MissingTokenInformation,
    #[error("Token server request failed: {0:#}")]
    Transport(#[from] anyhow::Error),
    #[error("Token server returned status {0}")]
    Status(u16),
    #[error("Failed to decode token server response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Response body from the token server
#[derive(Debug, Clone, Deserialize)]
struct TokenResponse {
    token: String,
}

/// Tokens obtained by one request chain
///
/// A user token is only ever present alongside a developer token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenPair {
    pub developer: Option<String>,
    pub user: Option<String>,
}

impl TokenPair {
    fn developer_only(developer: String) -> Self {
        Self {
            developer: Some(developer),
            user: None,
        }
    }

    /// Returns true if neither token was obtained
    pub fn is_empty(&self) -> bool {
        self.developer.is_none()
    }
}

/// Two-tier token acquisition
///
/// Fetches a developer token from the configured token server and, in user
/// mode, upgrades it through the media authorizer. Nothing is cached: every
/// call performs the full round trip.
pub struct TokenProvider<H: HttpClient, A: MediaAuthorizer> {
    http: H,
    authorizer: A,
}

impl<H: HttpClient, A: MediaAuthorizer> TokenProvider<H, A> {
    pub fn new(http: H, authorizer: A) -> Self {
        Self { http, authorizer }
    }

    /// Acquires tokens for one request chain
    ///
    /// | step | failure | result |
    /// |---|---|---|
    /// | developer token | any | `(None, None)` |
    /// | user authorization | not authorized | `(None, None)` |
    /// | user token exchange | any | `(Some(dev), None)` |
    pub async fn acquire(&self, config: &SessionConfig) -> TokenPair {
        let developer = match self.developer_token(config).await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!("Developer token unavailable: {}", e);
                return TokenPair::default();
            }
        };

        match config.auth_mode {
            AuthMode::Developer => TokenPair::developer_only(developer),
            AuthMode::User => self.upgrade(developer, config.debug).await,
        }
    }

    /// Requests a developer token from the token server
    ///
    /// Fails without touching the network if credentials are incomplete.
    pub async fn developer_token(&self, config: &SessionConfig) -> Result<String, TokenError> {
        let creds = config
            .credentials()
            .ok_or(TokenError::MissingTokenInformation)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let body = json!({ "kid": creds.key_id, "tid": creds.team_id });

        verbose!(config.debug, "Requesting developer token from {}", creds.token_server);
        let response = self
            .http
            .post_json(creds.token_server, &body, &headers)
            .await?;

        if !response.is_ok() {
            return Err(TokenError::Status(response.status));
        }

        let token: TokenResponse = response.json()?;
        verbose!(config.debug, "Developer token received");
        Ok(token.token)
    }

    /// Upgrades a developer token to a user token
    ///
    /// Denied authorization discards the developer token as well.
    async fn upgrade(&self, developer: String, debug: bool) -> TokenPair {
        let status = self.authorizer.request_authorization().await;
        if !status.is_authorized() {
            tracing::warn!("Media authorization not granted: {:?}", status);
            return TokenPair::default();
        }

        match self.authorizer.request_user_token(&developer).await {
            Ok(user) => {
                verbose!(debug, "User token received");
                TokenPair {
                    developer: Some(developer),
                    user: Some(user),
                }
            }
            Err(e) => {
                tracing::warn!("User token unavailable, continuing with developer token: {:#}", e);
                TokenPair::developer_only(developer)
            }
        }
    }
}
