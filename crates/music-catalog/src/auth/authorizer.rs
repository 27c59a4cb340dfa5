use anyhow::Result;
use async_trait::async_trait;

/// Outcome of asking the platform for media library access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationStatus {
    NotDetermined,
    Denied,
    Restricted,
    Authorized,
}

impl AuthorizationStatus {
    pub fn is_authorized(self) -> bool {
        self == Self::Authorized
    }
}

/// Platform media-authorization service
///
/// Asks the user for access, then exchanges a developer token for a
/// user-scoped token. Both calls complete exactly once.
#[async_trait]
pub trait MediaAuthorizer: Send + Sync {
    /// Prompts for (or reports existing) authorization
    async fn request_authorization(&self) -> AuthorizationStatus;

    /// Exchanges a developer token for a user token
    async fn request_user_token(&self, developer_token: &str) -> Result<String>;
}

/// Authorizer for hosts with no media-authorization service
///
/// Always denies, so user-mode sessions never obtain tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeniedAuthorizer;

#[async_trait]
impl MediaAuthorizer for DeniedAuthorizer {
    async fn request_authorization(&self) -> AuthorizationStatus {
        AuthorizationStatus::Denied
    }

    async fn request_user_token(&self, _developer_token: &str) -> Result<String> {
        anyhow::bail!("Media authorization is not available on this platform")
    }
}

/// Authorizer backed by a user token obtained out of band
///
/// Useful on servers where the end user authorized a device elsewhere and
/// handed over their music user token.
#[derive(Debug, Clone)]
pub struct PresetUserToken {
    token: String,
}

impl PresetUserToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl MediaAuthorizer for PresetUserToken {
    async fn request_authorization(&self) -> AuthorizationStatus {
        if self.token.trim().is_empty() {
            AuthorizationStatus::NotDetermined
        } else {
            AuthorizationStatus::Authorized
        }
    }

    async fn request_user_token(&self, _developer_token: &str) -> Result<String> {
        Ok(self.token.clone())
    }
}
