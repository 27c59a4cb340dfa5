use serde::{Deserialize, Serialize};

const UNAUTHORIZED_STATUS: &str = "401";
const UNAUTHORIZED_CODE: &str = "unauthorized";
const UNAUTHORIZED_TITLE: &str = "Unauthorized";
const UNAUTHORIZED_DETAIL: &str = "Developer token is missing or needs to be refreshed.";

/// Error returned by every catalog call
///
/// Either the first entry of an `errors` envelope, passed through verbatim,
/// or the locally synthesized [`CatalogError::unauthorized`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{status} {code}: {title}")]
pub struct CatalogError {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub detail: String,
}

impl CatalogError {
    /// The error for a missing token, a failed transport, or an unrecognized body
    pub fn unauthorized() -> Self {
        Self {
            status: UNAUTHORIZED_STATUS.to_string(),
            code: UNAUTHORIZED_CODE.to_string(),
            title: UNAUTHORIZED_TITLE.to_string(),
            detail: UNAUTHORIZED_DETAIL.to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == UNAUTHORIZED_STATUS && self.code == UNAUTHORIZED_CODE
    }
}
