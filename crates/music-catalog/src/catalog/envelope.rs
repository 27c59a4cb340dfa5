//! Response envelope classification
//!
//! A catalog body is either `{"data": [...]}` or `{"errors": [...]}`.
//! Anything else, including bodies that fail to parse, is treated the same as
//! a missing token.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

use super::error::CatalogError;

/// One entry of a top-level `data` array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceObject {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub href: Option<String>,
    pub attributes: Map<String, Value>,
    #[serde(default)]
    pub relationships: Option<HashMap<String, RelationshipObject>>,
}

/// A named entry of a `relationships` bag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipObject {
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub data: Vec<RelatedObject>,
}

/// A related resource, often just an identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedObject {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub attributes: Option<Map<String, Value>>,
}

/// Classification of a catalog response body
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// `data` array, in response order (may be empty)
    Resources(Vec<ResourceObject>),
    /// First entry of a non-empty `errors` array
    Error(CatalogError),
    /// No token, transport failure, or a body matching neither shape
    Unauthorized,
}

impl Outcome {
    pub fn into_result(self) -> Result<Vec<ResourceObject>, CatalogError> {
        match self {
            Outcome::Resources(objects) => Ok(objects),
            Outcome::Error(err) => Err(err),
            Outcome::Unauthorized => Err(CatalogError::unauthorized()),
        }
    }
}

/// Classifies a response body
///
/// `data` is probed first; `errors` only when `data` is absent or null.
pub fn classify(body: &str) -> Outcome {
    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Catalog response is not JSON: {}", e);
            return Outcome::Unauthorized;
        }
    };

    if let Some(data) = value.get("data").filter(|d| !d.is_null()) {
        return match Vec::<ResourceObject>::deserialize(data) {
            Ok(objects) => Outcome::Resources(objects),
            Err(e) => {
                tracing::warn!("Malformed data envelope: {}", e);
                Outcome::Unauthorized
            }
        };
    }

    let first_error = value
        .get("errors")
        .and_then(Value::as_array)
        .and_then(|errors| errors.first());

    match first_error.map(CatalogError::deserialize) {
        Some(Ok(err)) => Outcome::Error(err),
        Some(Err(e)) => {
            tracing::warn!("Malformed errors envelope: {}", e);
            Outcome::Unauthorized
        }
        None => Outcome::Unauthorized,
    }
}
