//! Client library for the Apple Music catalog API
//!
//! Each call acquires a developer token from a token server (and, in user
//! mode, a user token through a [`auth::MediaAuthorizer`]), issues one GET
//! against the catalog, and returns either the decoded model or a
//! [`catalog::CatalogError`].
//!
//! ```no_run
//! # async fn run() -> Result<(), music_catalog::catalog::CatalogError> {
//! music_catalog::config::initialize("KEY_ID", "TEAM_ID", "https://tokens.example.com/token");
//!
//! let client = music_catalog::CatalogClient::new();
//! let artist = client.artist("us", "271256", None).await?;
//! println!("{}", artist.attributes.name);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod catalog;
pub mod config;
pub mod http;
pub mod logging;

#[cfg(test)]
mod testutil;

pub use catalog::{CatalogClient, CatalogError};
pub use config::{AuthMode, SessionConfig};
