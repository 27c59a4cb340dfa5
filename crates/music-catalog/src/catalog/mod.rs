mod client;
pub mod envelope;
mod error;
mod request;
pub mod resource;
mod types;

pub use client::CatalogClient;
pub use envelope::Outcome;
pub use error::CatalogError;
pub use request::{CatalogRequest, CATALOG_BASE_URL};
pub use resource::CatalogResource;
pub use types::*;
