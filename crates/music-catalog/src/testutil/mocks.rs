//! Mock implementations for testing
//!
//! This module re-exports mock implementations from their respective modules
//! for convenient access in tests.

// Re-export HTTP mocks
pub use crate::http::mock::{Method, MockHttpClient, RecordedRequest};

// Re-export media authorization mocks
pub use crate::auth::mock::MockAuthorizer;
