mod authorizer;
mod provider;

pub use authorizer::{AuthorizationStatus, DeniedAuthorizer, MediaAuthorizer, PresetUserToken};
pub use provider::{TokenError, TokenPair, TokenProvider};

#[cfg(test)]
pub use authorizer::mock;
