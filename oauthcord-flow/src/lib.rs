//! # oauthcord Flow
//!
//! `oauthcord-flow` orchestrates the OAuth2 Authorization Code flow on top of
//! the provider hooks defined in `oauthcord-core`, and resolves providers by
//! driver name.
//!
//! ## Key Components
//!
//! - **[`OAuth2Flow`]**: State generation, CSRF verification, code exchange and user mapping.
//! - **[`ErasedOAuthFlow`]**: Object-safe view of a flow, for storing flows of different providers together.
//! - **[`ProviderRegistry`]**: Factory registry keyed by driver name.

#![warn(missing_docs)]

use async_trait::async_trait;
use oauthcord_core::{AuthError, Identity, OAuthToken};

/// Authorization Code flow implementation.
pub mod oauth2;
/// Driver name to provider factory registry.
pub mod registry;

pub use oauth2::OAuth2Flow;
pub use registry::ProviderRegistry;

/// Orchestrates the Authorization Code flow behind a trait object.
#[async_trait]
pub trait ErasedOAuthFlow: Send + Sync {
    /// Get the provider identifier.
    fn provider_id(&self) -> String;
    /// Generates the redirect URL and CSRF state.
    fn initiate_login(&self) -> (String, String);
    /// Completes the flow by exchanging the code.
    async fn finalize_login(
        &self,
        code: &str,
        received_state: &str,
        expected_state: &str,
    ) -> Result<(Identity, OAuthToken), AuthError>;
    /// Fetch the identity behind an access token.
    async fn user_from_token(&self, access_token: &str) -> Result<Identity, AuthError>;
}
