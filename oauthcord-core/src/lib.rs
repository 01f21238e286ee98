//! # oauthcord Core
//!
//! `oauthcord-core` provides the foundational types and the generic OAuth2 base
//! used by every provider adapter.
//!
//! ## Key Components
//!
//! - **[`Identity`]**: The canonical user identity every provider maps into.
//! - **[`OAuthProvider`]**: The hook trait a provider adapter implements.
//! - **[`OAuth2Client`]**: The provider-independent Authorization Code plumbing adapters compose.
//! - **[`AuthError`]**: The error taxonomy shared by the whole workspace.

#![warn(missing_docs)]

use async_trait::async_trait;

/// The generic OAuth2 base client.
pub mod client;
/// Provider credentials.
pub mod config;
/// Error types.
pub mod error;
/// Identity and token types.
pub mod state;

pub use client::{OAuth2Client, TokenFields};
pub use config::ProviderConfig;
pub use error::{AuthError, OAuthErrorResponse};
pub use state::{Identity, OAuthToken, RawProfile};

/// Hooks an OAuth2 Authorization Code provider supplies.
///
/// A provider owns an [`OAuth2Client`] and overrides only the steps that differ
/// from the standard flow. The default methods wire the hooks together.
#[async_trait]
pub trait OAuthProvider: Send + Sync {
    /// Get the provider identifier.
    fn provider_id(&self) -> &str;

    /// The generic client this provider is built on.
    fn client(&self) -> &OAuth2Client;

    /// Build the URL of the provider's consent screen for the given CSRF state.
    fn authorization_url(&self, state: &str) -> String;

    /// The provider's token endpoint.
    fn token_url(&self) -> &str;

    /// Fields posted to the token endpoint.
    fn token_fields(&self, code: &str) -> TokenFields {
        self.client().token_fields(code)
    }

    /// Fetch the raw profile of the user the access token belongs to.
    async fn fetch_user(&self, access_token: &str) -> Result<RawProfile, AuthError>;

    /// Map a raw profile into an [`Identity`].
    fn map_user(&self, raw: RawProfile) -> Result<Identity, AuthError>;

    /// Exchange an authorization code for an access token.
    async fn exchange_code(&self, code: &str) -> Result<OAuthToken, AuthError> {
        let fields = self.token_fields(code);
        self.client().exchange_code(self.token_url(), &fields).await
    }

    /// Fetch and normalize the user behind an access token.
    async fn user_from_token(&self, access_token: &str) -> Result<Identity, AuthError> {
        let raw = self.fetch_user(access_token).await?;
        self.map_user(raw)
    }
}
