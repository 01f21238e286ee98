//! oauthcord signs users in with Discord over the OAuth2 Authorization Code flow.
//!
//! This crate serves as a facade, re-exporting functionality from the other `oauthcord-*` crates
//! based on enabled features.
//!
//! ```no_run
//! use oauthcord::core::ProviderConfig;
//! use oauthcord::flow::{ErasedOAuthFlow, ProviderRegistry};
//!
//! # async fn run() -> Result<(), oauthcord::core::AuthError> {
//! let mut registry = ProviderRegistry::default();
//! oauthcord::providers::discord::register(&mut registry);
//!
//! let flow = registry.build("discord", ProviderConfig::from_env("DISCORD")?)?;
//! let (url, state) = flow.initiate_login();
//! // Redirect the user to `url`, remember `state`, then on callback:
//! let (identity, _token) = flow.finalize_login("code", &state, &state).await?;
//! println!("{}", identity.id);
//! # Ok(())
//! # }
//! ```

pub use oauthcord_core as core;

#[cfg(feature = "flow")]
pub use oauthcord_flow as flow;

#[cfg(feature = "axum")]
pub use oauthcord_axum as axum;

/// Authentication providers.
pub mod providers {
    #[cfg(feature = "discord")]
    pub use oauthcord_providers_discord as discord;
}

pub use oauthcord_core::{AuthError, Identity, OAuthProvider, OAuthToken, ProviderConfig};

/// A registry with every provider enabled at compile time already registered.
#[cfg(feature = "flow")]
pub fn registry() -> flow::ProviderRegistry {
    #[allow(unused_mut)]
    let mut registry = flow::ProviderRegistry::default();
    #[cfg(feature = "discord")]
    providers::discord::register(&mut registry);
    registry
}
