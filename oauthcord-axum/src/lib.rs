use axum::extract::FromRef;
use oauthcord_core::{AuthError, ProviderConfig};
use oauthcord_flow::{ErasedOAuthFlow, ProviderRegistry};
use std::collections::HashMap;
use std::sync::Arc;
pub use tower_cookies::cookie::SameSite;
pub use tower_cookies::Cookie;

pub mod helpers;

pub use helpers::*;

/// Flows reachable under `/auth/{provider}`, keyed by provider id.
#[derive(Clone)]
pub struct OAuthState {
    pub flows: HashMap<String, Arc<dyn ErasedOAuthFlow>>,
    /// Mark the CSRF state cookie `Secure`. Turn off only for plain-http local development.
    pub secure_cookies: bool,
}

impl OAuthState {
    pub fn new() -> Self {
        Self {
            flows: HashMap::new(),
            secure_cookies: true,
        }
    }

    pub fn with_flow(mut self, flow: Arc<dyn ErasedOAuthFlow>) -> Self {
        self.flows.insert(flow.provider_id(), flow);
        self
    }

    pub fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.secure_cookies = secure;
        self
    }

    /// Build one flow per configured driver.
    pub fn from_registry(
        registry: &ProviderRegistry,
        configs: HashMap<String, ProviderConfig>,
    ) -> Result<Self, AuthError> {
        configs
            .into_iter()
            .try_fold(Self::new(), |state, (driver, config)| {
                Ok(state.with_flow(registry.build(&driver, config)?))
            })
    }

    pub fn flow(&self, provider: &str) -> Result<&Arc<dyn ErasedOAuthFlow>, OAuthAxumError> {
        self.flows
            .get(provider)
            .ok_or_else(|| OAuthAxumError::from(AuthError::UnknownProvider(provider.to_string())))
    }
}

impl Default for OAuthState {
    fn default() -> Self {
        Self::new()
    }
}

pub trait OAuthAxumExt {
    fn axum_router<S>(&self) -> axum::Router<S>
    where
        S: Clone + Send + Sync + 'static,
        OAuthState: FromRef<S>;
}

impl OAuthAxumExt for OAuthState {
    fn axum_router<S>(&self) -> axum::Router<S>
    where
        S: Clone + Send + Sync + 'static,
        OAuthState: FromRef<S>,
    {
        use axum::routing::get;
        axum::Router::new()
            .route("/auth/{provider}", get(helpers::axum_login_handler::<S>))
            .route(
                "/auth/{provider}/callback",
                get(helpers::axum_callback_handler::<S>),
            )
            .route("/auth/{provider}/me", get(helpers::axum_me_handler::<S>))
    }
}
