use oauthcord_core::{AuthError, OAuthProvider, ProviderConfig};
use std::collections::HashMap;
use std::sync::Arc;

use crate::{ErasedOAuthFlow, OAuth2Flow};

type Factory = Box<dyn Fn(ProviderConfig) -> Arc<dyn ErasedOAuthFlow> + Send + Sync>;

/// Resolves driver names (e.g. `"discord"`) to provider factories.
///
/// Provider crates expose a `register` function that calls [`ProviderRegistry::extend`];
/// the application then builds flows from its configuration.
#[derive(Default)]
pub struct ProviderRegistry {
    factories: HashMap<String, Factory>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `factory` under `driver`, replacing any previous registration.
    pub fn extend<P, F>(&mut self, driver: impl Into<String>, factory: F) -> &mut Self
    where
        P: OAuthProvider + 'static,
        F: Fn(ProviderConfig) -> P + Send + Sync + 'static,
    {
        let driver = driver.into();
        tracing::debug!(driver = %driver, "registering provider");
        self.factories.insert(
            driver,
            Box::new(move |config| {
                Arc::new(OAuth2Flow::new(factory(config))) as Arc<dyn ErasedOAuthFlow>
            }),
        );
        self
    }

    /// Whether a driver is registered.
    pub fn has_driver(&self, driver: &str) -> bool {
        self.factories.contains_key(driver)
    }

    /// Registered driver names, sorted.
    pub fn drivers(&self) -> Vec<&str> {
        let mut drivers: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        drivers.sort_unstable();
        drivers
    }

    /// Build a flow for `driver` from its credentials.
    pub fn build(
        &self,
        driver: &str,
        config: ProviderConfig,
    ) -> Result<Arc<dyn ErasedOAuthFlow>, AuthError> {
        let factory = self
            .factories
            .get(driver)
            .ok_or_else(|| AuthError::UnknownProvider(driver.to_string()))?;
        Ok(factory(config))
    }

    /// Build a flow for `driver` from a `client_id` / `client_secret` / `redirect` mapping.
    pub fn build_from_map(
        &self,
        driver: &str,
        config: &HashMap<String, String>,
    ) -> Result<Arc<dyn ErasedOAuthFlow>, AuthError> {
        if !self.has_driver(driver) {
            return Err(AuthError::UnknownProvider(driver.to_string()));
        }
        self.build(driver, ProviderConfig::from_map(config)?)
    }
}
