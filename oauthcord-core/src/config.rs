use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::AuthError;

/// OAuth2 client credentials for a single provider.
///
/// The field names mirror the `client_id`, `client_secret` and `redirect`
/// keys of a provider section in an application config file, so a section can
/// be deserialized directly:
///
/// ```
/// use oauthcord_core::ProviderConfig;
///
/// let config: ProviderConfig = serde_json::from_str(
///     r#"{"client_id": "id", "client_secret": "secret", "redirect": "http://localhost/cb"}"#,
/// ).unwrap();
/// assert_eq!(config.redirect, "http://localhost/cb");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// The client ID issued by the provider
    pub client_id: String,
    /// The client secret issued by the provider
    pub client_secret: String,
    /// The redirect URI registered with the provider
    pub redirect: String,
}

impl ProviderConfig {
    /// Create a config from explicit credentials.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect: redirect.into(),
        }
    }

    /// Build a config from a string mapping with `client_id`, `client_secret` and `redirect` keys.
    pub fn from_map(map: &HashMap<String, String>) -> Result<Self, AuthError> {
        let get = |key: &str| {
            map.get(key)
                .filter(|v| !v.is_empty())
                .cloned()
                .ok_or_else(|| AuthError::Config(format!("missing `{}`", key)))
        };

        Ok(Self {
            client_id: get("client_id")?,
            client_secret: get("client_secret")?,
            redirect: get("redirect")?,
        })
    }

    /// Load `<PREFIX>_CLIENT_ID`, `<PREFIX>_CLIENT_SECRET` and `<PREFIX>_REDIRECT_URI` from the environment.
    pub fn from_env(prefix: &str) -> Result<Self, AuthError> {
        let get = |suffix: &str| {
            let key = format!("{}_{}", prefix, suffix);
            std::env::var(&key).map_err(|_| AuthError::Config(format!("{} must be set", key)))
        };

        Ok(Self {
            client_id: get("CLIENT_ID")?,
            client_secret: get("CLIENT_SECRET")?,
            redirect: get("REDIRECT_URI")?,
        })
    }
}
