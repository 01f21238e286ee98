use std::collections::BTreeMap;

use crate::{AuthError, OAuthToken, ProviderConfig, RawProfile};

/// Form fields posted to a token endpoint.
pub type TokenFields = BTreeMap<String, String>;

/// The provider-independent half of the Authorization Code flow.
///
/// Providers own one of these and build their provider-specific behaviour on
/// top of it: the client knows how to lay out the standard query string and
/// token request, and how to talk HTTP to the provider.
#[derive(Debug, Clone)]
pub struct OAuth2Client {
    config: ProviderConfig,
    http_client: reqwest::Client,
    parameters: Vec<(String, String)>,
}

impl OAuth2Client {
    /// Create a new client with a default `reqwest::Client`.
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
            parameters: Vec::new(),
        }
    }

    /// Use a pre-configured HTTP client (timeouts, proxies, ...).
    pub fn with_http_client(mut self, http_client: reqwest::Client) -> Self {
        self.http_client = http_client;
        self
    }

    /// Add extra query parameters to every authorization URL.
    pub fn with_parameters<K, V>(mut self, parameters: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.parameters
            .extend(parameters.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// The credentials this client was built with.
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Builds `base?client_id=..&redirect_uri=..&response_type=code&scope=..&state=..`.
    ///
    /// Values are percent-encoded, so a space in the joined scope list becomes `%20`.
    pub fn build_auth_url(
        &self,
        base: &str,
        state: &str,
        scopes: &[String],
        scope_separator: &str,
    ) -> String {
        let scope = scopes.join(scope_separator);
        let mut fields: Vec<(&str, &str)> = vec![
            ("client_id", self.config.client_id.as_str()),
            ("redirect_uri", self.config.redirect.as_str()),
            ("response_type", "code"),
            ("scope", scope.as_str()),
            ("state", state),
        ];
        fields.extend(self.parameters.iter().map(|(k, v)| (k.as_str(), v.as_str())));

        let query = fields
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let separator = if base.contains('?') { '&' } else { '?' };
        format!("{}{}{}", base, separator, query)
    }

    /// The standard `authorization_code` grant fields.
    pub fn token_fields(&self, code: &str) -> TokenFields {
        TokenFields::from([
            ("grant_type".to_string(), "authorization_code".to_string()),
            ("code".to_string(), code.to_string()),
            ("redirect_uri".to_string(), self.config.redirect.clone()),
            ("client_id".to_string(), self.config.client_id.clone()),
            ("client_secret".to_string(), self.config.client_secret.clone()),
        ])
    }

    /// Posts `fields` to the token endpoint and parses the token response.
    pub async fn exchange_code(
        &self,
        token_url: &str,
        fields: &TokenFields,
    ) -> Result<OAuthToken, AuthError> {
        tracing::debug!(token_url, "exchanging authorization code");

        let response = self
            .http_client
            .post(token_url)
            .header("Accept", "application/json")
            .form(fields)
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(AuthError::upstream(status.as_u16(), body));
        }

        serde_json::from_str::<OAuthToken>(&body)
            .map_err(|e| AuthError::MalformedResponse(format!("token response: {}", e)))
    }

    /// Fetches a JSON object from `url` with `Authorization: Bearer <access_token>`.
    pub async fn get_json(&self, url: &str, access_token: &str) -> Result<RawProfile, AuthError> {
        tracing::debug!(url, "fetching user profile");

        let response = self
            .http_client
            .get(url)
            .header("Authorization", format!("Bearer {}", access_token))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(AuthError::upstream(status.as_u16(), body));
        }

        match serde_json::from_str::<serde_json::Value>(&body) {
            Ok(serde_json::Value::Object(profile)) => Ok(profile),
            Ok(other) => Err(AuthError::MalformedResponse(format!(
                "expected a JSON object, got {}",
                other
            ))),
            Err(e) => Err(AuthError::MalformedResponse(format!("user response: {}", e))),
        }
    }
}
