use async_trait::async_trait;
use oauthcord_core::{AuthError, Identity, OAuthProvider, OAuthToken};

use crate::ErasedOAuthFlow;

/// Orchestrates the standard OAuth2 Authorization Code flow.
pub struct OAuth2Flow<P: OAuthProvider> {
    provider: P,
    stateless: bool,
}

#[async_trait]
impl<P: OAuthProvider> ErasedOAuthFlow for OAuth2Flow<P> {
    fn provider_id(&self) -> String {
        self.provider.provider_id().to_string()
    }

    fn initiate_login(&self) -> (String, String) {
        self.initiate_login()
    }

    async fn finalize_login(
        &self,
        code: &str,
        received_state: &str,
        expected_state: &str,
    ) -> Result<(Identity, OAuthToken), AuthError> {
        self.finalize_login(code, received_state, expected_state)
            .await
    }

    async fn user_from_token(&self, access_token: &str) -> Result<Identity, AuthError> {
        self.provider.user_from_token(access_token).await
    }
}

impl<P: OAuthProvider> OAuth2Flow<P> {
    /// Create a new `OAuth2Flow` with the given provider.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            stateless: false,
        }
    }

    /// Skip CSRF state verification when finalizing.
    ///
    /// Only for callers that verify the state themselves, or for API-only
    /// clients that never see the browser redirect.
    pub fn stateless(mut self) -> Self {
        self.stateless = true;
        self
    }

    /// The wrapped provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Generates the redirect URL and CSRF state.
    pub fn initiate_login(&self) -> (String, String) {
        let state = uuid::Uuid::new_v4().to_string();
        let url = self.provider.authorization_url(&state);
        tracing::debug!(provider = self.provider.provider_id(), "initiating login");
        (url, state)
    }

    /// Completes the flow: verifies the state, exchanges the code and maps the user.
    pub async fn finalize_login(
        &self,
        code: &str,
        received_state: &str,
        expected_state: &str,
    ) -> Result<(Identity, OAuthToken), AuthError> {
        if !self.stateless && received_state != expected_state {
            tracing::warn!(
                provider = self.provider.provider_id(),
                "state mismatch on callback"
            );
            return Err(AuthError::CsrfMismatch);
        }

        let token = self.provider.exchange_code(code).await?;
        let identity = self.provider.user_from_token(&token.access_token).await?;

        tracing::debug!(
            provider = self.provider.provider_id(),
            user_id = %identity.id,
            "login finalized"
        );

        Ok((identity, token))
    }

    /// Fetch the identity behind an access token obtained elsewhere.
    pub async fn user_from_token(&self, access_token: &str) -> Result<Identity, AuthError> {
        self.provider.user_from_token(access_token).await
    }
}
