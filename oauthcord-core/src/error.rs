use serde::{Deserialize, Serialize};

/// Errors that can occur while running an OAuth2 flow.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The provider could not be reached (connection, TLS, timeout, ...)
    #[error("Network error: {0}")]
    Transport(String),
    /// The provider answered with a non-2xx status
    #[error("Provider returned {status}: {body}")]
    Upstream {
        /// HTTP status code of the response
        status: u16,
        /// Response body, verbatim
        body: String,
    },
    /// The response body was not the JSON the flow expected
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    /// The CSRF state parameter does not match the expected value
    #[error("CSRF state mismatch")]
    CsrfMismatch,
    /// Provider configuration is missing or invalid
    #[error("Configuration error: {0}")]
    Config(String),
    /// No provider is registered under the requested driver name
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),
}

impl AuthError {
    /// Builds an [`AuthError::Upstream`], pulling the OAuth2 error code out of the body when present.
    pub(crate) fn upstream(status: u16, body: String) -> Self {
        if let Ok(parsed) = serde_json::from_str::<OAuthErrorResponse>(&body) {
            tracing::warn!(
                status,
                error = %parsed.error,
                description = parsed.error_description.as_deref().unwrap_or_default(),
                "provider rejected request"
            );
        } else {
            tracing::warn!(status, "provider rejected request");
        }
        AuthError::Upstream { status, body }
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AuthError::MalformedResponse(err.to_string())
        } else {
            AuthError::Transport(err.to_string())
        }
    }
}

/// Represents an error response from an OAuth2 provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthErrorResponse {
    /// The error code.
    pub error: String,
    /// A human-readable ASCII text description of the error.
    pub error_description: Option<String>,
}
