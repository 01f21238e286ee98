use serde::{Deserialize, Serialize};

/// The untyped JSON object a provider returns for the authenticated user.
pub type RawProfile = serde_json::Map<String, serde_json::Value>;

/// A unified identity structure returned by all providers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    /// The provider identifier (e.g., "discord")
    pub provider_id: String,
    /// The unique ID of the user within the provider's system
    pub id: String,
    /// Display-friendly handle
    pub nickname: String,
    /// The user's name as the provider reports it
    pub name: String,
    /// The user's email address, if available and authorized
    pub email: Option<String>,
    /// Fully qualified avatar URL, if the user has a custom avatar
    pub avatar: Option<String>,
    /// The profile exactly as the provider returned it
    #[serde(default)]
    pub raw: RawProfile,
}

/// Represents the tokens returned by an OAuth2 provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OAuthToken {
    /// The access token used for API requests
    pub access_token: String,
    /// The type of token (usually "Bearer")
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Seconds until the access token expires
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    /// The refresh token, handed back to the caller untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// The scopes granted by the user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}
