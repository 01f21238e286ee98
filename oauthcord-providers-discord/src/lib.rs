//! Discord OAuth2 provider.
//!
//! See <https://discord.com/developers/docs/topics/oauth2>.

use async_trait::async_trait;
use oauthcord_core::{
    AuthError, Identity, OAuth2Client, OAuthProvider, ProviderConfig, RawProfile, TokenFields,
};
use oauthcord_flow::ProviderRegistry;
use serde::{Deserialize, Serialize};

/// Driver name the provider registers under.
pub const DRIVER: &str = "discord";

const AUTHORIZATION_URL: &str = "https://discord.com/api/oauth2/authorize";
const TOKEN_URL: &str = "https://discord.com/api/oauth2/token";
const USER_URL: &str = "https://discord.com/api/users/@me";

/// CDN origin serving custom avatars.
pub const AVATAR_BASE_URL: &str = "https://cdn.discordapp.com/avatars";

const SCOPE_SEPARATOR: &str = " ";

pub struct DiscordProvider {
    client: OAuth2Client,
    scopes: Vec<String>,
    permissions: Option<String>,
    consent_suppressed: bool,
    authorization_url: String,
    token_url: String,
    user_url: String,
}

impl DiscordProvider {
    pub fn new(client_id: String, client_secret: String, redirect_uri: String) -> Self {
        Self::from_config(ProviderConfig::new(client_id, client_secret, redirect_uri))
    }

    pub fn from_config(config: ProviderConfig) -> Self {
        Self {
            client: OAuth2Client::new(config),
            scopes: vec!["identify".to_string(), "email".to_string()],
            permissions: None,
            consent_suppressed: true,
            authorization_url: AUTHORIZATION_URL.to_string(),
            token_url: TOKEN_URL.to_string(),
            user_url: USER_URL.to_string(),
        }
    }

    /// Point the adapter at other authorization, token and user endpoints (a proxy or a mock server).
    pub fn with_urls(
        mut self,
        authorization_url: String,
        token_url: String,
        user_url: String,
    ) -> Self {
        self.authorization_url = authorization_url;
        self.token_url = token_url;
        self.user_url = user_url;
        self
    }

    pub fn with_http_client(mut self, http_client: reqwest::Client) -> Self {
        self.client = self.client.with_http_client(http_client);
        self
    }

    /// Extra query parameters appended to the authorization URL, before `permissions`.
    pub fn with_parameters<K, V>(mut self, parameters: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.client = self.client.with_parameters(parameters);
        self
    }

    /// Let Discord show the consent screen again instead of sending `prompt=none`.
    pub fn with_consent(mut self) -> Self {
        self.consent_suppressed = false;
        self
    }

    /// Permissions bitmask (decimal) requested for a bot install.
    pub fn with_permissions(mut self, permissions: impl Into<String>) -> Self {
        self.permissions = Some(permissions.into());
        self
    }

    /// Request only the `bot` scope.
    pub fn as_bot(self) -> Self {
        self.set_scopes(["bot"])
    }

    /// Add scopes to the requested set, keeping order and skipping duplicates.
    pub fn scopes<S: Into<String>>(mut self, scopes: impl IntoIterator<Item = S>) -> Self {
        for scope in scopes {
            let scope = scope.into();
            if !self.scopes.contains(&scope) {
                self.scopes.push(scope);
            }
        }
        self
    }

    /// Replace the requested scopes.
    pub fn set_scopes<S: Into<String>>(mut self, scopes: impl IntoIterator<Item = S>) -> Self {
        self.scopes.clear();
        self.scopes(scopes)
    }

    pub fn get_scopes(&self) -> &[String] {
        &self.scopes
    }
}

/// The subset of `GET /users/@me` the identity is built from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordUser {
    pub id: String,
    pub username: String,
    pub discriminator: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
}

/// `username#1234` for legacy accounts, plain `username` once the discriminator is `"0"` or absent.
pub fn format_nickname(user: &DiscordUser) -> String {
    match user.discriminator.as_deref().unwrap_or("0") {
        "0" => user.username.clone(),
        discriminator => format!("{}#{}", user.username, discriminator),
    }
}

/// CDN URL of the user's custom avatar; `a_`-prefixed hashes are animated and served as gif.
pub fn format_avatar(user: &DiscordUser) -> Option<String> {
    let hash = user.avatar.as_deref().filter(|hash| !hash.is_empty())?;
    let extension = if hash.starts_with("a_") { "gif" } else { "png" };

    Some(format!("{}/{}/{}.{}", AVATAR_BASE_URL, user.id, hash, extension))
}

#[async_trait]
impl OAuthProvider for DiscordProvider {
    fn provider_id(&self) -> &str {
        DRIVER
    }

    fn client(&self) -> &OAuth2Client {
        &self.client
    }

    fn authorization_url(&self, state: &str) -> String {
        let mut url = self.client.build_auth_url(
            &self.authorization_url,
            state,
            &self.scopes,
            SCOPE_SEPARATOR,
        );

        // Always a decimal bitmask, appended as-is.
        let permissions = self.permissions.as_deref().filter(|p| !p.is_empty());
        if let Some(permissions) = permissions {
            url.push_str("&permissions=");
            url.push_str(permissions);
        }

        tracing::debug!(
            scopes = %self.scopes.join(SCOPE_SEPARATOR),
            permissions = permissions.is_some(),
            "built discord authorization url"
        );
        url
    }

    fn token_url(&self) -> &str {
        &self.token_url
    }

    fn token_fields(&self, code: &str) -> TokenFields {
        let mut fields = self.client.token_fields(code);
        if self.consent_suppressed {
            fields.insert("prompt".to_string(), "none".to_string());
        }
        fields
    }

    async fn fetch_user(&self, access_token: &str) -> Result<RawProfile, AuthError> {
        self.client.get_json(&self.user_url, access_token).await
    }

    fn map_user(&self, raw: RawProfile) -> Result<Identity, AuthError> {
        let user: DiscordUser = serde_json::from_value(serde_json::Value::Object(raw.clone()))
            .map_err(|e| AuthError::MalformedResponse(format!("discord user: {}", e)))?;

        Ok(Identity {
            provider_id: DRIVER.to_string(),
            nickname: format_nickname(&user),
            avatar: format_avatar(&user),
            id: user.id,
            name: user.username,
            email: user.email,
            raw,
        })
    }
}

/// Register the provider under the `"discord"` driver.
pub fn register(registry: &mut ProviderRegistry) {
    registry.extend(DRIVER, DiscordProvider::from_config);
}

#[cfg(test)]
mod tests {
    use super::*;
    use oauthcord_flow::ErasedOAuthFlow;
    use serde_json::json;

    fn provider() -> DiscordProvider {
        DiscordProvider::new(
            "client_id".to_string(),
            "client_secret".to_string(),
            "http://localhost/callback".to_string(),
        )
    }

    fn user(profile: serde_json::Value) -> DiscordUser {
        serde_json::from_value(profile).unwrap()
    }

    fn raw(profile: serde_json::Value) -> RawProfile {
        match profile {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_authorization_url_defaults() {
        let url = provider().authorization_url("test_state");

        assert!(url.starts_with("https://discord.com/api/oauth2/authorize?"));
        assert!(url.contains("client_id=client_id"));
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%2Fcallback"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("scope=identify%20email"));
        assert!(url.contains("state=test_state"));
        assert!(!url.contains("permissions="));
    }

    #[test]
    fn test_authorization_url_with_permissions() {
        let url = provider()
            .with_permissions("123456")
            .authorization_url("s");

        assert!(url.ends_with("&permissions=123456"));
        assert_eq!(url.matches("permissions=").count(), 1);
    }

    #[test]
    fn test_authorization_url_with_extra_parameters() {
        let url = provider()
            .with_parameters([("guild_id", "42"), ("disable_guild_select", "true")])
            .with_permissions("8")
            .authorization_url("s");

        assert!(url.ends_with("&guild_id=42&disable_guild_select=true&permissions=8"));
        assert_eq!(url.matches("permissions=").count(), 1);
        assert!(url.find("state=s").unwrap() < url.find("guild_id=42").unwrap());
    }

    #[test]
    fn test_empty_permissions_are_not_appended() {
        let url = provider().with_permissions("").authorization_url("s");
        assert!(!url.contains("permissions"));
    }

    #[test]
    fn test_as_bot() {
        let provider = provider().as_bot().with_permissions("8");
        assert_eq!(provider.get_scopes(), ["bot"]);

        let url = provider.authorization_url("s");
        assert!(url.contains("scope=bot&"));
        assert!(url.ends_with("&permissions=8"));
    }

    #[test]
    fn test_scopes_merge_without_duplicates() {
        let provider = provider().scopes(["guilds", "email", "guilds"]);
        assert_eq!(provider.get_scopes(), ["identify", "email", "guilds"]);

        let provider = provider.set_scopes(["connections"]);
        assert_eq!(provider.get_scopes(), ["connections"]);
    }

    #[test]
    fn test_token_fields_suppress_consent_by_default() {
        let fields = provider().token_fields("code_1");

        assert_eq!(fields.get("prompt").map(String::as_str), Some("none"));
        assert_eq!(fields["grant_type"], "authorization_code");
        assert_eq!(fields["code"], "code_1");
        assert_eq!(fields["redirect_uri"], "http://localhost/callback");
        assert_eq!(fields["client_id"], "client_id");
        assert_eq!(fields["client_secret"], "client_secret");
    }

    #[test]
    fn test_token_fields_with_consent() {
        let fields = provider().with_consent().token_fields("code_1");

        assert!(!fields.contains_key("prompt"));
        assert_eq!(fields.len(), 5);
    }

    #[test]
    fn test_format_nickname() {
        let modern = user(json!({"id": "1", "username": "alice", "discriminator": "0"}));
        assert_eq!(format_nickname(&modern), "alice");

        let missing = user(json!({"id": "1", "username": "alice"}));
        assert_eq!(format_nickname(&missing), "alice");

        let legacy = user(json!({"id": "1", "username": "bob", "discriminator": "4521"}));
        assert_eq!(format_nickname(&legacy), "bob#4521");
    }

    #[test]
    fn test_format_avatar() {
        let none = user(json!({"id": "1", "username": "a"}));
        assert_eq!(format_avatar(&none), None);

        let empty = user(json!({"id": "1", "username": "a", "avatar": ""}));
        assert_eq!(format_avatar(&empty), None);

        let null = user(json!({"id": "1", "username": "a", "avatar": null}));
        assert_eq!(format_avatar(&null), None);

        let animated = user(json!({"id": "100", "username": "a", "avatar": "a_abcd"}));
        assert_eq!(
            format_avatar(&animated).as_deref(),
            Some("https://cdn.discordapp.com/avatars/100/a_abcd.gif")
        );

        let still = user(json!({"id": "100", "username": "a", "avatar": "bcda_1"}));
        assert_eq!(
            format_avatar(&still).as_deref(),
            Some("https://cdn.discordapp.com/avatars/100/bcda_1.png")
        );
    }

    #[test]
    fn test_map_user_modern_account() {
        let profile = raw(json!({
            "id": "100",
            "username": "alice",
            "discriminator": "0",
            "email": "a@x.com",
            "avatar": "a_abcd",
            "verified": true
        }));

        let identity = provider().map_user(profile.clone()).unwrap();

        assert_eq!(identity.provider_id, "discord");
        assert_eq!(identity.id, "100");
        assert_eq!(identity.nickname, "alice");
        assert_eq!(identity.name, "alice");
        assert_eq!(identity.email.as_deref(), Some("a@x.com"));
        assert_eq!(
            identity.avatar.as_deref(),
            Some("https://cdn.discordapp.com/avatars/100/a_abcd.gif")
        );
        assert_eq!(identity.raw, profile);
    }

    #[test]
    fn test_map_user_legacy_account() {
        let identity = provider()
            .map_user(raw(json!({"id": "200", "username": "bob", "discriminator": "4521"})))
            .unwrap();

        assert_eq!(identity.id, "200");
        assert_eq!(identity.nickname, "bob#4521");
        assert_eq!(identity.name, "bob");
        assert_eq!(identity.email, None);
        assert_eq!(identity.avatar, None);
    }

    #[test]
    fn test_map_user_requires_id_and_username() {
        let err = provider()
            .map_user(raw(json!({"username": "nobody"})))
            .unwrap_err();
        assert!(matches!(err, AuthError::MalformedResponse(_)));

        let err = provider()
            .map_user(raw(json!({"id": "1"})))
            .unwrap_err();
        assert!(matches!(err, AuthError::MalformedResponse(_)));
    }

    #[test]
    fn test_register() {
        let mut registry = ProviderRegistry::new();
        register(&mut registry);

        let flow = registry
            .build(
                "discord",
                ProviderConfig::new("abc", "secret", "http://localhost/cb"),
            )
            .unwrap();

        assert_eq!(flow.provider_id(), "discord");
        let (url, state) = flow.initiate_login();
        assert!(url.contains("client_id=abc"));
        assert!(url.contains(&format!("state={}", state)));
    }
}
