//! Resolve the Discord identity behind an existing access token.
//!
//! ```sh
//! DISCORD_ACCESS_TOKEN=... cargo run --bin discord_me
//! ```

use oauthcord::providers::discord::DiscordProvider;
use oauthcord::{OAuthProvider, ProviderConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    oauthcord_examples::init();

    let access_token = std::env::var("DISCORD_ACCESS_TOKEN")?;
    let provider = DiscordProvider::from_config(ProviderConfig::from_env("DISCORD")?);

    let identity = provider.user_from_token(&access_token).await?;
    println!("{}", serde_json::to_string_pretty(&identity)?);
    Ok(())
}
