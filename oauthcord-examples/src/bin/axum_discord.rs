//! # Axum Discord Example
//!
//! Sign in with Discord and print the resulting identity as JSON.
//!
//! Set the following in a `.env` file:
//! - `DISCORD_CLIENT_ID`
//! - `DISCORD_CLIENT_SECRET`
//! - `DISCORD_REDIRECT_URI` (e.g. `http://localhost:3000/auth/discord/callback`)
//!
//! Then open <http://localhost:3000>.

use axum::{response::Html, routing::get, Router};
use oauthcord::axum::{OAuthAxumExt, OAuthState};
use oauthcord::ProviderConfig;
use std::collections::HashMap;
use tower_cookies::CookieManagerLayer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    oauthcord_examples::init();

    let registry = oauthcord::registry();

    let mut configs = HashMap::new();
    configs.insert("discord".to_string(), ProviderConfig::from_env("DISCORD")?);

    let secure = std::env::var("OAUTHCORD_SECURE_COOKIES")
        .map(|v| v != "false")
        .unwrap_or(false);
    let state = OAuthState::from_registry(&registry, configs)?.with_secure_cookies(secure);

    let app = Router::new()
        .route("/", get(index))
        .merge(state.axum_router())
        .layer(CookieManagerLayer::new())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    tracing::info!("listening on http://localhost:3000");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn index() -> Html<&'static str> {
    Html("<h1>oauthcord</h1><a href=\"/auth/discord\">Login with Discord</a>")
}
