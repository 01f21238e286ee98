//! Shared setup for the oauthcord demo binaries.

use tracing_subscriber::EnvFilter;

/// Load `.env` and install a `fmt` subscriber honouring `RUST_LOG`.
pub fn init() {
    dotenvy::dotenv().ok();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("oauthcord=debug,info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
