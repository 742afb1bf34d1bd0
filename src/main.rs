mod config;
mod data;
mod esports;
mod server;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use config::{Config, EnvConfig};
use data::auth::RequestSigner;
use data::cache::MarketCache;
use data::kalshi_api::KalshiApiClient;
use esports::leagues::LeagueClassifier;
use server::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    tracing::info!("Kalshi dashboard service starting...");

    let config = Config::load("config.toml")?;
    let env_config = EnvConfig::load()?;

    tracing::info!("API base: {}", env_config.kalshi_api_base);
    tracing::info!("Market cache TTL: {}s", config.cache.ttl_secs);
    if env_config.kalshi_api_key_id.is_none() || env_config.kalshi_private_key_pem.is_none() {
        tracing::warn!("Kalshi credentials not configured - authenticated requests will fail");
    }

    let signer = RequestSigner::new(
        env_config.kalshi_api_key_id,
        env_config.kalshi_private_key_pem,
    )?;
    let client = KalshiApiClient::new(&env_config.kalshi_api_base, signer, config.markets.page_limit)?;
    let cache = MarketCache::new(Duration::from_secs(config.cache.ttl_secs));
    let classifier = LeagueClassifier::new()?;

    let state = Arc::new(AppState {
        client,
        cache,
        classifier,
    });
    let app = server::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
