pub mod handlers;
pub mod types;

use axum::routing::get;
use axum::Router;
use std::sync::Arc;

use crate::data::cache::MarketCache;
use crate::data::kalshi_api::KalshiApiClient;
use crate::esports::leagues::LeagueClassifier;

/// Shared state for all request handlers.
pub struct AppState {
    pub client: KalshiApiClient,
    pub cache: MarketCache,
    pub classifier: LeagueClassifier,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/kalshi/lol-esports", get(handlers::lol_esports))
        .route(
            "/api/kalshi/lol-esports/events",
            get(handlers::lol_esports_events),
        )
        .route("/api/kalshi/positions", get(handlers::positions))
        .route("/api/kalshi/settlements", get(handlers::settlements))
        .route("/api/kalshi/orders", get(handlers::orders))
        .with_state(state)
}
