use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures::future::join_all;
use serde::Deserialize;
use std::sync::Arc;
use tracing::error;

use crate::data::types::{GetSettlementsParams, Market};
use crate::esports::grouping::group_by_event;
use crate::esports::leagues::LoLLeague;
use crate::server::types::{
    LoLEsportsEventsResponse, LoLEsportsResponse, OrdersPayload, PositionWithMarket,
    PositionsPayload, SettlementWithMarket, SettlementsPayload,
};
use crate::server::AppState;

const SETTLEMENTS_PAGE_LIMIT: u32 = 100;

#[derive(Debug, Deserialize)]
pub struct LoLEsportsQuery {
    #[serde(default)]
    pub league: Option<String>,
}

pub async fn health() -> &'static str {
    "OK"
}

fn invalid_league() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({
            "error": "Invalid league. Must be one of: LEC, LCS, LPL, LCK"
        })),
    )
        .into_response()
}

/// Cache-first lookup of one league's open markets. The bool is the
/// `cached` flag for the response.
async fn league_markets(
    state: &AppState,
    league: LoLLeague,
) -> Result<(Vec<Market>, bool), Response> {
    if let Some(markets) = state.cache.get(league) {
        return Ok((markets, true));
    }

    let all_markets = state.client.get_all_open_markets().await.map_err(|e| {
        error!("Failed to fetch LoL esports markets: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": "Failed to fetch markets"})),
        )
            .into_response()
    })?;

    let markets = state.classifier.markets_for(league, &all_markets);
    state.cache.insert(league, markets.clone());
    Ok((markets, false))
}

pub async fn lol_esports(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LoLEsportsQuery>,
) -> Response {
    let league = match query.league.as_deref().and_then(LoLLeague::from_code) {
        Some(league) => league,
        None => return invalid_league(),
    };

    match league_markets(&state, league).await {
        Ok((markets, cached)) => Json(LoLEsportsResponse {
            league,
            markets,
            cached,
        })
        .into_response(),
        Err(response) => response,
    }
}

/// Same data as `lol_esports`, shaped as per-event groups.
pub async fn lol_esports_events(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LoLEsportsQuery>,
) -> Response {
    let league = match query.league.as_deref().and_then(LoLLeague::from_code) {
        Some(league) => league,
        None => return invalid_league(),
    };

    match league_markets(&state, league).await {
        Ok((markets, cached)) => Json(LoLEsportsEventsResponse {
            league,
            events: group_by_event(&markets),
            cached,
        })
        .into_response(),
        Err(response) => response,
    }
}

pub async fn positions(State(state): State<Arc<AppState>>) -> Response {
    let response = match state.client.get_active_positions().await {
        Ok(response) => response,
        Err(e) => {
            error!("Failed to fetch positions: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "Failed to fetch positions"})),
            )
                .into_response();
        }
    };

    // Join each position with its market detail concurrently
    let lookups = response
        .market_positions
        .iter()
        .map(|position| state.client.get_market(&position.ticker));
    let markets = join_all(lookups).await;

    let positions = response
        .market_positions
        .into_iter()
        .zip(markets)
        .map(|(position, market)| PositionWithMarket { position, market })
        .collect();

    Json(PositionsPayload { positions }).into_response()
}

pub async fn settlements(State(state): State<Arc<AppState>>) -> Response {
    let params = GetSettlementsParams {
        limit: Some(SETTLEMENTS_PAGE_LIMIT),
        ..Default::default()
    };
    let response = match state.client.get_settlements(&params).await {
        Ok(response) => response,
        Err(e) => {
            error!("Failed to fetch settlements: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "Failed to fetch settlements"})),
            )
                .into_response();
        }
    };

    let lookups = response
        .settlements
        .iter()
        .map(|settlement| state.client.get_market(&settlement.ticker));
    let markets = join_all(lookups).await;

    let settlements = response
        .settlements
        .into_iter()
        .zip(markets)
        .map(|(settlement, market)| SettlementWithMarket { settlement, market })
        .collect();

    Json(SettlementsPayload { settlements }).into_response()
}

pub async fn orders(State(state): State<Arc<AppState>>) -> Response {
    match state.client.get_executed_orders().await {
        Ok(orders) => Json(OrdersPayload { orders }).into_response(),
        Err(e) => {
            error!("Failed to fetch orders: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "Failed to fetch orders"})),
            )
                .into_response()
        }
    }
}
