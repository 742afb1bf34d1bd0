use serde::Serialize;

use crate::data::types::{Market, MarketPosition, Order, Settlement};
use crate::esports::grouping::EventGroup;
use crate::esports::leagues::LoLLeague;

#[derive(Debug, Serialize)]
pub struct LoLEsportsResponse {
    pub league: LoLLeague,
    pub markets: Vec<Market>,
    pub cached: bool,
}

#[derive(Debug, Serialize)]
pub struct LoLEsportsEventsResponse {
    pub league: LoLLeague,
    pub events: Vec<EventGroup>,
    pub cached: bool,
}

/// A position joined with its market detail; `market` is null when the
/// lookup failed or the ticker is gone.
#[derive(Debug, Serialize)]
pub struct PositionWithMarket {
    #[serde(flatten)]
    pub position: MarketPosition,
    pub market: Option<Market>,
}

#[derive(Debug, Serialize)]
pub struct PositionsPayload {
    pub positions: Vec<PositionWithMarket>,
}

#[derive(Debug, Serialize)]
pub struct SettlementWithMarket {
    #[serde(flatten)]
    pub settlement: Settlement,
    pub market: Option<Market>,
}

#[derive(Debug, Serialize)]
pub struct SettlementsPayload {
    pub settlements: Vec<SettlementWithMarket>,
}

#[derive(Debug, Serialize)]
pub struct OrdersPayload {
    pub orders: Vec<Order>,
}
