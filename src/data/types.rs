use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketStatus {
    Unopened,
    Open,
    Paused,
    Closed,
    Settled,
    // Catch-all so one unrecognized status string cannot sink a whole page
    #[serde(other)]
    Unknown,
}

impl Default for MarketStatus {
    fn default() -> Self {
        MarketStatus::Unknown
    }
}

impl MarketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketStatus::Unopened => "unopened",
            MarketStatus::Open => "open",
            MarketStatus::Paused => "paused",
            MarketStatus::Closed => "closed",
            MarketStatus::Settled => "settled",
            MarketStatus::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Yes,
    No,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderAction {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Limit,
    Market,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Resting,
    Canceled,
    Executed,
    #[serde(other)]
    Unknown,
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Unknown
    }
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Resting => "resting",
            OrderStatus::Canceled => "canceled",
            OrderStatus::Executed => "executed",
            OrderStatus::Unknown => "unknown",
        }
    }
}

/// A single tradable market. Read-only from this service's perspective;
/// status transitions are owned by the exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Market {
    pub ticker: String,
    #[serde(default)]
    pub event_ticker: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub status: MarketStatus,
    #[serde(default)]
    pub yes_bid: Option<u32>,
    #[serde(default)]
    pub yes_ask: Option<u32>,
    #[serde(default)]
    pub no_bid: Option<u32>,
    #[serde(default)]
    pub no_ask: Option<u32>,
    #[serde(default)]
    pub last_price: Option<u32>,
    #[serde(default)]
    pub volume: Option<u64>,
    #[serde(default)]
    pub volume_24h: Option<u64>,
    #[serde(default)]
    pub open_interest: Option<u64>,
    #[serde(default)]
    pub open_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub close_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub result: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub event_ticker: String,
    #[serde(default)]
    pub series_ticker: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub sub_title: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// Present only when nested markets were requested
    #[serde(default)]
    pub markets: Option<Vec<Market>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub client_order_id: Option<String>,
    pub ticker: String,
    #[serde(default)]
    pub order_group_id: Option<String>,
    pub side: OrderSide,
    pub action: OrderAction,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub yes_price: Option<i64>,
    #[serde(default)]
    pub no_price: Option<i64>,
    #[serde(default)]
    pub yes_price_dollars: Option<String>,
    #[serde(default)]
    pub no_price_dollars: Option<String>,
    #[serde(default)]
    pub initial_count: Option<i64>,
    #[serde(default)]
    pub fill_count: Option<i64>,
    #[serde(default)]
    pub remaining_count: Option<i64>,
    #[serde(default)]
    pub taker_fill_cost: Option<i64>,
    #[serde(default)]
    pub maker_fill_cost: Option<i64>,
    #[serde(default)]
    pub taker_fill_cost_dollars: Option<String>,
    #[serde(default)]
    pub maker_fill_cost_dollars: Option<String>,
    #[serde(default)]
    pub taker_fees: Option<i64>,
    #[serde(default)]
    pub maker_fees: Option<i64>,
    #[serde(default)]
    pub taker_fees_dollars: Option<String>,
    #[serde(default)]
    pub maker_fees_dollars: Option<String>,
    #[serde(default)]
    pub created_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_update_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub expiration_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cancel_order_on_pause: Option<bool>,
}

/// A holding in a single market.
/// `position` is signed: positive = long YES, negative = long NO.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketPosition {
    pub ticker: String,
    pub position: i64,
    #[serde(default)]
    pub total_traded: i64,
    #[serde(default)]
    pub market_exposure: i64,
    #[serde(default)]
    pub market_exposure_dollars: Option<String>,
    #[serde(default)]
    pub realized_pnl: i64,
    #[serde(default)]
    pub realized_pnl_dollars: Option<String>,
    #[serde(default)]
    pub fees_paid: i64,
    #[serde(default)]
    pub fees_paid_dollars: Option<String>,
    #[serde(default)]
    pub resting_orders_count: i64,
}

/// Aggregate position across the markets of one event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventPosition {
    pub event_ticker: String,
    #[serde(default)]
    pub total_cost: i64,
    #[serde(default)]
    pub event_exposure: i64,
    #[serde(default)]
    pub realized_pnl: i64,
    #[serde(default)]
    pub fees_paid: i64,
}

/// A closed-out position snapshot after market settlement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settlement {
    pub ticker: String,
    #[serde(default)]
    pub market_result: Option<String>,
    #[serde(default)]
    pub yes_count: i64,
    #[serde(default)]
    pub no_count: i64,
    #[serde(default)]
    pub yes_total_cost: i64,
    #[serde(default)]
    pub no_total_cost: i64,
    #[serde(default)]
    pub revenue: i64,
    #[serde(default)]
    pub settled_time: Option<DateTime<Utc>>,
}

// --- Page responses ---
//
// All derive Default so an upstream failure can collapse to an empty page.

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarketsResponse {
    #[serde(default)]
    pub markets: Vec<Market>,
    #[serde(default)]
    pub cursor: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarketResponse {
    pub market: Market,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventsResponse {
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub cursor: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrdersResponse {
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default)]
    pub cursor: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PositionsResponse {
    #[serde(default)]
    pub market_positions: Vec<MarketPosition>,
    #[serde(default)]
    pub event_positions: Vec<EventPosition>,
    #[serde(default)]
    pub cursor: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettlementsResponse {
    #[serde(default)]
    pub settlements: Vec<Settlement>,
    #[serde(default)]
    pub cursor: Option<String>,
}

// --- Request filter params ---
//
// All fields optional; `query()` serializes only the ones that are present.

#[derive(Debug, Clone, Default)]
pub struct GetMarketsParams {
    pub event_ticker: Option<String>,
    pub series_ticker: Option<String>,
    pub status: Option<MarketStatus>,
    pub tickers: Option<String>,
    pub min_close_ts: Option<i64>,
    pub max_close_ts: Option<i64>,
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

impl GetMarketsParams {
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(ref event_ticker) = self.event_ticker {
            query.push(("event_ticker", event_ticker.clone()));
        }
        if let Some(ref series_ticker) = self.series_ticker {
            query.push(("series_ticker", series_ticker.clone()));
        }
        if let Some(status) = self.status {
            query.push(("status", status.as_str().to_string()));
        }
        if let Some(ref tickers) = self.tickers {
            query.push(("tickers", tickers.clone()));
        }
        if let Some(min_close_ts) = self.min_close_ts {
            query.push(("min_close_ts", min_close_ts.to_string()));
        }
        if let Some(max_close_ts) = self.max_close_ts {
            query.push(("max_close_ts", max_close_ts.to_string()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(ref cursor) = self.cursor {
            query.push(("cursor", cursor.clone()));
        }
        query
    }
}

#[derive(Debug, Clone, Default)]
pub struct GetEventsParams {
    pub series_ticker: Option<String>,
    pub status: Option<String>,
    pub with_nested_markets: Option<bool>,
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

impl GetEventsParams {
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(ref series_ticker) = self.series_ticker {
            query.push(("series_ticker", series_ticker.clone()));
        }
        if let Some(ref status) = self.status {
            query.push(("status", status.clone()));
        }
        if let Some(with_nested_markets) = self.with_nested_markets {
            query.push(("with_nested_markets", with_nested_markets.to_string()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(ref cursor) = self.cursor {
            query.push(("cursor", cursor.clone()));
        }
        query
    }
}

#[derive(Debug, Clone, Default)]
pub struct GetOrdersParams {
    pub ticker: Option<String>,
    pub event_ticker: Option<String>,
    pub status: Option<OrderStatus>,
    pub min_ts: Option<i64>,
    pub max_ts: Option<i64>,
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

impl GetOrdersParams {
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(ref ticker) = self.ticker {
            query.push(("ticker", ticker.clone()));
        }
        if let Some(ref event_ticker) = self.event_ticker {
            query.push(("event_ticker", event_ticker.clone()));
        }
        if let Some(status) = self.status {
            query.push(("status", status.as_str().to_string()));
        }
        if let Some(min_ts) = self.min_ts {
            query.push(("min_ts", min_ts.to_string()));
        }
        if let Some(max_ts) = self.max_ts {
            query.push(("max_ts", max_ts.to_string()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(ref cursor) = self.cursor {
            query.push(("cursor", cursor.clone()));
        }
        query
    }
}

#[derive(Debug, Clone, Default)]
pub struct GetPositionsParams {
    pub ticker: Option<String>,
    pub event_ticker: Option<String>,
    pub count_filter: Option<String>,
    pub settlement_status: Option<String>,
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

impl GetPositionsParams {
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(ref ticker) = self.ticker {
            query.push(("ticker", ticker.clone()));
        }
        if let Some(ref event_ticker) = self.event_ticker {
            query.push(("event_ticker", event_ticker.clone()));
        }
        if let Some(ref count_filter) = self.count_filter {
            query.push(("count_filter", count_filter.clone()));
        }
        if let Some(ref settlement_status) = self.settlement_status {
            query.push(("settlement_status", settlement_status.clone()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(ref cursor) = self.cursor {
            query.push(("cursor", cursor.clone()));
        }
        query
    }
}

#[derive(Debug, Clone, Default)]
pub struct GetSettlementsParams {
    pub ticker: Option<String>,
    pub event_ticker: Option<String>,
    pub min_ts: Option<i64>,
    pub max_ts: Option<i64>,
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

impl GetSettlementsParams {
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(ref ticker) = self.ticker {
            query.push(("ticker", ticker.clone()));
        }
        if let Some(ref event_ticker) = self.event_ticker {
            query.push(("event_ticker", event_ticker.clone()));
        }
        if let Some(min_ts) = self.min_ts {
            query.push(("min_ts", min_ts.to_string()));
        }
        if let Some(max_ts) = self.max_ts {
            query.push(("max_ts", max_ts.to_string()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(ref cursor) = self.cursor {
            query.push(("cursor", cursor.clone()));
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_deserializes_with_missing_fields() {
        let json = r#"{
            "ticker": "LOLLCK-26JAN21-T1GENG-T1",
            "event_ticker": "LOLLCK-26JAN21-T1GENG",
            "title": "Will T1 win?",
            "status": "open",
            "yes_bid": 55,
            "yes_ask": 60
        }"#;

        let market: Market = serde_json::from_str(json).unwrap();
        assert_eq!(market.status, MarketStatus::Open);
        assert_eq!(market.subtitle, "");
        assert_eq!(market.yes_bid, Some(55));
        assert_eq!(market.no_bid, None);
        assert!(market.open_time.is_none());
    }

    #[test]
    fn test_unknown_market_status_does_not_fail() {
        let json = r#"{"ticker": "T", "status": "initialized"}"#;

        let market: Market = serde_json::from_str(json).unwrap();
        assert_eq!(market.status, MarketStatus::Unknown);
    }

    #[test]
    fn test_markets_response_default_is_empty() {
        let response = MarketsResponse::default();
        assert!(response.markets.is_empty());
        assert!(response.cursor.is_none());
    }

    #[test]
    fn test_query_omits_absent_params() {
        let params = GetOrdersParams {
            status: Some(OrderStatus::Executed),
            limit: Some(100),
            ..Default::default()
        };

        let query = params.query();
        assert_eq!(
            query,
            vec![
                ("status", "executed".to_string()),
                ("limit", "100".to_string()),
            ]
        );
    }

    #[test]
    fn test_positions_response_deserializes() {
        let json = r#"{
            "market_positions": [
                {"ticker": "LOLLCK-26JAN21-T1GENG-T1", "position": -3, "market_exposure": 120}
            ],
            "event_positions": [],
            "cursor": ""
        }"#;

        let response: PositionsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.market_positions.len(), 1);
        assert_eq!(response.market_positions[0].position, -3);
    }

    #[test]
    fn test_order_enums_deserialize_lowercase() {
        let json = r#"{
            "order_id": "o-1",
            "ticker": "LOLLCK-26JAN21-T1GENG-T1",
            "side": "no",
            "action": "sell",
            "type": "limit",
            "status": "executed"
        }"#;

        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.side, OrderSide::No);
        assert_eq!(order.action, OrderAction::Sell);
        assert_eq!(order.order_type, OrderType::Limit);
        assert_eq!(order.status, OrderStatus::Executed);
    }
}
