use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{error, warn};

use crate::data::auth::{AuthError, RequestSigner};
use crate::data::types::{
    GetEventsParams, GetMarketsParams, GetOrdersParams, GetPositionsParams, GetSettlementsParams,
    EventsResponse, Market, MarketResponse, MarketsResponse, MarketStatus, Order, OrderStatus,
    OrdersResponse, PositionsResponse, SettlementsResponse,
};

/// Runaway guard for full-collection fetches, not a business rule. Hitting
/// it truncates the collection without surfacing an error.
const MAX_COLLECTION_PAGES: usize = 10;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Read-only client for the Kalshi trade API.
///
/// Upstream HTTP, network, and decode failures are logged and collapsed to
/// empty results; callers cannot tell "no data" from "upstream down". Only
/// missing credentials (`AuthError`) propagate.
pub struct KalshiApiClient {
    http: reqwest::Client,
    base_url: String,
    /// Path prefix of the base URL; the exchange signs the full path
    /// (prefix included) without the query string.
    sign_prefix: String,
    signer: RequestSigner,
    page_limit: u32,
}

impl KalshiApiClient {
    pub fn new(base_url: &str, signer: RequestSigner, page_limit: u32) -> Result<Self> {
        let parsed = reqwest::Url::parse(base_url).context("Invalid Kalshi API base URL")?;
        let sign_prefix = parsed.path().trim_end_matches('/').to_string();

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            sign_prefix,
            signer,
            page_limit,
        })
    }

    /// One authenticated GET. Returns `Ok(None)` on any upstream failure
    /// (logged); `Err` only when signing credentials are missing.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<Option<T>, AuthError> {
        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;

        let sign_path = format!("{}{}", self.sign_prefix, path);
        let headers = self.signer.headers(timestamp_ms, "GET", &sign_path)?;

        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .http
            .get(&url)
            .header("KALSHI-ACCESS-KEY", &headers.access_key)
            .header("KALSHI-ACCESS-SIGNATURE", &headers.signature)
            .header("KALSHI-ACCESS-TIMESTAMP", &headers.timestamp)
            .header("Content-Type", "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                error!("Kalshi request to {} failed: {}", path, e);
                return Ok(None);
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Kalshi API error {} on {}: {}", status, path, body);
            return Ok(None);
        }

        match response.json::<T>().await {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                error!("Failed to decode Kalshi response from {}: {}", path, e);
                Ok(None)
            }
        }
    }

    pub async fn get_markets(&self, params: &GetMarketsParams) -> Result<MarketsResponse, AuthError> {
        Ok(self
            .get_json("/markets", &params.query())
            .await?
            .unwrap_or_default())
    }

    /// Single-market lookup. `None` on any failure; not-found, upstream
    /// errors, and missing credentials are not distinguished.
    pub async fn get_market(&self, ticker: &str) -> Option<Market> {
        let path = format!("/markets/{}", ticker);
        match self.get_json::<MarketResponse>(&path, &[]).await {
            Ok(found) => found.map(|response| response.market),
            Err(e) => {
                error!("Market lookup for {} failed: {}", ticker, e);
                None
            }
        }
    }

    pub async fn get_events(&self, params: &GetEventsParams) -> Result<EventsResponse, AuthError> {
        Ok(self
            .get_json("/events", &params.query())
            .await?
            .unwrap_or_default())
    }

    pub async fn get_orders(&self, params: &GetOrdersParams) -> Result<OrdersResponse, AuthError> {
        Ok(self
            .get_json("/portfolio/orders", &params.query())
            .await?
            .unwrap_or_default())
    }

    /// Orders the exchange reports as filled, filtered server-side.
    pub async fn get_executed_orders(&self) -> Result<Vec<Order>, AuthError> {
        let params = GetOrdersParams {
            status: Some(OrderStatus::Executed),
            limit: Some(self.page_limit),
            ..Default::default()
        };
        Ok(self.get_orders(&params).await?.orders)
    }

    pub async fn get_positions(
        &self,
        params: &GetPositionsParams,
    ) -> Result<PositionsResponse, AuthError> {
        Ok(self
            .get_json("/portfolio/positions", &params.query())
            .await?
            .unwrap_or_default())
    }

    /// Positions with non-zero holdings, filtered server-side.
    pub async fn get_active_positions(&self) -> Result<PositionsResponse, AuthError> {
        let params = GetPositionsParams {
            count_filter: Some("position".to_string()),
            limit: Some(self.page_limit),
            ..Default::default()
        };
        self.get_positions(&params).await
    }

    pub async fn get_settlements(
        &self,
        params: &GetSettlementsParams,
    ) -> Result<SettlementsResponse, AuthError> {
        Ok(self
            .get_json("/portfolio/settlements", &params.query())
            .await?
            .unwrap_or_default())
    }

    /// Every open market, following cursors up to the page ceiling.
    pub async fn get_all_open_markets(&self) -> Result<Vec<Market>, AuthError> {
        follow_cursor(|cursor| {
            let params = GetMarketsParams {
                status: Some(MarketStatus::Open),
                limit: Some(self.page_limit),
                cursor,
                ..Default::default()
            };
            async move {
                let page = self.get_markets(&params).await?;
                Ok((page.markets, page.cursor))
            }
        })
        .await
    }
}

/// Drive cursor pagination: fetch pages until the cursor comes back empty,
/// a page has no items, or the page ceiling is reached.
async fn follow_cursor<T, E, F, Fut>(mut fetch_page: F) -> Result<Vec<T>, E>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<(Vec<T>, Option<String>), E>>,
{
    let mut items = Vec::new();
    let mut cursor: Option<String> = None;

    for _ in 0..MAX_COLLECTION_PAGES {
        let (page_items, next_cursor) = fetch_page(cursor).await?;
        if page_items.is_empty() {
            return Ok(items);
        }
        items.extend(page_items);

        match next_cursor {
            Some(next) if !next.is_empty() => cursor = Some(next),
            _ => return Ok(items),
        }
    }

    warn!(
        "Stopped following cursors after {} pages; collection truncated",
        MAX_COLLECTION_PAGES
    );
    Ok(items)
}
