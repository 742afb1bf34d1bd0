use serde::Serialize;
use std::collections::HashMap;

use crate::data::types::Market;

/// Markets of one event, shaped for display.
#[derive(Debug, Clone, Serialize)]
pub struct EventGroup {
    pub event_ticker: String,
    pub display_name: String,
    pub markets: Vec<Market>,
}

/// Group a flat market list by event ticker.
///
/// Groups come out in first-seen order; markets within a group are sorted
/// by title. The display name prefers a market subtitle and falls back to a
/// label derived from the ticker shape.
pub fn group_by_event(markets: &[Market]) -> Vec<EventGroup> {
    let mut order: Vec<String> = Vec::new();
    let mut grouped: HashMap<String, Vec<Market>> = HashMap::new();

    for market in markets {
        if !grouped.contains_key(&market.event_ticker) {
            order.push(market.event_ticker.clone());
        }
        grouped
            .entry(market.event_ticker.clone())
            .or_default()
            .push(market.clone());
    }

    order
        .into_iter()
        .map(|event_ticker| {
            let mut group_markets = grouped.remove(&event_ticker).unwrap_or_default();
            group_markets.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()));
            let display_name = derive_display_name(&event_ticker, &group_markets);
            EventGroup {
                event_ticker,
                display_name,
                markets: group_markets,
            }
        })
        .collect()
}

fn derive_display_name(event_ticker: &str, markets: &[Market]) -> String {
    if let Some(market) = markets.iter().find(|m| !m.subtitle.trim().is_empty()) {
        return market.subtitle.trim().to_string();
    }
    fallback_label(event_ticker)
}

/// Best-effort label from a `SERIES-DATE-MATCHUP` shaped ticker: the last
/// hyphen segment, when it looks like a matchup code (uppercase
/// alphanumeric, at least 4 chars). Anything else surfaces the raw ticker.
fn fallback_label(event_ticker: &str) -> String {
    if let Some(segment) = event_ticker.rsplit('-').next() {
        if segment.len() >= 4
            && segment
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        {
            return segment.to_string();
        }
    }
    event_ticker.to_string()
}
