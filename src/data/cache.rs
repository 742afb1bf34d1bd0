use dashmap::DashMap;
use std::time::{Duration, Instant};

use crate::data::types::Market;
use crate::esports::leagues::LoLLeague;

/// Per-league cache of classified open markets.
///
/// Expiry is lazy: an expired entry is deleted by the read that finds it,
/// there is no background sweep. Racing fills for the same league both write;
/// last write wins, which is fine for idempotent reads of the same upstream
/// resource.
pub struct MarketCache {
    entries: DashMap<LoLLeague, CacheEntry>,
    ttl: Duration,
}

struct CacheEntry {
    markets: Vec<Market>,
    filled_at: Instant,
}

impl MarketCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn get(&self, league: LoLLeague) -> Option<Vec<Market>> {
        self.get_at(league, Instant::now())
    }

    /// Read as of `now`, evicting the entry if it has outlived the TTL.
    pub fn get_at(&self, league: LoLLeague, now: Instant) -> Option<Vec<Market>> {
        let entry = self.entries.get(&league)?;
        if now.duration_since(entry.filled_at) > self.ttl {
            drop(entry); // release the read lock before removing
            self.entries.remove(&league);
            return None;
        }
        Some(entry.markets.clone())
    }

    pub fn insert(&self, league: LoLLeague, markets: Vec<Market>) {
        self.insert_at(league, markets, Instant::now());
    }

    pub fn insert_at(&self, league: LoLLeague, markets: Vec<Market>, now: Instant) {
        self.entries.insert(
            league,
            CacheEntry {
                markets,
                filled_at: now,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn market(ticker: &str) -> Market {
        serde_json::from_str(&format!(r#"{{"ticker": "{}"}}"#, ticker)).unwrap()
    }

    #[test]
    fn test_insert_and_get() {
        let cache = MarketCache::new(Duration::from_secs(300));
        cache.insert(LoLLeague::Lck, vec![market("LOLLCK-26JAN21-T1GENG-T1")]);

        let markets = cache.get(LoLLeague::Lck).unwrap();
        assert_eq!(markets.len(), 1);
        assert_eq!(markets[0].ticker, "LOLLCK-26JAN21-T1GENG-T1");

        // Other leagues are independent keys
        assert!(cache.get(LoLLeague::Lec).is_none());
    }

    #[test]
    fn test_entry_valid_up_to_exactly_ttl() {
        let cache = MarketCache::new(Duration::from_secs(300));
        let filled_at = Instant::now();
        cache.insert_at(LoLLeague::Lck, vec![market("A")], filled_at);

        // now - filled_at == TTL is still a hit; expiry is strictly greater
        let at_ttl = filled_at + Duration::from_secs(300);
        assert!(cache.get_at(LoLLeague::Lck, at_ttl).is_some());
    }

    #[test]
    fn test_expired_entry_is_evicted_on_read() {
        let cache = MarketCache::new(Duration::from_secs(300));
        let filled_at = Instant::now();
        cache.insert_at(LoLLeague::Lck, vec![market("A")], filled_at);

        let past_ttl = filled_at + Duration::from_secs(301);
        assert!(cache.get_at(LoLLeague::Lck, past_ttl).is_none());
        // The read removed the entry, not just hid it
        assert!(cache.is_empty());
    }

    #[test]
    fn test_refill_overwrites() {
        let cache = MarketCache::new(Duration::from_secs(300));
        cache.insert(LoLLeague::Lpl, vec![market("A")]);
        cache.insert(LoLLeague::Lpl, vec![market("B"), market("C")]);

        let markets = cache.get(LoLLeague::Lpl).unwrap();
        assert_eq!(markets.len(), 2);
        assert_eq!(cache.len(), 1);
    }
}
