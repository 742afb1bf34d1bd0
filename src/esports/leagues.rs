use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::data::types::Market;

/// The professional League of Legends circuits we track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoLLeague {
    #[serde(rename = "LEC")]
    Lec,
    #[serde(rename = "LCS")]
    Lcs,
    #[serde(rename = "LPL")]
    Lpl,
    #[serde(rename = "LCK")]
    Lck,
}

impl LoLLeague {
    pub const ALL: [LoLLeague; 4] = [LoLLeague::Lec, LoLLeague::Lcs, LoLLeague::Lpl, LoLLeague::Lck];

    pub fn code(&self) -> &'static str {
        match self {
            LoLLeague::Lec => "LEC",
            LoLLeague::Lcs => "LCS",
            LoLLeague::Lpl => "LPL",
            LoLLeague::Lck => "LCK",
        }
    }

    /// Exact-match parse of the inbound query value ("LCK", not "lck").
    pub fn from_code(code: &str) -> Option<LoLLeague> {
        LoLLeague::ALL.iter().copied().find(|l| l.code() == code)
    }
}

impl fmt::Display for LoLLeague {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Classifies markets into leagues by matching the league code as a whole
/// word (case-insensitive) in the title or subtitle.
///
/// This is not a partition: a market may match several leagues or none.
/// Zero-match markets are simply absent from every league's list.
pub struct LeagueClassifier {
    patterns: Vec<(LoLLeague, Regex)>,
}

impl LeagueClassifier {
    pub fn new() -> Result<Self> {
        let mut patterns = Vec::with_capacity(LoLLeague::ALL.len());
        for league in LoLLeague::ALL {
            let pattern = Regex::new(&format!(r"(?i)\b{}\b", league.code()))?;
            patterns.push((league, pattern));
        }
        Ok(Self { patterns })
    }

    /// Partition a market list by league, preserving input order within
    /// each league. Every league is present in the result, possibly empty.
    pub fn classify(&self, markets: &[Market]) -> HashMap<LoLLeague, Vec<Market>> {
        let mut by_league: HashMap<LoLLeague, Vec<Market>> =
            LoLLeague::ALL.iter().map(|&l| (l, Vec::new())).collect();

        for market in markets {
            for (league, pattern) in &self.patterns {
                if pattern.is_match(&market.title) || pattern.is_match(&market.subtitle) {
                    by_league.entry(*league).or_default().push(market.clone());
                }
            }
        }

        by_league
    }

    /// The markets matching a single league, in input order.
    pub fn markets_for(&self, league: LoLLeague, markets: &[Market]) -> Vec<Market> {
        let pattern = self
            .patterns
            .iter()
            .find(|(l, _)| *l == league)
            .map(|(_, p)| p);

        match pattern {
            Some(pattern) => markets
                .iter()
                .filter(|m| pattern.is_match(&m.title) || pattern.is_match(&m.subtitle))
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn market(title: &str, subtitle: &str) -> Market {
        serde_json::from_str(&format!(
            r#"{{"ticker": "T", "title": "{}", "subtitle": "{}"}}"#,
            title, subtitle
        ))
        .unwrap()
    }

    #[test]
    fn test_lck_title_classifies_into_lck_only() {
        let classifier = LeagueClassifier::new().unwrap();
        let markets = vec![market("LCK Summer Finals: T1 vs GenG", "")];

        let by_league = classifier.classify(&markets);
        assert_eq!(by_league[&LoLLeague::Lck].len(), 1);
        assert!(by_league[&LoLLeague::Lec].is_empty());
        assert!(by_league[&LoLLeague::Lcs].is_empty());
        assert!(by_league[&LoLLeague::Lpl].is_empty());
    }

    #[test]
    fn test_subtitle_match_counts() {
        let classifier = LeagueClassifier::new().unwrap();
        let markets = vec![market("Winner of game 1", "LPL Spring Split")];

        assert_eq!(classifier.markets_for(LoLLeague::Lpl, &markets).len(), 1);
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let classifier = LeagueClassifier::new().unwrap();
        let markets = vec![market("lck summer: T1 vs GenG", "")];

        assert_eq!(classifier.markets_for(LoLLeague::Lck, &markets).len(), 1);
    }

    #[test]
    fn test_code_inside_a_word_does_not_match() {
        let classifier = LeagueClassifier::new().unwrap();
        // "LOLLCK" contains "LCK" but not as a whole word
        let markets = vec![market("LOLLCK ticker soup", "")];

        assert!(classifier.markets_for(LoLLeague::Lck, &markets).is_empty());
    }

    #[test]
    fn test_unmatched_market_is_absent_everywhere() {
        let classifier = LeagueClassifier::new().unwrap();
        let markets = vec![market("Will it rain in Seoul?", "")];

        let by_league = classifier.classify(&markets);
        assert!(by_league.values().all(|list| list.is_empty()));
    }

    #[test]
    fn test_input_order_preserved() {
        let classifier = LeagueClassifier::new().unwrap();
        let markets = vec![
            market("LCK match B", ""),
            market("LEC match", ""),
            market("LCK match A", ""),
        ];

        let lck = classifier.markets_for(LoLLeague::Lck, &markets);
        assert_eq!(lck[0].title, "LCK match B");
        assert_eq!(lck[1].title, "LCK match A");
    }

    #[test]
    fn test_from_code_is_exact() {
        assert_eq!(LoLLeague::from_code("LCK"), Some(LoLLeague::Lck));
        assert_eq!(LoLLeague::from_code("lck"), None);
        assert_eq!(LoLLeague::from_code("XYZ"), None);
    }

    #[test]
    fn test_league_serializes_as_code() {
        let json = serde_json::to_string(&LoLLeague::Lec).unwrap();
        assert_eq!(json, r#""LEC""#);
    }
}
