//! Historical head-to-head records between decks

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One row of matchup data as supplied by a loader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchupRow {
    pub deck_a: String,
    pub deck_b: String,
    /// Wins for `deck_a`
    pub wins: u32,
    /// Losses for `deck_a`
    pub losses: u32,
    #[serde(default)]
    pub ties: Option<u32>,
}

impl MatchupRow {
    pub fn new(deck_a: &str, deck_b: &str, wins: u32, losses: u32) -> Self {
        Self {
            deck_a: deck_a.to_string(),
            deck_b: deck_b.to_string(),
            wins,
            losses,
            ties: None,
        }
    }
}

/// Win/loss/tie counts from the first deck's perspective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MatchupStat {
    pub wins: u32,
    pub losses: u32,
    pub ties: Option<u32>,
}

impl MatchupStat {
    /// Decided games. Ties are not part of the total.
    pub fn total(&self) -> u32 {
        self.wins.saturating_add(self.losses)
    }

    /// The same record seen from the other deck
    pub fn inverted(&self) -> Self {
        Self {
            wins: self.losses,
            losses: self.wins,
            ties: self.ties,
        }
    }
}

/// Lookup from an ordered deck pair to its record.
///
/// Only the orientation present in the source data is stored; lookups fall
/// back to the reverse pair and invert it.
#[derive(Debug, Clone, Default)]
pub struct MatchupIndex {
    stats: HashMap<String, HashMap<String, MatchupStat>>,
    decks: Vec<String>,
}

impl MatchupIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index from loader rows. A repeated ordered pair replaces
    /// the earlier record.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = MatchupRow>,
    {
        let mut index = Self::new();
        for row in rows {
            index.insert(row);
        }
        index
    }

    /// Insert one row, returning the record it replaced (if any)
    pub fn insert(&mut self, row: MatchupRow) -> Option<MatchupStat> {
        self.register_deck(&row.deck_a);
        self.register_deck(&row.deck_b);

        let stat = MatchupStat {
            wins: row.wins,
            losses: row.losses,
            ties: row.ties,
        };
        let previous = self
            .stats
            .entry(row.deck_a.clone())
            .or_default()
            .insert(row.deck_b.clone(), stat);

        if previous.is_some() {
            tracing::warn!(
                deck_a = %row.deck_a,
                deck_b = %row.deck_b,
                "duplicate matchup row replaces earlier record"
            );
        }
        previous
    }

    fn register_deck(&mut self, deck: &str) {
        if !self.decks.iter().any(|d| d == deck) {
            self.decks.push(deck.to_string());
        }
    }

    /// Record for `deck` against `opponent`, from `deck`'s perspective
    pub fn lookup(&self, deck: &str, opponent: &str) -> Option<MatchupStat> {
        if let Some(stat) = self.get_stored(deck, opponent) {
            return Some(stat);
        }
        self.get_stored(opponent, deck).map(|stat| stat.inverted())
    }

    fn get_stored(&self, deck_a: &str, deck_b: &str) -> Option<MatchupStat> {
        self.stats.get(deck_a).and_then(|row| row.get(deck_b)).copied()
    }

    /// All decks named in the data, in order of first appearance
    pub fn decks(&self) -> &[String] {
        &self.decks
    }

    pub fn contains_deck(&self, deck: &str) -> bool {
        self.decks.iter().any(|d| d == deck)
    }

    /// Number of stored (ordered) records
    pub fn len(&self) -> usize {
        self.stats.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decks that appear in the data but have no record against each other
    pub fn missing_pairs(&self) -> Vec<(String, String)> {
        let mut missing = Vec::new();
        for (i, a) in self.decks.iter().enumerate() {
            for b in &self.decks[i + 1..] {
                if self.lookup(a, b).is_none() {
                    missing.push((a.clone(), b.clone()));
                }
            }
        }
        missing
    }
}

#[cfg(test)]
#[path = "matchup_tests.rs"]
mod matchup_tests;
