//! Runs one two-day tournament and snapshots the field at each cut

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::format::TournamentConfig;
use crate::pairing::{pair_mut, pair_round};
use crate::player::Player;
use crate::resolver::{play_match, MatchResolver};

/// Number of players per deck
pub type DeckCounts = BTreeMap<String, u32>;

/// Deck counts at every cut line of one tournament
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResults {
    /// Whole field
    pub day1: DeckCounts,
    /// Players who made the Day 2 cutoff
    pub day2: DeckCounts,
    pub top8: DeckCounts,
    /// Present only when the format cuts to 16 or more
    pub top16: Option<DeckCounts>,
    /// Present only when the format cuts to 32
    pub top32: Option<DeckCounts>,
}

/// Everything a finished tournament leaves behind
#[derive(Debug, Clone)]
pub struct TrialOutcome {
    pub results: SimulationResults,
    /// Players who missed the Day 2 cutoff
    pub eliminated: Vec<Player>,
    /// Day 2 field, best record first
    pub standings: Vec<Player>,
}

/// Tally players by deck
pub fn count_decks(players: &[Player]) -> DeckCounts {
    let mut counts = DeckCounts::new();
    for player in players {
        *counts.entry(player.deck.to_string()).or_insert(0) += 1;
    }
    counts
}

/// Plays Day 1, cuts to Day 2, plays Day 2
pub struct TournamentRunner<M> {
    config: TournamentConfig,
    resolver: M,
}

impl<M: MatchResolver> TournamentRunner<M> {
    pub fn new(config: TournamentConfig, resolver: M) -> Self {
        Self { config, resolver }
    }

    pub fn config(&self) -> &TournamentConfig {
        &self.config
    }

    pub fn resolver(&self) -> &M {
        &self.resolver
    }

    /// Pair and resolve one round over `players`
    pub fn play_round<R: Rng + ?Sized>(&self, players: &mut [Player], rng: &mut R) {
        let round = pair_round(players, rng);
        for (a, b) in round.pairs {
            let (player1, player2) = pair_mut(players, a, b);
            play_match(&self.resolver, player1, player2, rng);
        }
    }

    /// Run a full tournament over `players`
    pub fn run<R: Rng + ?Sized>(&self, mut players: Vec<Player>, rng: &mut R) -> TrialOutcome {
        for _ in 0..self.config.day1_rounds {
            self.play_round(&mut players, rng);
        }
        let day1 = count_decks(&players);

        let cutoff = self.config.day2_cutoff;
        let (mut standings, eliminated): (Vec<Player>, Vec<Player>) =
            players.into_iter().partition(|p| p.match_points >= cutoff);

        for _ in 0..self.config.day2_rounds {
            self.play_round(&mut standings, rng);
        }
        // Match points only; no tiebreakers
        standings.sort_by(|a, b| b.match_points.cmp(&a.match_points));

        let top = |size: usize| count_decks(&standings[..size.min(standings.len())]);
        let results = SimulationResults {
            day1,
            day2: count_decks(&standings),
            top8: top(8),
            top16: self.config.has_top16().then(|| top(16)),
            top32: self.config.has_top32().then(|| top(32)),
        };

        TrialOutcome {
            results,
            eliminated,
            standings,
        }
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod runner_tests;
