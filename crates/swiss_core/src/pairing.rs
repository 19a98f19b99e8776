//! Swiss pairing for a single round
//!
//! Players are paired within their match-point bracket, or with the nearest
//! bracket below when their own bracket has nobody left they haven't played.
//! Nobody is ever paired up. A player with no legal opponent at or below
//! their score receives a bye on the spot.
//!
//! Rematch avoidance is greedy: there is no backtracking, so late players in
//! a round can be left without a partner and take a bye even when a full
//! pairing existed. More than one bye per round is possible.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;

use crate::player::Player;

/// Result of pairing one round. Indices refer to the player slice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundPairings {
    pub pairs: Vec<(usize, usize)>,
    /// Players awarded a bye (already applied)
    pub byes: Vec<usize>,
}

/// Pair one round, awarding byes in place.
pub fn pair_round<R: Rng + ?Sized>(players: &mut [Player], rng: &mut R) -> RoundPairings {
    let mut brackets: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
    for (idx, player) in players.iter().enumerate() {
        brackets.entry(player.match_points).or_default().push(idx);
    }
    for bracket in brackets.values_mut() {
        bracket.shuffle(rng);
    }

    let mut paired = vec![false; players.len()];
    let mut round = RoundPairings::default();
    let mut candidates = Vec::new();

    for idx in 0..players.len() {
        if paired[idx] {
            continue;
        }

        let mut opponent = None;
        for bracket in brackets.range(..=players[idx].match_points).rev().map(|(_, b)| b) {
            candidates.clear();
            candidates.extend(bracket.iter().copied().filter(|&other| {
                other != idx && !paired[other] && !players[idx].has_played(players[other].id)
            }));

            if let Some(&other) = candidates.choose(rng) {
                opponent = Some(other);
                break;
            }
        }

        paired[idx] = true;
        match opponent {
            Some(other) => {
                paired[other] = true;
                round.pairs.push((idx, other));
            }
            None => {
                players[idx].award_bye();
                round.byes.push(idx);
            }
        }
    }

    tracing::trace!(
        pairs = round.pairs.len(),
        byes = round.byes.len(),
        "round paired"
    );
    round
}

/// Mutable access to both players of a pairing
pub(crate) fn pair_mut(players: &mut [Player], a: usize, b: usize) -> (&mut Player, &mut Player) {
    assert_ne!(a, b, "a player cannot be paired with themselves");
    if a < b {
        let (low, high) = players.split_at_mut(b);
        (&mut low[a], &mut high[0])
    } else {
        let (low, high) = players.split_at_mut(a);
        (&mut high[0], &mut low[b])
    }
}

#[cfg(test)]
#[path = "pairing_tests.rs"]
mod pairing_tests;
