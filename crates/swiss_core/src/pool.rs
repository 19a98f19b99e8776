//! Player pool construction from play rates

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::player::Player;

/// Percentage of the field playing each deck. Expected to sum to 100.
pub type PlayRates = HashMap<String, f64>;

/// Number of entrants assigned to one deck
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub deck: String,
    pub count: u32,
}

/// Split `total` entrants across `decks` by play rate.
///
/// Each deck gets `round(total * rate / 100)`. Rounding drift is folded into
/// the largest allocation (first in `decks` order on ties), so the counts
/// always sum to `total` whenever at least one deck is given. Decks missing
/// from `rates`, or with a negative or non-finite rate, get zero.
pub fn allocate(decks: &[String], rates: &PlayRates, total: u32) -> Vec<Allocation> {
    if decks.is_empty() {
        return Vec::new();
    }

    let mut counts: Vec<i64> = decks
        .iter()
        .map(|deck| {
            let rate = rates.get(deck).copied().unwrap_or(0.0);
            if !rate.is_finite() || rate <= 0.0 {
                return 0;
            }
            let share = (f64::from(total) * rate / 100.0).round();
            share.min(f64::from(u32::MAX)) as i64
        })
        .collect();

    let drift = i64::from(total) - counts.iter().sum::<i64>();
    if drift != 0 {
        tracing::debug!(total, drift, "correcting allocation rounding drift");
        absorb_drift(&mut counts, drift);
    }

    decks
        .iter()
        .zip(counts)
        .map(|(deck, count)| Allocation {
            deck: deck.clone(),
            count: count as u32,
        })
        .collect()
}

/// Add `drift` to the largest bucket. A negative drift that would push it
/// below zero spills over to the next largest.
fn absorb_drift(counts: &mut [i64], drift: i64) {
    let mut order: Vec<usize> = (0..counts.len()).collect();
    // Stable sort keeps first-listed deck ahead on ties
    order.sort_by(|&a, &b| counts[b].cmp(&counts[a]));

    let mut remaining = drift;
    for idx in order {
        let applied = remaining.max(-counts[idx]);
        counts[idx] += applied;
        remaining -= applied;
        if remaining == 0 {
            break;
        }
    }
}

/// Create the shuffled entrant list for one tournament.
///
/// Ids run from 1 in allocation order before the shuffle.
pub fn build_pool<R: Rng + ?Sized>(
    decks: &[String],
    rates: &PlayRates,
    total: u32,
    rng: &mut R,
) -> Vec<Player> {
    let allocations = allocate(decks, rates, total);
    let mut players = Vec::with_capacity(total as usize);
    let mut next_id = 1;

    for allocation in &allocations {
        let deck: Arc<str> = Arc::from(allocation.deck.as_str());
        for _ in 0..allocation.count {
            players.push(Player::new(next_id, Arc::clone(&deck)));
            next_id += 1;
        }
    }

    players.shuffle(rng);
    players
}

/// Equal share for every deck
pub fn equal_rates(decks: &[String]) -> PlayRates {
    if decks.is_empty() {
        return PlayRates::new();
    }
    let share = 100.0 / decks.len() as f64;
    decks.iter().map(|deck| (deck.clone(), share)).collect()
}

#[cfg(test)]
#[path = "pool_tests.rs"]
mod pool_tests;
