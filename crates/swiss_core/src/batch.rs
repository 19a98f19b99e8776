//! Repeated tournament trials with running per-deck statistics
//!
//! A batch runs independent tournaments, folds each trial's cut-line
//! snapshots into running sums, and turns the sums into averages and
//! conversion rates. After every trial (or every chunk of trials when run in
//! parallel) the batch reports progress and polls its cancellation
//! predicate; an in-flight trial is never interrupted.

use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::cancel::CancelToken;
use crate::format::TournamentConfig;
use crate::matchup::MatchupIndex;
use crate::pool::{build_pool, PlayRates};
use crate::resolver::{MatchResolver, MatchupResolver};
use crate::runner::{DeckCounts, SimulationResults, TournamentRunner};

/// Trials handed to each rayon thread per checkpoint
const TRIALS_PER_THREAD_PER_CHUNK: usize = 8;

/// Averages and conversion rates for one deck
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckStats {
    pub deck: String,
    /// Entrants playing the deck
    pub day1_count: u32,
    pub day2_avg: f64,
    pub top8_avg: f64,
    pub top16_avg: f64,
    pub top32_avg: f64,
    /// Percentage of entrants reaching Day 2
    pub day2_conversion: f64,
    /// Percentage of Day 2 players reaching the top 8
    pub top8_conversion: f64,
}

impl DeckStats {
    fn empty(deck: &str) -> Self {
        Self {
            deck: deck.to_string(),
            day1_count: 0,
            day2_avg: 0.0,
            top8_avg: 0.0,
            top16_avg: 0.0,
            top32_avg: 0.0,
            day2_conversion: 0.0,
            top8_conversion: 0.0,
        }
    }
}

/// Batch-level statistics over the trials completed so far
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregatedResults {
    pub trials_completed: u32,
    /// One entry per deck, in deck-list order
    pub decks: Vec<DeckStats>,
}

impl AggregatedResults {
    pub fn deck(&self, name: &str) -> Option<&DeckStats> {
        self.decks.iter().find(|d| d.deck == name)
    }

    /// Deck with the best Day 2 conversion
    pub fn leader(&self) -> Option<&DeckStats> {
        self.decks
            .iter()
            .filter(|d| d.day1_count > 0)
            .max_by(|a, b| a.day2_conversion.total_cmp(&b.day2_conversion))
    }
}

/// Snapshot handed to the progress callback
#[derive(Debug, Clone, Copy)]
pub struct BatchProgress<'a> {
    pub completed: u32,
    pub requested: u32,
    pub snapshot: &'a AggregatedResults,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct CutSums {
    day2: u64,
    top8: u64,
    top16: u64,
    top32: u64,
}

/// Running sums over completed trials.
///
/// Sums combine by addition, so per-worker accumulators can be merged in any
/// order.
#[derive(Debug, Clone, Default)]
pub struct Accumulator {
    trials: u32,
    /// Entry distribution; identical across trials, kept from the first one
    day1: Option<DeckCounts>,
    sums: HashMap<String, CutSums>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trials(&self) -> u32 {
        self.trials
    }

    /// Fold in one trial
    pub fn add(&mut self, results: &SimulationResults) {
        self.trials += 1;
        if self.day1.is_none() {
            self.day1 = Some(results.day1.clone());
        }

        for (deck, &count) in &results.day2 {
            self.sums.entry(deck.clone()).or_default().day2 += u64::from(count);
        }
        for (deck, &count) in &results.top8 {
            self.sums.entry(deck.clone()).or_default().top8 += u64::from(count);
        }
        for (deck, &count) in results.top16.iter().flatten() {
            self.sums.entry(deck.clone()).or_default().top16 += u64::from(count);
        }
        for (deck, &count) in results.top32.iter().flatten() {
            self.sums.entry(deck.clone()).or_default().top32 += u64::from(count);
        }
    }

    /// Combine two accumulators
    pub fn merge(mut self, other: Self) -> Self {
        self.trials += other.trials;
        if self.day1.is_none() {
            self.day1 = other.day1;
        }
        for (deck, sums) in other.sums {
            let slot = self.sums.entry(deck).or_default();
            slot.day2 += sums.day2;
            slot.top8 += sums.top8;
            slot.top16 += sums.top16;
            slot.top32 += sums.top32;
        }
        self
    }

    /// Averages and conversion rates for `decks`.
    ///
    /// With no completed trials every figure is zero.
    pub fn summarize(&self, decks: &[String]) -> AggregatedResults {
        let decks = decks
            .iter()
            .map(|deck| {
                if self.trials == 0 {
                    return DeckStats::empty(deck);
                }

                let trials = f64::from(self.trials);
                let sums = self.sums.get(deck).copied().unwrap_or_default();
                let day1_count = self
                    .day1
                    .as_ref()
                    .and_then(|counts| counts.get(deck))
                    .copied()
                    .unwrap_or(0);
                let day2_avg = sums.day2 as f64 / trials;
                let top8_avg = sums.top8 as f64 / trials;

                DeckStats {
                    deck: deck.clone(),
                    day1_count,
                    day2_avg,
                    top8_avg,
                    top16_avg: sums.top16 as f64 / trials,
                    top32_avg: sums.top32 as f64 / trials,
                    day2_conversion: percentage(day2_avg, f64::from(day1_count)),
                    top8_conversion: percentage(top8_avg, day2_avg),
                }
            })
            .collect();

        AggregatedResults {
            trials_completed: self.trials,
            decks,
        }
    }
}

fn percentage(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        part / whole * 100.0
    }
}

type ProgressFn<'a> = Box<dyn FnMut(&BatchProgress<'_>) + 'a>;
type CancelFn<'a> = Box<dyn Fn() -> bool + 'a>;

/// Runs many tournaments with one entrant count and play-rate mix.
///
/// ```no_run
/// use swiss_core::{BatchRunner, MatchupIndex, MatchupRow, PlayRates};
///
/// let index = MatchupIndex::from_rows(vec![MatchupRow::new("A", "B", 60, 40)]);
/// let rates: PlayRates = [("A".to_string(), 50.0), ("B".to_string(), 50.0)]
///     .into_iter()
///     .collect();
/// let results = BatchRunner::new(&index, &rates, 100)
///     .on_progress(|p| println!("{}/{}", p.completed, p.requested))
///     .run(1000);
/// println!("{:?}", results.deck("A"));
/// ```
pub struct BatchRunner<'a, M> {
    runner: TournamentRunner<M>,
    decks: Vec<String>,
    rates: &'a PlayRates,
    entrants: u32,
    on_progress: Option<ProgressFn<'a>>,
    should_cancel: Option<CancelFn<'a>>,
}

impl<'a> BatchRunner<'a, MatchupResolver<'a>> {
    /// Batch resolving matches from `index`, over the decks it names
    pub fn new(index: &'a MatchupIndex, rates: &'a PlayRates, entrants: u32) -> Self {
        Self::with_resolver(index.decks(), rates, entrants, MatchupResolver::new(index))
    }
}

impl<'a, M: MatchResolver> BatchRunner<'a, M> {
    pub fn with_resolver(
        decks: &[String],
        rates: &'a PlayRates,
        entrants: u32,
        resolver: M,
    ) -> Self {
        Self {
            runner: TournamentRunner::new(TournamentConfig::for_entrants(entrants), resolver),
            decks: decks.to_vec(),
            rates,
            entrants,
            on_progress: None,
            should_cancel: None,
        }
    }

    /// Called after every completed trial (or chunk, in parallel runs)
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&BatchProgress<'_>) + 'a,
    {
        self.on_progress = Some(Box::new(callback));
        self
    }

    /// Polled before each trial; returning true stops the batch
    pub fn cancel_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn() -> bool + 'a,
    {
        self.should_cancel = Some(Box::new(predicate));
        self
    }

    pub fn cancel_token(self, token: CancelToken) -> Self {
        self.cancel_when(move || token.is_cancelled())
    }

    pub fn config(&self) -> &TournamentConfig {
        self.runner.config()
    }

    pub fn decks(&self) -> &[String] {
        &self.decks
    }

    pub fn entrants(&self) -> u32 {
        self.entrants
    }

    /// Run up to `trials` tournaments with the thread-local RNG
    pub fn run(&mut self, trials: u32) -> AggregatedResults {
        self.run_with_rng(trials, &mut rand::thread_rng())
    }

    /// Run up to `trials` tournaments, one at a time
    pub fn run_with_rng<R: Rng + ?Sized>(&mut self, trials: u32, rng: &mut R) -> AggregatedResults {
        tracing::info!(
            trials,
            entrants = self.entrants,
            decks = self.decks.len(),
            top_cut = self.config().top_cut_size,
            "starting batch"
        );

        let mut acc = Accumulator::new();
        for trial in 0..trials {
            if self.is_cancelled() {
                tracing::info!(completed = trial, requested = trials, "batch cancelled");
                break;
            }

            let players = build_pool(&self.decks, self.rates, self.entrants, rng);
            let outcome = self.runner.run(players, rng);
            acc.add(&outcome.results);
            tracing::debug!(
                trial = trial + 1,
                day2 = outcome.standings.len(),
                "trial complete"
            );
            self.report(&acc, trials);
        }

        self.finish(&acc)
    }

    fn is_cancelled(&self) -> bool {
        self.should_cancel.as_ref().is_some_and(|cancel| cancel())
    }

    fn report(&mut self, acc: &Accumulator, requested: u32) {
        if let Some(callback) = self.on_progress.as_mut() {
            let snapshot = acc.summarize(&self.decks);
            callback(&BatchProgress {
                completed: acc.trials(),
                requested,
                snapshot: &snapshot,
            });
        }
    }

    fn finish(&self, acc: &Accumulator) -> AggregatedResults {
        let results = acc.summarize(&self.decks);
        tracing::info!(completed = results.trials_completed, "batch finished");
        results
    }
}

impl<M: MatchResolver + Sync> BatchRunner<'_, M> {
    /// Run up to `trials` tournaments across the rayon pool.
    ///
    /// Trials are dispatched in chunks. Each worker draws from its own
    /// thread-local RNG and folds into its own accumulator; the chunk's
    /// accumulators are merged on the calling thread, which then reports
    /// progress and polls for cancellation before the next chunk.
    pub fn run_parallel(&mut self, trials: u32) -> AggregatedResults {
        let chunk_size = (rayon::current_num_threads() * TRIALS_PER_THREAD_PER_CHUNK).max(1);
        let chunk_size = u32::try_from(chunk_size).unwrap_or(u32::MAX);
        tracing::info!(
            trials,
            entrants = self.entrants,
            threads = rayon::current_num_threads(),
            chunk_size,
            "starting parallel batch"
        );

        let mut acc = Accumulator::new();
        while acc.trials() < trials {
            if self.is_cancelled() {
                tracing::info!(
                    completed = acc.trials(),
                    requested = trials,
                    "batch cancelled"
                );
                break;
            }

            let size = chunk_size.min(trials - acc.trials());
            let runner = &self.runner;
            let decks = &self.decks;
            let rates = self.rates;
            let entrants = self.entrants;

            let partial = (0..size)
                .into_par_iter()
                .map_init(rand::thread_rng, |rng, _| {
                    let players = build_pool(decks, rates, entrants, rng);
                    runner.run(players, rng).results
                })
                .fold(Accumulator::new, |mut acc, results| {
                    acc.add(&results);
                    acc
                })
                .reduce(Accumulator::new, Accumulator::merge);

            acc = acc.merge(partial);
            tracing::debug!(completed = acc.trials(), "chunk complete");
            self.report(&acc, trials);
        }

        self.finish(&acc)
    }
}

#[cfg(test)]
#[path = "batch_tests.rs"]
mod batch_tests;
