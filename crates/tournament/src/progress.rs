//! Progress bar for batch runs
//!
//! Shows trials completed against trials requested, with the deck currently
//! converting best to Day 2.

use indicatif::{ProgressBar, ProgressStyle};
use swiss_core::{AggregatedResults, BatchProgress};

pub struct BatchProgressBar {
    bar: ProgressBar,
}

impl BatchProgressBar {
    pub fn new(trials: u32) -> Self {
        let bar = ProgressBar::new(u64::from(trials));
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) | {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
        );
        bar.set_message("Starting...");
        Self { bar }
    }

    /// Hidden bar, for quiet runs
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    pub fn update(&self, progress: &BatchProgress<'_>) {
        self.bar.set_position(u64::from(progress.completed));
        self.bar.set_message(leader_message(progress.snapshot));
    }

    pub fn finish(&self, results: &AggregatedResults) {
        self.bar.finish_with_message(format!(
            "{} trials | {}",
            results.trials_completed,
            leader_message(results)
        ));
    }
}

fn leader_message(results: &AggregatedResults) -> String {
    match results.leader() {
        Some(deck) => format!("Leader: {} ({:.1}% Day 2)", deck.deck, deck.day2_conversion),
        None => "No data yet".to_string(),
    }
}
