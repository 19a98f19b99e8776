//! Batch results storage and reporting

use serde::{Deserialize, Serialize};
use std::path::Path;
use swiss_core::{AggregatedResults, TournamentConfig};

use crate::error::{Result, TournamentError};

/// Aggregated results plus the conditions they were produced under
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Players per tournament
    pub entrants: u32,
    /// Format derived from the entrant count
    pub config: TournamentConfig,
    /// Trials asked for; `results.trials_completed` may be lower
    pub trials_requested: u32,
    pub results: AggregatedResults,
}

impl BatchReport {
    pub fn new(entrants: u32, trials_requested: u32, results: AggregatedResults) -> Self {
        Self {
            entrants,
            config: TournamentConfig::for_entrants(entrants),
            trials_requested,
            results,
        }
    }

    /// Whether the batch stopped before running every trial
    pub fn cancelled(&self) -> bool {
        self.results.trials_completed < self.trials_requested
    }

    /// Save report to JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| TournamentError::io(path, e))
    }

    /// Load report from JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| TournamentError::io(path, e))?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Generate a text report
    pub fn generate_report(&self) -> String {
        let config = &self.config;
        let mut report = String::new();
        report.push_str(&format!(
            "=== Metagame simulation: {} entrants ===\n\n",
            self.entrants
        ));
        report.push_str(&format!(
            "Format: {} + {} rounds, Day 2 at {} points, top {}\n",
            config.day1_rounds, config.day2_rounds, config.day2_cutoff, config.top_cut_size
        ));
        report.push_str(&format!(
            "Trials: {}/{}{}\n\n",
            self.results.trials_completed,
            self.trials_requested,
            if self.cancelled() { " (stopped early)" } else { "" }
        ));

        let mut header = format!(
            "{:<24} {:>6} {:>8} {:>7} {:>8} {:>7}",
            "Deck", "Day 1", "Day 2", "Conv%", "Top 8", "Conv%"
        );
        if config.has_top16() {
            header.push_str(&format!(" {:>8}", "Top 16"));
        }
        if config.has_top32() {
            header.push_str(&format!(" {:>8}", "Top 32"));
        }
        let width = header.len();
        report.push_str(&header);
        report.push('\n');
        report.push_str(&"-".repeat(width));
        report.push('\n');

        let mut decks: Vec<_> = self.results.decks.iter().collect();
        decks.sort_by(|a, b| b.day2_conversion.total_cmp(&a.day2_conversion));

        for deck in decks {
            report.push_str(&format!(
                "{:<24} {:>6} {:>8.2} {:>6.1}% {:>8.2} {:>6.1}%",
                deck.deck,
                deck.day1_count,
                deck.day2_avg,
                deck.day2_conversion,
                deck.top8_avg,
                deck.top8_conversion
            ));
            if config.has_top16() {
                report.push_str(&format!(" {:>8.2}", deck.top16_avg));
            }
            if config.has_top32() {
                report.push_str(&format!(" {:>8.2}", deck.top32_avg));
            }
            report.push('\n');
        }

        report
    }

    /// Print report to stdout
    pub fn print_report(&self) {
        println!("{}", self.generate_report());
    }
}

#[cfg(test)]
#[path = "results_tests.rs"]
mod results_tests;
