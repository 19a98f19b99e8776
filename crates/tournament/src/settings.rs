//! Run settings persisted between sessions as TOML

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use swiss_core::{MatchupIndex, PlayRates};

use crate::error::{Result, TournamentError};

/// Tolerance when checking that play rates add up to 100
const RATE_SUM_TOLERANCE: f64 = 0.01;

/// Everything needed to start a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    /// Number of players in each simulated tournament
    pub entrants: u32,
    /// Number of tournaments to simulate
    pub trials: u32,
    /// CSV or JSON matchup data
    pub matchups: Option<PathBuf>,
    /// Where to write the JSON report
    pub output: Option<PathBuf>,
    /// Spread trials across all cores
    pub parallel: bool,
    /// Stop after this many seconds, keeping completed trials
    pub time_limit_secs: Option<u64>,
    /// Percentage of the field on each deck. Kept last so it serializes as
    /// a trailing TOML table.
    pub play_rates: BTreeMap<String, f64>,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            entrants: 100,
            trials: 1000,
            matchups: None,
            output: None,
            parallel: false,
            time_limit_secs: None,
            play_rates: BTreeMap::new(),
        }
    }
}

impl RunSettings {
    /// Load settings from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| TournamentError::io(path, e))?;
        Ok(toml::from_str(&contents)?)
    }

    /// Save settings to a TOML file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents).map_err(|e| TournamentError::io(path, e))
    }

    /// Give every deck in `index` the same share
    pub fn set_equal_rates(&mut self, index: &MatchupIndex) {
        self.play_rates = swiss_core::equal_rates(index.decks()).into_iter().collect();
    }

    /// Play rates in the form the simulator takes
    pub fn play_rates(&self) -> PlayRates {
        self.play_rates
            .iter()
            .map(|(deck, &rate)| (deck.clone(), rate))
            .collect()
    }

    /// Check the settings against the loaded matchup data.
    ///
    /// Hard failures are returned as errors; rates that do not sum to 100 or
    /// name unknown decks are only logged.
    pub fn validate(&self, index: &MatchupIndex) -> Result<()> {
        if self.entrants == 0 {
            return Err(TournamentError::InvalidSettings(
                "entrants must be at least 1".to_string(),
            ));
        }
        if self.trials == 0 {
            return Err(TournamentError::InvalidSettings(
                "trials must be at least 1".to_string(),
            ));
        }
        if index.decks().is_empty() {
            return Err(TournamentError::InvalidSettings(
                "matchup data names no decks".to_string(),
            ));
        }
        if let Some((deck, rate)) = self
            .play_rates
            .iter()
            .find(|(_, rate)| !rate.is_finite() || **rate < 0.0)
        {
            return Err(TournamentError::InvalidSettings(format!(
                "play rate for {deck} must be a non-negative number, got {rate}"
            )));
        }

        for deck in self.play_rates.keys() {
            if !index.contains_deck(deck) {
                tracing::warn!(%deck, "play rate given for a deck with no matchup data");
            }
        }
        let sum: f64 = self.play_rates.values().sum();
        if (sum - 100.0).abs() > RATE_SUM_TOLERANCE {
            tracing::warn!(sum, "play rates do not add up to 100%");
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod settings_tests;
