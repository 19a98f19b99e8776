//! Tournament structure derived from the number of entrants.

use serde::{Deserialize, Serialize};

/// Swiss rounds played on Day 1
pub const DAY1_ROUNDS: u32 = 9;

/// Swiss rounds played on Day 2
pub const DAY2_ROUNDS: u32 = 6;

/// Minimum match points after Day 1 to advance
pub const DAY2_CUTOFF: u32 = 19;

/// Entrant thresholds for the larger top cuts
const TOP32_ENTRANTS: u32 = 410;
const TOP16_ENTRANTS: u32 = 227;

/// Structural parameters of one tournament
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentConfig {
    pub day1_rounds: u32,
    pub day2_rounds: u32,
    /// Match points needed to play Day 2
    pub day2_cutoff: u32,
    /// Size of the final cut (8, 16 or 32)
    pub top_cut_size: usize,
}

impl TournamentConfig {
    /// Derive the format for a given number of entrants.
    ///
    /// Any count is accepted. Fields too small for nine rounds simply
    /// produce more byes.
    pub fn for_entrants(entrants: u32) -> Self {
        let top_cut_size = if entrants >= TOP32_ENTRANTS {
            32
        } else if entrants >= TOP16_ENTRANTS {
            16
        } else {
            8
        };

        Self {
            day1_rounds: DAY1_ROUNDS,
            day2_rounds: DAY2_ROUNDS,
            day2_cutoff: DAY2_CUTOFF,
            top_cut_size,
        }
    }

    /// Total rounds a Day 2 qualifier plays
    pub fn total_rounds(&self) -> u32 {
        self.day1_rounds + self.day2_rounds
    }

    pub fn has_top16(&self) -> bool {
        self.top_cut_size >= 16
    }

    pub fn has_top32(&self) -> bool {
        self.top_cut_size >= 32
    }
}

#[cfg(test)]
#[path = "format_tests.rs"]
mod format_tests;
