//! Tournament entrants

use std::sync::Arc;

/// Opponent id recorded for a bye
pub const BYE: u32 = 0;

/// Match points for a win (or bye)
pub const WIN_POINTS: u32 = 3;

/// Match points for a tie
pub const TIE_POINTS: u32 = 1;

/// One entrant in a single simulated tournament.
///
/// `opponents` has exactly one entry per round played; a bye is recorded
/// as [`BYE`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Unique within a tournament, starting at 1
    pub id: u32,
    pub deck: Arc<str>,
    pub match_points: u32,
    pub opponents: Vec<u32>,
}

impl Player {
    pub fn new(id: u32, deck: Arc<str>) -> Self {
        Self {
            id,
            deck,
            match_points: 0,
            opponents: Vec::new(),
        }
    }

    /// Whether `opponent` has already been faced in this tournament
    pub fn has_played(&self, opponent: u32) -> bool {
        self.opponents.contains(&opponent)
    }

    pub fn rounds_played(&self) -> usize {
        self.opponents.len()
    }

    /// Award an unpaired round
    pub fn award_bye(&mut self) {
        self.match_points += WIN_POINTS;
        self.opponents.push(BYE);
    }

    pub fn byes(&self) -> usize {
        self.opponents.iter().filter(|&&id| id == BYE).count()
    }
}
