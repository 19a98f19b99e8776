//! Swiss tournament simulator for deck metagames
//!
//! Given head-to-head records between decks and the share of the field
//! playing each one, this crate plays out many two-day Swiss tournaments and
//! reports how often each deck reaches Day 2 and the top cut:
//! - Pool building from play rates
//! - Swiss pairing with rematch avoidance and byes
//! - Match resolution from historical win/loss records
//! - Batch aggregation with progress reporting and cancellation
//!
//! # Usage
//!
//! ```bash
//! cargo run -p tournament -- --matchups matchups.csv --entrants 300 --trials 2000
//! ```

pub mod batch;
pub mod cancel;
pub mod format;
pub mod matchup;
pub mod pairing;
pub mod player;
pub mod pool;
pub mod resolver;
pub mod runner;

pub use batch::*;
pub use cancel::*;
pub use format::*;
pub use matchup::*;
pub use pairing::{pair_round, RoundPairings};
pub use player::*;
pub use pool::*;
pub use resolver::*;
pub use runner::*;
