//! Deck metagame simulator
//!
//! This crate wraps `swiss_core` with everything needed to run it from the
//! command line:
//! - Loading matchup records from CSV or JSON
//! - Persisting run settings (entrants, trials, play rates) as TOML
//! - Progress display while a batch runs
//! - Text and JSON reports of the aggregated results
//!
//! # Usage
//!
//! ```bash
//! # Equal play rates for every deck in the data
//! cargo run -p tournament -- --matchups matchups.csv --equal-rates --trials 2000
//!
//! # Custom mix, saved for next time
//! cargo run -p tournament -- --matchups matchups.csv --rate Burn=30 --rate Tron=70 --save-config
//! ```

mod error;
mod matchups;
mod progress;
mod results;
mod settings;

pub use error::*;
pub use matchups::*;
pub use progress::*;
pub use results::*;
pub use settings::*;
