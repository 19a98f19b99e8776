//! Loading matchup rows from CSV or JSON
//!
//! Both formats carry the same columns: `deck_a`, `deck_b`, `wins`,
//! `losses` and an optional `ties`, with counts from `deck_a`'s side.
//! Count cells may be numbers or numeric strings; a blank cell counts as 0
//! (or "no tie data" for `ties`).

use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use swiss_core::MatchupRow;

use crate::error::{Result, TournamentError};

/// Load rows, choosing the format by file extension (`.json` or CSV)
pub fn load_matchups(path: &Path) -> Result<Vec<MatchupRow>> {
    let file = File::open(path).map_err(|e| TournamentError::io(path, e))?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let rows = if is_json {
        read_json(file)?
    } else {
        read_csv(file)?
    };
    tracing::info!(path = %path.display(), rows = rows.len(), "loaded matchup data");
    Ok(rows)
}

/// Parse CSV matchup data with a header row
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<MatchupRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or(TournamentError::MissingColumn(name))
    };
    let deck_a = column("deck_a")?;
    let deck_b = column("deck_b")?;
    let wins = column("wins")?;
    let losses = column("losses")?;
    let ties = column("ties").ok();

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        // Header is line 1
        let line = i + 2;
        let cell = |idx: usize| record.get(idx).unwrap_or("");

        let (a, b) = (cell(deck_a), cell(deck_b));
        if a.is_empty() || b.is_empty() {
            tracing::warn!(line, "skipping matchup row without both deck names");
            continue;
        }

        rows.push(MatchupRow {
            deck_a: a.to_string(),
            deck_b: b.to_string(),
            wins: parse_count(cell(wins), line, "wins")?.unwrap_or(0),
            losses: parse_count(cell(losses), line, "losses")?.unwrap_or(0),
            ties: match ties {
                Some(idx) => parse_count(cell(idx), line, "ties")?,
                None => None,
            },
        });
    }
    Ok(rows)
}

/// A count that arrived as either a JSON number or a string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum CountCell {
    Number(f64),
    Text(String),
}

impl CountCell {
    fn parse(&self, row: usize, column: &'static str) -> Result<Option<u32>> {
        match self {
            CountCell::Number(n) => whole_count(*n)
                .map(Some)
                .ok_or_else(|| invalid(row, column, &n.to_string())),
            CountCell::Text(text) => parse_count(text, row, column),
        }
    }
}

#[derive(Debug, Deserialize)]
struct JsonRow {
    deck_a: String,
    deck_b: String,
    #[serde(default)]
    wins: Option<CountCell>,
    #[serde(default)]
    losses: Option<CountCell>,
    #[serde(default)]
    ties: Option<CountCell>,
}

/// Parse a JSON array of matchup rows
pub fn read_json<R: Read>(reader: R) -> Result<Vec<MatchupRow>> {
    let raw: Vec<JsonRow> = serde_json::from_reader(reader)?;
    let count = |cell: &Option<CountCell>, row, column| match cell {
        Some(cell) => cell.parse(row, column),
        None => Ok(None),
    };

    raw.iter()
        .enumerate()
        .map(|(i, r)| {
            let row = i + 1;
            Ok(MatchupRow {
                deck_a: r.deck_a.trim().to_string(),
                deck_b: r.deck_b.trim().to_string(),
                wins: count(&r.wins, row, "wins")?.unwrap_or(0),
                losses: count(&r.losses, row, "losses")?.unwrap_or(0),
                ties: count(&r.ties, row, "ties")?,
            })
        })
        .collect()
}

/// Parse one count cell. Blank means absent.
pub fn parse_count(text: &str, row: usize, column: &'static str) -> Result<Option<u32>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    if let Ok(n) = text.parse::<u32>() {
        return Ok(Some(n));
    }
    text.parse::<f64>()
        .ok()
        .and_then(whole_count)
        .map(Some)
        .ok_or_else(|| invalid(row, column, text))
}

/// Accept non-negative whole numbers such as `12.0`
fn whole_count(n: f64) -> Option<u32> {
    (n.is_finite() && n >= 0.0 && n.fract() == 0.0 && n <= f64::from(u32::MAX)).then_some(n as u32)
}

fn invalid(row: usize, column: &'static str, value: &str) -> TournamentError {
    TournamentError::InvalidCount {
        row,
        column,
        value: value.to_string(),
    }
}

#[cfg(test)]
#[path = "matchups_tests.rs"]
mod matchups_tests;
