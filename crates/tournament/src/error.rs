//! Errors raised while loading inputs and saving results

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TournamentError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to parse settings: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("failed to serialize settings: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("matchup data is missing the `{0}` column")]
    MissingColumn(&'static str),

    #[error("row {row}: invalid {column} count `{value}`")]
    InvalidCount {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

impl TournamentError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, TournamentError>;
