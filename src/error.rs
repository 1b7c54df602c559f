//! Error types for the ingest boundaries.
//!
//! Scoring, ranking and aggregation never fail; these errors only come out of
//! parsing raw rows, recording results and loading configuration.

use thiserror::Error;

use crate::round::Round;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main error type for bracket ingest operations
#[derive(Debug, Error)]
pub enum BracketError {
    /// Round string outside the known stages
    #[error("Unknown round: {0:?}")]
    UnknownRound(String),

    /// Both teams scored the same, so there is no winner to advance
    #[error("Tied result in {round} {conference} matchup {matchup_id}: {score}-{score}")]
    TiedResult {
        round: Round,
        conference: String,
        matchup_id: i64,
        score: i64,
    },

    /// Result recorded for a round whose winner is not picked anywhere
    #[error("No round follows {0}; results cannot be recorded for it")]
    NoAdvancement(Round),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type alias for bracket ingest operations
pub type Result<T> = std::result::Result<T, BracketError>;
