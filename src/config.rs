//! Engine configuration.
//!
//! The scoring policy and the edition's matchup pairings change between
//! seasons, so both are read from TOML rather than compiled in.
//!
//! ```
//! use bracket_core::config::EngineConfig;
//! use bracket_core::Round;
//!
//! let config = EngineConfig::from_toml_str(r#"
//!     [scoring]
//!     points = [1, 2, 4, 8]
//!     min_leaderboard_score = 2
//!
//!     [matchups]
//!     edition = "2025-26"
//!
//!     [[matchups.pairings]]
//!     round = "wildcard"
//!     conference = "AFC"
//!     teams = ["NE", "LAC"]
//! "#).unwrap();
//!
//! assert_eq!(config.scoring.points_for(Round::Conference), 4);
//! assert_eq!(config.matchups.pairings.len(), 1);
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::policy::ScoringPolicy;
use crate::stats::MatchupTable;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub scoring: ScoringPolicy,
    pub matchups: MatchupTable,
}

impl EngineConfig {
    /// Loads and validates configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects pairings of a team with itself and pairings in a round whose
    /// winners are never picked.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for pairing in &self.matchups.pairings {
            let [team1, team2] = &pairing.teams;
            if team1 == team2 {
                return Err(ConfigError::Invalid(format!(
                    "{} {} pairing lists {} twice",
                    pairing.round, pairing.conference, team1
                )));
            }
            if pairing.round.advancement_target().is_none() {
                return Err(ConfigError::Invalid(format!(
                    "{} is not played, {} vs {} cannot be paired in it",
                    pairing.round, team1, team2
                )));
            }
        }
        Ok(())
    }
}
