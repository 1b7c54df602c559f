use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::ANONYMOUS_CREATOR;
use crate::error::Result;
use crate::pick::PickSet;

/// Stable storage key of a bracket.
pub type BracketId = i64;

/// A submitted bracket.
///
/// Only `cached_score` ever changes after submission, and only through the
/// recompute step. Evaluation always works from `picks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    pub id: BracketId,
    pub creator: String,
    pub picks: PickSet,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub cached_score: Option<u32>,
}

impl Bracket {
    pub fn new(id: BracketId, creator: impl Into<String>, picks: PickSet, created_at: DateTime<Utc>) -> Self {
        Bracket {
            id,
            creator: creator.into(),
            picks,
            created_at,
            cached_score: None,
        }
    }

    pub fn with_cached_score(mut self, score: u32) -> Self {
        self.cached_score = Some(score);
        self
    }

    /// Parse a JSON array of stored prediction rows.
    pub fn list_from_json(json: &str) -> Result<Vec<Bracket>> {
        let rows: Vec<BracketRow> = serde_json::from_str(json)?;
        Ok(rows.into_iter().map(Bracket::from).collect())
    }
}

/// Prediction row as stored. `predictions` is whatever the client sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BracketRow {
    pub id: BracketId,
    #[serde(default)]
    pub creator: Option<String>,
    #[serde(default)]
    pub predictions: Value,
    #[serde(alias = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(default, alias = "score")]
    pub cached_score: Option<u32>,
}

impl From<BracketRow> for Bracket {
    fn from(row: BracketRow) -> Self {
        let creator = row
            .creator
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| ANONYMOUS_CREATOR.to_string());

        Bracket {
            id: row.id,
            creator,
            picks: PickSet::from_value(&row.predictions),
            created_at: row.created_at,
            cached_score: row.cached_score,
        }
    }
}
