use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};

use crate::error::{BracketError, Result};
use crate::pick::{ConferenceId, TeamCode};
use crate::round::Round;

/// Identity of a real matchup. Unique within a result index.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResultKey {
    pub round: Round,
    pub conference: ConferenceId,
    pub matchup_id: i64,
}

/// `round-conference-matchupId`, the key results are served under.
impl fmt::Display for ResultKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.round, self.conference, self.matchup_id)
    }
}

/// Final score of one played matchup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameResult {
    pub round: Round,
    pub conference: ConferenceId,
    pub matchup_id: i64,
    pub team1: TeamCode,
    pub team2: TeamCode,
    pub score1: i64,
    pub score2: i64,
    winner: TeamCode,
}

impl GameResult {
    /// Record a final score. Fails on a tie or on a round with no next stage.
    pub fn new(
        round: Round,
        conference: impl Into<ConferenceId>,
        matchup_id: i64,
        team1: impl Into<TeamCode>,
        team2: impl Into<TeamCode>,
        score1: i64,
        score2: i64,
    ) -> Result<Self> {
        let conference = conference.into();
        if round.advancement_target().is_none() {
            return Err(BracketError::NoAdvancement(round));
        }
        if score1 == score2 {
            return Err(BracketError::TiedResult {
                round,
                conference,
                matchup_id,
                score: score1,
            });
        }

        let team1 = team1.into();
        let team2 = team2.into();
        let winner = if score1 > score2 { team1.clone() } else { team2.clone() };

        Ok(GameResult {
            round,
            conference,
            matchup_id,
            team1,
            team2,
            score1,
            score2,
            winner,
        })
    }

    pub fn key(&self) -> ResultKey {
        ResultKey {
            round: self.round,
            conference: self.conference.clone(),
            matchup_id: self.matchup_id,
        }
    }

    pub fn winner(&self) -> &str {
        &self.winner
    }

    pub fn loser(&self) -> &str {
        if self.winner == self.team1 {
            &self.team2
        } else {
            &self.team1
        }
    }
}

/// Result row as stored. `winner` is informational; the scores decide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultRow {
    pub round: String,
    pub conference: String,
    #[serde(alias = "matchupId")]
    pub matchup_id: i64,
    pub team1: String,
    pub team2: String,
    pub score1: i64,
    pub score2: i64,
    #[serde(default)]
    pub winner: Option<String>,
}

impl TryFrom<ResultRow> for GameResult {
    type Error = BracketError;

    fn try_from(row: ResultRow) -> Result<Self> {
        let round: Round = row.round.parse()?;
        let result = GameResult::new(
            round,
            row.conference,
            row.matchup_id,
            row.team1,
            row.team2,
            row.score1,
            row.score2,
        )?;

        if let Some(stored) = row.winner.as_deref() {
            if stored != result.winner() {
                warn!(
                    key = ?result.key(),
                    stored,
                    derived = result.winner(),
                    "stored winner disagrees with score, using score"
                );
            }
        }

        Ok(result)
    }
}

/// Immutable snapshot of every recorded result, keyed by matchup.
///
/// `version` is supplied by the caller and must grow whenever the stored
/// result set changes; recompute stamps it on every score it emits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultIndex {
    results: BTreeMap<ResultKey, GameResult>,
    version: u64,
}

impl ResultIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from stored rows, later rows replacing earlier ones with the same key.
    ///
    /// Rows that cannot enter the index (unknown round, tie, champion round)
    /// are skipped with a warning.
    pub fn from_rows(rows: impl IntoIterator<Item = ResultRow>) -> Self {
        let mut index = Self::default();
        for row in rows {
            match GameResult::try_from(row) {
                Ok(result) => index.upsert(result),
                Err(e) => warn!(error = %e, "skipping result row"),
            }
        }
        debug!(results = index.len(), "built result index");
        index
    }

    pub fn from_results(results: impl IntoIterator<Item = GameResult>) -> Self {
        let mut index = Self::default();
        for result in results {
            index.upsert(result);
        }
        index
    }

    /// Parse a JSON array of result rows.
    pub fn from_json(json: &str) -> Result<Self> {
        let rows: Vec<ResultRow> = serde_json::from_str(json)?;
        Ok(Self::from_rows(rows))
    }

    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Validate and insert a raw row, replacing any result with the same key.
    pub fn try_insert(&mut self, row: ResultRow) -> Result<&GameResult> {
        let result = GameResult::try_from(row)?;
        let key = result.key();
        self.upsert(result);
        Ok(&self.results[&key])
    }

    pub fn upsert(&mut self, result: GameResult) {
        self.results.insert(result.key(), result);
    }

    pub fn get(&self, key: &ResultKey) -> Option<&GameResult> {
        self.results.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameResult> {
        self.results.values()
    }

    /// Results paired with their wire key, in index order.
    pub fn iter_keyed(&self) -> impl Iterator<Item = (String, &GameResult)> {
        self.results.iter().map(|(key, result)| (key.to_string(), result))
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

struct KeyedResults<'a>(&'a ResultIndex);

impl Serialize for KeyedResults<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter_keyed())
    }
}

/// Serializes as `{ "results": { "<round>-<conference>-<matchupId>": result, .. }, "count": n }`.
impl Serialize for ResultIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ResultIndex", 2)?;
        state.serialize_field("results", &KeyedResults(self))?;
        state.serialize_field("count", &self.len())?;
        state.end()
    }
}
