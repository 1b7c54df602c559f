#[cfg(feature = "python")]
use pyo3::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constants::{DOUBLING_POINTS, FLAT_POINTS};
use crate::round::Round;

/// Points awarded per correctly advanced team, plus leaderboard cutoffs.
///
/// `points[i]` is the reward for picking the winner of a game played in
/// round `i` (wildcard = 0). Rounds past the end of the table are worth 0.
#[cfg_attr(feature = "python", pyclass)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    pub points: Vec<u32>,

    /// Complete brackets scoring below this are left off the leaderboard.
    #[cfg_attr(feature = "python", pyo3(get, set))]
    pub min_leaderboard_score: Option<u32>,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self::flat()
    }
}

impl ScoringPolicy {
    /// One point per correct advancement regardless of round.
    pub fn flat() -> Self {
        Self::from_points(&FLAT_POINTS)
    }

    /// 1/2/4/8 by the round the result was played in.
    pub fn doubling() -> Self {
        Self::from_points(&DOUBLING_POINTS)
    }

    pub fn from_points(points: &[u32]) -> Self {
        ScoringPolicy {
            points: points.to_vec(),
            min_leaderboard_score: None,
        }
    }

    pub fn with_min_leaderboard_score(mut self, min_score: u32) -> Self {
        self.min_leaderboard_score = Some(min_score);
        self
    }

    /// Reward for picking the winner of a game played in `round`.
    pub fn points_for(&self, round: Round) -> u32 {
        self.points.get(round.index()).copied().unwrap_or(0)
    }

    /// Whether a complete bracket with `score` is shown on the leaderboard.
    pub fn qualifies(&self, score: u32) -> bool {
        self.min_leaderboard_score.map_or(true, |min| score >= min)
    }
}

#[cfg(feature = "python")]
#[pymethods]
impl ScoringPolicy {
    #[new]
    #[pyo3(signature = (points = None, min_leaderboard_score = None))]
    fn py_new(points: Option<Vec<u32>>, min_leaderboard_score: Option<u32>) -> Self {
        let mut policy = match points {
            Some(points) => Self::from_points(&points),
            None => Self::flat(),
        };
        policy.min_leaderboard_score = min_leaderboard_score;
        policy
    }

    #[staticmethod]
    #[pyo3(name = "doubling")]
    fn py_doubling() -> Self {
        Self::doubling()
    }

    #[getter]
    fn points(&self) -> Vec<u32> {
        self.points.clone()
    }

    fn __repr__(&self) -> String {
        format!(
            "ScoringPolicy(points={:?}, min_leaderboard_score={:?})",
            self.points, self.min_leaderboard_score
        )
    }
}
