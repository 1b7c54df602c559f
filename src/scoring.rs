#[cfg(feature = "python")]
use pyo3::prelude::*;
use serde::Serialize;

use crate::completeness::is_complete;
use crate::pick::PickSet;
use crate::policy::ScoringPolicy;
use crate::result::ResultIndex;

/// Score and survival of one bracket against the results known so far.
#[cfg_attr(feature = "python", pyclass(get_all))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BracketEvaluation {
    pub score: u32,

    /// No recorded result has contradicted a pick yet.
    pub alive: bool,

    /// No first-round result has contradicted a pick.
    pub alive_after_first_round: bool,

    pub is_complete: bool,
}

#[cfg(feature = "python")]
#[pymethods]
impl BracketEvaluation {
    fn __repr__(&self) -> String {
        format!(
            "BracketEvaluation(score={}, alive={}, alive_after_first_round={}, is_complete={})",
            self.score, self.alive, self.alive_after_first_round, self.is_complete
        )
    }
}

/// Evaluate a bracket against every recorded result.
///
/// Each result is visited once: if the bracket picked its winner in the
/// round the winner advances to, the result's round points are added;
/// otherwise the bracket is no longer alive. Games not yet played neither
/// score nor eliminate. Incomplete brackets are never alive, but keep their
/// raw score.
pub fn evaluate(picks: &PickSet, results: &ResultIndex, policy: &ScoringPolicy) -> BracketEvaluation {
    let mut score: u32 = 0;
    let mut alive = true;
    let mut alive_after_first_round = true;

    for result in results.iter() {
        let Some(target) = result.round.advancement_target() else {
            continue;
        };

        if picks.contains(target, result.winner()) {
            score = score.saturating_add(policy.points_for(result.round));
        } else {
            alive = false;
            if result.round.is_first() {
                alive_after_first_round = false;
            }
        }
    }

    let is_complete = is_complete(picks);
    if !is_complete {
        alive = false;
        alive_after_first_round = false;
    }

    BracketEvaluation {
        score,
        alive,
        alive_after_first_round,
        is_complete,
    }
}

/// Sum of round points over every recorded result; the best score any
/// bracket can have right now. Saturates at `u32::MAX`, like `evaluate`.
pub fn total_possible_points(results: &ResultIndex, policy: &ScoringPolicy) -> u32 {
    results
        .iter()
        .fold(0u32, |total, r| total.saturating_add(policy.points_for(r.round)))
}
