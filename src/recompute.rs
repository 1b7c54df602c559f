use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, info};

use crate::bracket::{Bracket, BracketId};
use crate::policy::ScoringPolicy;
use crate::result::ResultIndex;
use crate::scoring::evaluate;

/// Fresh score for one bracket, stamped with the result-set version it was
/// computed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UpdatedScore {
    pub bracket_id: BracketId,
    pub score: u32,
    pub results_version: u64,
}

/// Score for every bracket, in input order. Pure; writing is the caller's job.
pub fn recompute_all(brackets: &[Bracket], results: &ResultIndex, policy: &ScoringPolicy) -> Vec<UpdatedScore> {
    brackets
        .par_iter()
        .map(|bracket| UpdatedScore {
            bracket_id: bracket.id,
            score: evaluate(&bracket.picks, results, policy).score,
            results_version: results.version(),
        })
        .collect()
}

/// Storage seam for cached scores.
///
/// Implementations must serialize writes per bracket id and drop a write
/// whose `results_version` is older than the one already stored.
pub trait ScoreStore {
    /// Returns whether the write was applied.
    fn write_score(&self, update: UpdatedScore) -> bool;
}

/// Recompute every bracket and hand the scores to `store`.
///
/// Returns the number of writes the store applied.
pub fn recompute_into<S: ScoreStore + Sync>(
    brackets: &[Bracket],
    results: &ResultIndex,
    policy: &ScoringPolicy,
    store: &S,
) -> usize {
    let updates = recompute_all(brackets, results, policy);
    let applied = updates.par_iter().filter(|&&update| store.write_score(update)).count();

    info!(
        brackets = brackets.len(),
        applied,
        version = results.version(),
        "recomputed scores"
    );
    applied
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StoredScore {
    score: u32,
    results_version: u64,
}

/// In-memory score store with per-id version checks.
#[derive(Debug, Default)]
pub struct MemoryScoreStore {
    scores: Mutex<HashMap<BracketId, StoredScore>>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self, id: BracketId) -> Option<u32> {
        self.lock().get(&id).map(|s| s.score)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy stored scores onto the matching brackets.
    pub fn apply_to(&self, brackets: &mut [Bracket]) {
        let scores = self.lock();
        for bracket in brackets {
            if let Some(stored) = scores.get(&bracket.id) {
                bracket.cached_score = Some(stored.score);
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<BracketId, StoredScore>> {
        // A panic while holding the lock cannot leave a half-written entry.
        self.scores.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ScoreStore for MemoryScoreStore {
    fn write_score(&self, update: UpdatedScore) -> bool {
        let mut scores = self.lock();
        match scores.get(&update.bracket_id) {
            Some(stored) if stored.results_version > update.results_version => {
                debug!(
                    id = update.bracket_id,
                    stored = stored.results_version,
                    incoming = update.results_version,
                    "dropping stale score"
                );
                false
            }
            _ => {
                scores.insert(
                    update.bracket_id,
                    StoredScore {
                        score: update.score,
                        results_version: update.results_version,
                    },
                );
                true
            }
        }
    }
}
