use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use std::cmp::Ordering;
use tracing::debug;

use crate::bracket::{Bracket, BracketId};
use crate::pick::PickSet;
use crate::policy::ScoringPolicy;
use crate::result::ResultIndex;
use crate::scoring::{evaluate, total_possible_points, BracketEvaluation};

/// One ranked bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub id: BracketId,
    pub creator: String,
    pub created_at: DateTime<Utc>,
    pub score: u32,
    pub alive: bool,
    pub alive_after_first_round: bool,
    pub picks: PickSet,

    /// Stored score at read time. Ranking never uses it.
    pub cached_score: Option<u32>,
}

impl LeaderboardEntry {
    fn new(bracket: &Bracket, eval: BracketEvaluation) -> Self {
        LeaderboardEntry {
            id: bracket.id,
            creator: bracket.creator.clone(),
            created_at: bracket.created_at,
            score: eval.score,
            alive: eval.alive,
            alive_after_first_round: eval.alive_after_first_round,
            picks: bracket.picks.clone(),
            cached_score: bracket.cached_score,
        }
    }
}

/// Ranked complete brackets plus population summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
    pub total_qualified: usize,
    pub total_possible_points: u32,
    pub alive_count: usize,

    /// Results recorded so far.
    pub total_matches: usize,
}

/// Score descending, then earlier submission, then lower id.
pub fn rank_order(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

/// Evaluate every bracket and rank the complete ones.
///
/// Incomplete brackets and those under the policy's minimum score are left
/// out. Inputs are not modified.
pub fn build_leaderboard(brackets: &[Bracket], results: &ResultIndex, policy: &ScoringPolicy) -> Leaderboard {
    let mut entries: Vec<LeaderboardEntry> = brackets
        .par_iter()
        .filter_map(|bracket| {
            let eval = evaluate(&bracket.picks, results, policy);
            if !eval.is_complete || !policy.qualifies(eval.score) {
                return None;
            }
            if bracket.cached_score.is_some_and(|cached| cached != eval.score) {
                debug!(id = bracket.id, cached = ?bracket.cached_score, fresh = eval.score, "cached score is stale");
            }
            Some(LeaderboardEntry::new(bracket, eval))
        })
        .collect();

    entries.sort_by(rank_order);

    let alive_count = entries.iter().filter(|e| e.alive).count();
    debug!(
        brackets = brackets.len(),
        qualified = entries.len(),
        alive = alive_count,
        "built leaderboard"
    );

    Leaderboard {
        total_qualified: entries.len(),
        total_possible_points: total_possible_points(results, policy),
        alive_count,
        total_matches: results.len(),
        entries,
    }
}
