//! Bracket Core - scoring, ranking and pick statistics for playoff bracket pools.
//!
//! Every operation is a pure function over a snapshot of brackets and
//! results. Python bindings are available behind the `python` feature.

pub mod bracket;
pub mod completeness;
pub mod config;
pub mod constants;
pub mod error;
pub mod leaderboard;
pub mod pick;
pub mod policy;
#[cfg(feature = "python")]
mod python;
pub mod recompute;
pub mod result;
pub mod round;
pub mod scoring;
pub mod stats;

pub use bracket::{Bracket, BracketId, BracketRow};
pub use completeness::{is_complete, missing_picks};
pub use config::EngineConfig;
pub use error::{BracketError, ConfigError, Result};
pub use leaderboard::{build_leaderboard, Leaderboard, LeaderboardEntry};
pub use pick::{ConferenceId, Pick, PickSet, TeamCode};
pub use policy::ScoringPolicy;
pub use recompute::{recompute_all, recompute_into, MemoryScoreStore, ScoreStore, UpdatedScore};
pub use result::{GameResult, ResultIndex, ResultKey, ResultRow};
pub use round::Round;
pub use scoring::{evaluate, total_possible_points, BracketEvaluation};
pub use stats::{aggregate, alive_summary, AliveSummary, MatchupStats, MatchupTable, Pairing, PickStats, SlotStats, TeamShare};
