use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::REQUIRED_PICKS;
use crate::error::BracketError;

/// Playoff stage, ordered from first played to the final pick.
///
/// `Champion` is never played: it is the pick slot for the winner of the
/// `SuperBowl` round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Round {
    Wildcard,
    Divisional,
    Conference,
    #[serde(rename = "sb")]
    SuperBowl,
    Champion,
}

impl Round {
    pub const ALL: [Round; 5] = [
        Round::Wildcard,
        Round::Divisional,
        Round::Conference,
        Round::SuperBowl,
        Round::Champion,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Wire name as stored in pick and result rows.
    pub fn as_str(self) -> &'static str {
        match self {
            Round::Wildcard => "wildcard",
            Round::Divisional => "divisional",
            Round::Conference => "conference",
            Round::SuperBowl => "sb",
            Round::Champion => "champion",
        }
    }

    /// Number of distinct teams a complete bracket names in this round.
    pub fn required_count(self) -> usize {
        REQUIRED_PICKS[self.index()]
    }

    pub fn next(self) -> Option<Round> {
        match self {
            Round::Wildcard => Some(Round::Divisional),
            Round::Divisional => Some(Round::Conference),
            Round::Conference => Some(Round::SuperBowl),
            Round::SuperBowl => Some(Round::Champion),
            Round::Champion => None,
        }
    }

    /// Round in which the winner of a game played in `self` must be picked.
    ///
    /// A wildcard winner shows up as a divisional pick, and so on. The
    /// champion round is never played, so it has no target.
    pub fn advancement_target(self) -> Option<Round> {
        self.next()
    }

    pub fn is_first(self) -> bool {
        self == Round::Wildcard
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Round {
    type Err = BracketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "wildcard" => Ok(Round::Wildcard),
            "divisional" => Ok(Round::Divisional),
            "conference" => Ok(Round::Conference),
            "sb" => Ok(Round::SuperBowl),
            "champion" => Ok(Round::Champion),
            other => Err(BracketError::UnknownRound(other.to_string())),
        }
    }
}
