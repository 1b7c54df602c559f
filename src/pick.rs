use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

use crate::round::Round;

/// Short team code, e.g. "NE".
pub type TeamCode = String;

/// Conference code, e.g. "AFC".
pub type ConferenceId = String;

/// One prediction that `team` reaches `round`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pick {
    pub round: Round,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conference: Option<ConferenceId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<u32>,
    pub team: TeamCode,
}

impl Pick {
    pub fn new(round: Round, team: impl Into<TeamCode>) -> Self {
        Pick {
            round,
            conference: None,
            slot: None,
            team: team.into(),
        }
    }

    pub fn in_conference(mut self, conference: impl Into<ConferenceId>) -> Self {
        self.conference = Some(conference.into());
        self
    }

    pub fn at_slot(mut self, slot: u32) -> Self {
        self.slot = Some(slot);
        self
    }
}

/// Loose pick shape as submitted by clients. Only `round` and `team` are
/// required; anything else in the record is ignored.
///
/// Older clients send the slot as `matchupId`; when a record carries both,
/// `slot` wins.
#[derive(Debug, Deserialize)]
struct RawPick {
    round: String,
    #[serde(default)]
    conference: Option<String>,
    #[serde(default)]
    slot: Option<u32>,
    #[serde(default, rename = "matchupId", alias = "matchup_id")]
    matchup_id: Option<u32>,
    #[serde(default)]
    team: Option<String>,
}

/// Dedup key. Slotted picks collide on their slot; unslotted picks only
/// collide with an identical team.
type PickKey = (Round, Option<ConferenceId>, Option<u32>, Option<TeamCode>);

fn pick_key(pick: &Pick) -> PickKey {
    let team = match pick.slot {
        Some(_) => None,
        None => Some(pick.team.clone()),
    };
    (pick.round, pick.conference.clone(), pick.slot, team)
}

/// Normalized picks of one bracket.
///
/// At most one pick per `(round, conference, slot)`; a later pick for the
/// same slot replaces an earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Pick>", into = "Vec<Pick>")]
pub struct PickSet {
    picks: Vec<Pick>,
    teams: [BTreeSet<TeamCode>; 5],
}

impl PickSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_picks(picks: impl IntoIterator<Item = Pick>) -> Self {
        let mut by_key: BTreeMap<PickKey, Pick> = BTreeMap::new();
        for pick in picks {
            if let Some(previous) = by_key.insert(pick_key(&pick), pick) {
                let current = &by_key[&pick_key(&previous)];
                if current.team != previous.team {
                    warn!(
                        round = %previous.round,
                        replaced = %previous.team,
                        kept = %current.team,
                        "duplicate pick for slot, keeping the later one"
                    );
                }
            }
        }

        let mut teams: [BTreeSet<TeamCode>; 5] = Default::default();
        for pick in by_key.values() {
            teams[pick.round.index()].insert(pick.team.clone());
        }

        PickSet {
            picks: by_key.into_values().collect(),
            teams,
        }
    }

    /// Build from a stored predictions value.
    ///
    /// Anything that is not an array yields an empty set. Array elements
    /// with an unknown round, no team, or the wrong shape are dropped.
    pub fn from_value(value: &Value) -> Self {
        let Some(items) = value.as_array() else {
            warn!(kind = json_kind(value), "predictions are not a list, treating as empty");
            return Self::default();
        };

        let picks = items.iter().filter_map(|item| {
            let raw: RawPick = match RawPick::deserialize(item) {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(error = %e, "skipping malformed pick");
                    return None;
                }
            };
            let round = match raw.round.parse::<Round>() {
                Ok(round) => round,
                Err(e) => {
                    warn!(error = %e, "skipping pick");
                    return None;
                }
            };
            let team = raw.team.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())?;
            Some(Pick {
                round,
                conference: raw.conference,
                slot: raw.slot.or(raw.matchup_id),
                team,
            })
        });

        Self::from_picks(picks)
    }

    /// Whether the bracket names `team` anywhere in `round`.
    pub fn contains(&self, round: Round, team: &str) -> bool {
        self.teams[round.index()].contains(team)
    }

    /// Distinct teams named in `round`.
    pub fn teams_in(&self, round: Round) -> &BTreeSet<TeamCode> {
        &self.teams[round.index()]
    }

    pub fn distinct_count(&self, round: Round) -> usize {
        self.teams[round.index()].len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pick> {
        self.picks.iter()
    }

    pub fn len(&self) -> usize {
        self.picks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }
}

impl From<Vec<Pick>> for PickSet {
    fn from(picks: Vec<Pick>) -> Self {
        Self::from_picks(picks)
    }
}

impl From<PickSet> for Vec<Pick> {
    fn from(set: PickSet) -> Self {
        set.picks
    }
}

impl FromIterator<Pick> for PickSet {
    fn from_iter<I: IntoIterator<Item = Pick>>(iter: I) -> Self {
        Self::from_picks(iter)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
