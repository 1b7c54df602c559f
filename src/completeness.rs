use std::collections::BTreeMap;

use crate::pick::PickSet;
use crate::round::Round;

/// Whether the bracket names enough distinct teams in every round to be ranked.
///
/// The champion requirement of one pick is part of the round table, so a
/// bracket without a champion is never complete.
pub fn is_complete(picks: &PickSet) -> bool {
    Round::ALL
        .iter()
        .all(|&round| picks.distinct_count(round) >= round.required_count())
}

/// Picks still missing per round. Empty when the bracket is complete.
pub fn missing_picks(picks: &PickSet) -> BTreeMap<Round, usize> {
    Round::ALL
        .iter()
        .filter_map(|&round| {
            let missing = round.required_count().saturating_sub(picks.distinct_count(round));
            (missing > 0).then_some((round, missing))
        })
        .collect()
}
