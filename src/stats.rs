//! Pick popularity across the whole bracket population.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::bracket::Bracket;
use crate::pick::{ConferenceId, TeamCode};
use crate::policy::ScoringPolicy;
use crate::result::ResultIndex;
use crate::round::Round;
use crate::scoring::evaluate;

/// Two teams meeting in `round`. Their popularity is measured by how often
/// each is picked in the following round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pairing {
    pub round: Round,
    pub conference: ConferenceId,
    pub teams: [TeamCode; 2],
}

/// Known pairings for one tournament edition, e.g. wild-card games by seed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchupTable {
    pub edition: Option<String>,
    pub pairings: Vec<Pairing>,
}

impl MatchupTable {
    pub fn new(edition: impl Into<String>) -> Self {
        MatchupTable {
            edition: Some(edition.into()),
            pairings: Vec::new(),
        }
    }

    pub fn with_pairing(mut self, round: Round, conference: impl Into<ConferenceId>, team1: &str, team2: &str) -> Self {
        self.pairings.push(Pairing {
            round,
            conference: conference.into(),
            teams: [team1.to_string(), team2.to_string()],
        });
        self
    }
}

/// Share of brackets picking one team for a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TeamShare {
    pub count: usize,
    pub percentage: u32,
}

/// Head-to-head split for one pairing; percentages are relative to the
/// brackets that advanced either team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchupStats {
    pub round: Round,
    pub conference: ConferenceId,
    pub index: usize,
    pub percentages: BTreeMap<TeamCode, u32>,
    pub total: usize,
}

/// Teams picked for one `(round, conference, slot)` group, as a share of
/// all brackets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotStats {
    pub round: Round,
    pub conference: Option<ConferenceId>,
    pub slot: Option<u32>,
    pub teams: BTreeMap<TeamCode, TeamShare>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PickStats {
    pub total_brackets: usize,
    pub matchups: Vec<MatchupStats>,
    pub slots: Vec<SlotStats>,

    /// Brackets naming each team in each round.
    pub round_counts: BTreeMap<Round, BTreeMap<TeamCode, usize>>,

    /// Champion picks as a share of all brackets.
    pub champion: BTreeMap<TeamCode, u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AliveSummary {
    pub total_brackets: usize,
    pub alive_brackets: usize,
    pub alive_percentage: u32,
}

/// `100 * count / total` rounded half up. `total` must be non-zero.
fn percentage(count: usize, total: usize) -> u32 {
    ((200 * count + total) / (2 * total)) as u32
}

type SlotKey = (Round, Option<ConferenceId>, Option<u32>);

/// Tally pick popularity over every bracket.
///
/// A bracket counts at most once per team in a round or slot. With no
/// brackets every table is empty.
pub fn aggregate(brackets: &[Bracket], matchups: &MatchupTable) -> PickStats {
    let total = brackets.len();
    if total == 0 {
        return PickStats::default();
    }

    let mut round_counts: BTreeMap<Round, BTreeMap<TeamCode, usize>> = BTreeMap::new();
    let mut slot_counts: BTreeMap<SlotKey, BTreeMap<TeamCode, usize>> = BTreeMap::new();

    for bracket in brackets {
        for round in Round::ALL {
            for team in bracket.picks.teams_in(round) {
                *round_counts.entry(round).or_default().entry(team.clone()).or_insert(0) += 1;
            }
        }

        let mut seen: BTreeMap<SlotKey, Vec<&str>> = BTreeMap::new();
        for pick in bracket.picks.iter() {
            let key = (pick.round, pick.conference.clone(), pick.slot);
            let teams = seen.entry(key).or_default();
            if !teams.contains(&pick.team.as_str()) {
                teams.push(&pick.team);
            }
        }
        for (key, teams) in seen {
            let counts = slot_counts.entry(key).or_default();
            for team in teams {
                *counts.entry(team.to_string()).or_insert(0) += 1;
            }
        }
    }

    let matchups = matchups
        .pairings
        .iter()
        .enumerate()
        .filter_map(|(index, pairing)| {
            let target = pairing.round.advancement_target()?;
            let picked = round_counts.get(&target);
            let count = |team: &str| picked.and_then(|c| c.get(team)).copied().unwrap_or(0);
            Some(matchup_stats(index, pairing, count(pairing.teams[0].as_str()), count(pairing.teams[1].as_str())))
        })
        .collect();

    let slots = slot_counts
        .into_iter()
        .map(|((round, conference, slot), counts)| SlotStats {
            round,
            conference,
            slot,
            teams: counts
                .into_iter()
                .map(|(team, count)| {
                    let share = TeamShare {
                        count,
                        percentage: percentage(count, total),
                    };
                    (team, share)
                })
                .collect(),
        })
        .collect();

    let champion = round_counts
        .get(&Round::Champion)
        .map(|counts| {
            counts
                .iter()
                .map(|(team, &count)| (team.clone(), percentage(count, total)))
                .collect()
        })
        .unwrap_or_default();

    debug!(brackets = total, "aggregated pick stats");

    PickStats {
        total_brackets: total,
        matchups,
        slots,
        round_counts,
        champion,
    }
}

/// Each side is rounded on its own. Both sides can only land on exactly .5
/// together, and then the side with fewer picks gives up the extra point, so
/// the pair sums to 100 whichever order the pairing lists its teams.
fn matchup_stats(index: usize, pairing: &Pairing, count1: usize, count2: usize) -> MatchupStats {
    let total = count1 + count2;
    let (mut pct1, mut pct2) = if total > 0 {
        (percentage(count1, total), percentage(count2, total))
    } else {
        (0, 0)
    };
    if pct1 + pct2 > 100 {
        // counts differ here: equal counts split exactly 50/50
        if count1 < count2 {
            pct1 -= 1;
        } else {
            pct2 -= 1;
        }
    }

    let [team1, team2] = &pairing.teams;
    MatchupStats {
        round: pairing.round,
        conference: pairing.conference.clone(),
        index,
        percentages: BTreeMap::from([(team1.clone(), pct1), (team2.clone(), pct2)]),
        total,
    }
}

/// How many brackets survive the results so far.
///
/// With no brackets the percentage is 100: nothing has been falsified.
pub fn alive_summary(brackets: &[Bracket], results: &ResultIndex, policy: &ScoringPolicy) -> AliveSummary {
    let total = brackets.len();
    let alive = brackets
        .par_iter()
        .filter(|b| evaluate(&b.picks, results, policy).alive)
        .count();

    AliveSummary {
        total_brackets: total,
        alive_brackets: alive,
        alive_percentage: if total > 0 { percentage(alive, total) } else { 100 },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completeness::tests::sample_bracket;
    use crate::pick::{Pick, PickSet};
    use crate::scoring::tests::wildcard;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn bracket(id: i64, picks: Vec<Pick>) -> Bracket {
        let at = Utc.with_ymd_and_hms(2026, 1, 8, 12, 0, 0).unwrap();
        Bracket::new(id, "p", PickSet::from_picks(picks), at)
    }

    fn afc_table() -> MatchupTable {
        MatchupTable::new("2025-26")
            .with_pairing(Round::Wildcard, "AFC", "NE", "LAC")
            .with_pairing(Round::Wildcard, "AFC", "JAX", "BUF")
    }

    #[test]
    fn test_empty_population() {
        let stats = aggregate(&[], &afc_table());
        assert_eq!(stats, PickStats::default());
        assert!(stats.matchups.is_empty());
        assert!(stats.champion.is_empty());
    }

    #[test]
    fn test_matchup_relative_percentages() {
        let brackets = vec![
            bracket(1, vec![Pick::new(Round::Divisional, "NE")]),
            bracket(2, vec![Pick::new(Round::Divisional, "NE")]),
            bracket(3, vec![Pick::new(Round::Divisional, "LAC")]),
            bracket(4, vec![Pick::new(Round::Champion, "SEA")]),
        ];
        let stats = aggregate(&brackets, &afc_table());

        let ne_lac = &stats.matchups[0];
        assert_eq!(ne_lac.total, 3);
        assert_eq!(ne_lac.percentages["NE"], 67);
        assert_eq!(ne_lac.percentages["LAC"], 33);

        let jax_buf = &stats.matchups[1];
        assert_eq!(jax_buf.total, 0);
        assert_eq!(jax_buf.percentages["JAX"], 0);
        assert_eq!(jax_buf.percentages["BUF"], 0);
    }

    #[test]
    fn test_half_up_pair_still_sums_to_100() {
        let mut brackets: Vec<_> = (0..7).map(|i| bracket(i, vec![Pick::new(Round::Divisional, "LAC")])).collect();
        brackets.push(bracket(7, vec![Pick::new(Round::Divisional, "NE")]));

        let stats = aggregate(&brackets, &afc_table());
        let split = &stats.matchups[0].percentages;
        assert_eq!(split["NE"], 12);
        assert_eq!(split["LAC"], 88);
    }

    #[test]
    fn test_matchup_split_ignores_pairing_order() {
        let mut brackets: Vec<_> = (0..7).map(|i| bracket(i, vec![Pick::new(Round::Divisional, "LAC")])).collect();
        brackets.push(bracket(7, vec![Pick::new(Round::Divisional, "NE")]));
        brackets.push(bracket(8, vec![Pick::new(Round::Divisional, "BUF")]));

        let listed = aggregate(&brackets, &afc_table());
        let swapped = aggregate(
            &brackets,
            &MatchupTable::new("2025-26")
                .with_pairing(Round::Wildcard, "AFC", "LAC", "NE")
                .with_pairing(Round::Wildcard, "AFC", "BUF", "JAX"),
        );

        for (a, b) in listed.matchups.iter().zip(&swapped.matchups) {
            assert_eq!(a.percentages, b.percentages);
            assert_eq!(a.total, b.total);
        }
        assert_eq!(swapped.matchups[1].percentages["BUF"], 100);
        assert_eq!(swapped.matchups[1].percentages["JAX"], 0);
    }

    #[test]
    fn test_champion_population_relative() {
        let brackets = vec![
            bracket(1, vec![Pick::new(Round::Champion, "SEA")]),
            bracket(2, vec![Pick::new(Round::Champion, "SEA")]),
            bracket(3, vec![Pick::new(Round::Champion, "NE")]),
            bracket(4, vec![]),
            bracket(5, vec![]),
            bracket(6, vec![]),
            bracket(7, vec![]),
            bracket(8, vec![]),
        ];
        let stats = aggregate(&brackets, &MatchupTable::default());

        assert_eq!(stats.total_brackets, 8);
        assert_eq!(stats.champion["SEA"], 25);
        // 12.5 rounds up
        assert_eq!(stats.champion["NE"], 13);
        assert_eq!(stats.round_counts[&Round::Champion]["SEA"], 2);
    }

    #[test]
    fn test_slot_groups() {
        let brackets = vec![
            bracket(1, vec![Pick::new(Round::Conference, "NE").in_conference("AFC").at_slot(0)]),
            bracket(2, vec![Pick::new(Round::Conference, "DEN").in_conference("AFC").at_slot(0)]),
            bracket(3, vec![Pick::new(Round::Conference, "NE").in_conference("AFC").at_slot(0)]),
        ];
        let stats = aggregate(&brackets, &MatchupTable::default());

        assert_eq!(stats.slots.len(), 1);
        let slot = &stats.slots[0];
        assert_eq!(slot.round, Round::Conference);
        assert_eq!(slot.slot, Some(0));
        assert_eq!(slot.teams["NE"], TeamShare { count: 2, percentage: 67 });
        assert_eq!(slot.teams["DEN"], TeamShare { count: 1, percentage: 33 });
    }

    #[test]
    fn test_aggregate_is_deterministic() {
        let brackets = vec![
            bracket(1, sample_bracket().iter().cloned().collect()),
            bracket(2, vec![Pick::new(Round::Divisional, "LAC"), Pick::new(Round::Champion, "NE")]),
        ];
        let first = serde_json::to_string(&aggregate(&brackets, &afc_table())).unwrap();
        let second = serde_json::to_string(&aggregate(&brackets, &afc_table())).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_alive_summary() {
        let brackets = vec![
            bracket(1, sample_bracket().iter().cloned().collect()),
            bracket(2, vec![Pick::new(Round::Divisional, "LAC")]),
            bracket(3, sample_bracket().iter().cloned().collect()),
        ];
        let index = ResultIndex::from_results(vec![wildcard(0, "NE", "LAC")]);
        let summary = alive_summary(&brackets, &index, &ScoringPolicy::flat());

        assert_eq!(summary.alive_brackets, 2);
        assert_eq!(summary.alive_percentage, 67);

        let empty = alive_summary(&[], &index, &ScoringPolicy::flat());
        assert_eq!(empty.alive_percentage, 100);
    }

    const TEAMS: [&str; 4] = ["NE", "LAC", "JAX", "BUF"];

    proptest! {
        #[test]
        fn prop_percentages_bounded(picks in prop::collection::vec(
            prop::collection::vec((0usize..5, 0usize..TEAMS.len()), 0..6), 0..30)
        ) {
            let brackets: Vec<Bracket> = picks
                .into_iter()
                .enumerate()
                .map(|(i, raw)| {
                    bracket(i as i64, raw.into_iter().map(|(r, t)| Pick::new(Round::ALL[r], TEAMS[t])).collect())
                })
                .collect();
            let stats = aggregate(&brackets, &afc_table());

            for matchup in &stats.matchups {
                let sum: u32 = matchup.percentages.values().sum();
                prop_assert!(matchup.percentages.values().all(|&p| p <= 100));
                if matchup.total > 0 {
                    prop_assert_eq!(sum, 100);
                } else {
                    prop_assert_eq!(sum, 0);
                }
            }
            for slot in &stats.slots {
                prop_assert!(slot.teams.values().all(|s| s.percentage <= 100));
            }
            prop_assert!(stats.champion.values().all(|&p| p <= 100));
        }
    }
}
