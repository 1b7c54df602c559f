use bracket_core::{
    aggregate, build_leaderboard, evaluate, recompute_all, Bracket, GameResult, MatchupTable, Pick, PickSet,
    ResultIndex, Round, ScoringPolicy,
};
use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const AFC: [&str; 7] = ["DEN", "NE", "JAX", "PIT", "HOU", "BUF", "LAC"];
const NFC: [&str; 7] = ["SEA", "CHI", "PHI", "CAR", "LAR", "SF", "GB"];

/// Random complete bracket: each later round is a subset of the previous one.
fn random_picks<R: Rng>(rng: &mut R) -> PickSet {
    let mut picks = Vec::new();
    let mut finalists = Vec::new();

    for (conference, teams) in [("AFC", AFC), ("NFC", NFC)] {
        let mut divisional: Vec<&str> = teams[1..].choose_multiple(rng, 3).copied().collect();
        divisional.push(teams[0]);
        let conference_round: Vec<&str> = divisional.choose_multiple(rng, 2).copied().collect();
        let sb = *conference_round.choose(rng).unwrap();

        picks.extend(divisional[..3].iter().map(|t| Pick::new(Round::Divisional, *t).in_conference(conference)));
        picks.extend(conference_round.iter().map(|t| Pick::new(Round::Conference, *t).in_conference(conference)));
        picks.push(Pick::new(Round::SuperBowl, sb).in_conference(conference));
        finalists.push(sb);
    }
    picks.push(Pick::new(Round::Champion, *finalists.choose(rng).unwrap()));

    PickSet::from_picks(picks)
}

fn create_population(n: usize) -> Vec<Bracket> {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let start = Utc.with_ymd_and_hms(2026, 1, 8, 12, 0, 0).unwrap();

    (0..n)
        .map(|i| {
            let picks = random_picks(&mut rng);
            Bracket::new(i as i64, format!("user{}", i), picks, start + Duration::seconds(rng.gen_range(0..86_400)))
        })
        .collect()
}

fn create_wildcard_results() -> ResultIndex {
    let games = [
        ("AFC", "NE", "LAC"),
        ("AFC", "BUF", "JAX"),
        ("AFC", "HOU", "PIT"),
        ("NFC", "CHI", "GB"),
        ("NFC", "SF", "PHI"),
        ("NFC", "LAR", "CAR"),
    ];
    ResultIndex::from_results(games.iter().enumerate().map(|(i, (conf, winner, loser))| {
        GameResult::new(Round::Wildcard, *conf, i as i64 % 3, *winner, *loser, 24, 17).unwrap()
    }))
}

fn create_matchups() -> MatchupTable {
    MatchupTable::new("2025-26")
        .with_pairing(Round::Wildcard, "AFC", "NE", "LAC")
        .with_pairing(Round::Wildcard, "AFC", "JAX", "BUF")
        .with_pairing(Round::Wildcard, "AFC", "PIT", "HOU")
        .with_pairing(Round::Wildcard, "NFC", "CHI", "GB")
        .with_pairing(Round::Wildcard, "NFC", "PHI", "SF")
        .with_pairing(Round::Wildcard, "NFC", "CAR", "LAR")
}

fn bench_evaluate(c: &mut Criterion) {
    let bracket = create_population(1).remove(0);
    let results = create_wildcard_results();
    let policy = ScoringPolicy::flat();

    c.bench_function("evaluate_single_bracket", |b| {
        b.iter(|| evaluate(black_box(&bracket.picks), black_box(&results), &policy))
    });
}

fn bench_leaderboard(c: &mut Criterion) {
    let brackets = create_population(10_000);
    let results = create_wildcard_results();
    let policy = ScoringPolicy::flat();

    c.bench_function("leaderboard_10k_brackets", |b| {
        b.iter(|| build_leaderboard(black_box(&brackets), black_box(&results), &policy))
    });
}

fn bench_recompute(c: &mut Criterion) {
    let brackets = create_population(10_000);
    let results = create_wildcard_results().with_version(1);
    let policy = ScoringPolicy::doubling();

    c.bench_function("recompute_10k_brackets", |b| {
        b.iter(|| recompute_all(black_box(&brackets), black_box(&results), &policy))
    });
}

fn bench_aggregate(c: &mut Criterion) {
    let brackets = create_population(10_000);
    let matchups = create_matchups();

    c.bench_function("aggregate_10k_brackets", |b| {
        b.iter(|| aggregate(black_box(&brackets), black_box(&matchups)))
    });
}

criterion_group!(benches, bench_evaluate, bench_leaderboard, bench_recompute, bench_aggregate);
criterion_main!(benches);
