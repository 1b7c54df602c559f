/// Creator name used when a bracket was submitted without a creator.
pub const ANONYMOUS_CREATOR: &str = "Anonymous";

/// Distinct teams a complete bracket must name per round, in round order
/// (wildcard, divisional, conference, sb, champion).
pub const REQUIRED_PICKS: [usize; 5] = [0, 6, 4, 2, 1];

/// Points per correctly advanced team, indexed by the round the result was played in.
pub const FLAT_POINTS: [u32; 5] = [1, 1, 1, 1, 0];

/// Doubling scheme: each later round is worth twice the previous one.
pub const DOUBLING_POINTS: [u32; 5] = [1, 2, 4, 8, 0];
