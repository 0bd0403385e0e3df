//! Hunter progression: experience, level and rank tier.
//!
//! Pure functions only. The store calls `apply_experience_gain` inside the
//! same transaction that persists the result.
//!
//! Policy: one award, at most one level-up. Experience resets to zero on a
//! level-up rather than carrying the remainder. With a 10 point award and a
//! threshold of `level × 100` a single award can never cross two thresholds,
//! so this matches a cascading rule for every reachable state.

use serde::Serialize;

use crate::models::hunter::{Hunter, Rank};

/// Experience granted per qualifying event (résumé creation).
pub const EXPERIENCE_PER_RESUME: i32 = 10;
pub const MAX_LEVEL: i32 = 100;

/// Level breakpoints, highest first. Levels below the last entry are E-Rank.
const RANK_BREAKPOINTS: &[(i32, Rank)] = &[
    (80, Rank::SSS),
    (60, Rank::S),
    (40, Rank::A),
    (25, Rank::B),
    (15, Rank::C),
    (8, Rank::D),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progression {
    pub level: i32,
    pub experience: i32,
    pub rank: Rank,
}

impl Progression {
    pub fn initial() -> Self {
        Progression {
            level: 1,
            experience: 0,
            rank: Rank::E,
        }
    }

    pub fn of(hunter: &Hunter) -> Self {
        Progression {
            level: hunter.level,
            experience: hunter.experience,
            rank: hunter.rank,
        }
    }
}

/// Experience needed to leave `level`.
pub fn level_threshold(level: i32) -> i32 {
    level * 100
}

pub fn rank_for_level(level: i32) -> Rank {
    RANK_BREAKPOINTS
        .iter()
        .find(|(min_level, _)| level >= *min_level)
        .map_or(Rank::E, |(_, rank)| *rank)
}

/// Applies one qualifying award. Level is capped at `MAX_LEVEL`; past the cap
/// experience keeps accumulating.
pub fn apply_experience_gain(current: Progression) -> Progression {
    let mut level = current.level;
    let mut experience = current.experience.saturating_add(EXPERIENCE_PER_RESUME);

    if level < MAX_LEVEL && experience >= level_threshold(level) {
        level += 1;
        experience = 0;
    }

    Progression {
        level,
        experience,
        rank: rank_for_level(level),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn at(level: i32, experience: i32) -> Progression {
        Progression {
            level,
            experience,
            rank: rank_for_level(level),
        }
    }

    #[test]
    fn test_first_award_from_initial() {
        let next = apply_experience_gain(Progression::initial());
        assert_eq!(next, at(1, 10));
    }

    #[test]
    fn test_ten_awards_reach_level_two() {
        let mut p = Progression::initial();
        for _ in 0..9 {
            p = apply_experience_gain(p);
        }
        assert_eq!(p, at(1, 90));

        p = apply_experience_gain(p);
        assert_eq!(p.level, 2);
        assert_eq!(p.experience, 0);
        assert_eq!(p.rank, Rank::E);
    }

    #[test]
    fn test_rank_breakpoints() {
        assert_eq!(rank_for_level(1), Rank::E);
        assert_eq!(rank_for_level(7), Rank::E);
        assert_eq!(rank_for_level(8), Rank::D);
        assert_eq!(rank_for_level(14), Rank::D);
        assert_eq!(rank_for_level(15), Rank::C);
        assert_eq!(rank_for_level(25), Rank::B);
        assert_eq!(rank_for_level(40), Rank::A);
        assert_eq!(rank_for_level(60), Rank::S);
        assert_eq!(rank_for_level(79), Rank::S);
        assert_eq!(rank_for_level(80), Rank::SSS);
        assert_eq!(rank_for_level(100), Rank::SSS);
    }

    #[test]
    fn test_level_up_into_d_rank() {
        let next = apply_experience_gain(at(7, 690));
        assert_eq!(next, at(8, 0));
        assert_eq!(next.rank, Rank::D);
    }

    #[test]
    fn test_max_level_is_a_ceiling() {
        let next = apply_experience_gain(at(MAX_LEVEL, level_threshold(MAX_LEVEL)));
        assert_eq!(next.level, MAX_LEVEL);
        assert_eq!(next.experience, level_threshold(MAX_LEVEL) + EXPERIENCE_PER_RESUME);
        assert_eq!(next.rank, Rank::SSS);
    }

    proptest! {
        #[test]
        fn prop_award_levels_up_iff_threshold_met(level in 1..MAX_LEVEL, experience in 0..10_000i32) {
            let next = apply_experience_gain(at(level, experience));
            if experience + EXPERIENCE_PER_RESUME >= level_threshold(level) {
                prop_assert_eq!(next.level, level + 1);
                prop_assert_eq!(next.experience, 0);
            } else {
                prop_assert_eq!(next.level, level);
                prop_assert_eq!(next.experience, experience + EXPERIENCE_PER_RESUME);
            }
            prop_assert_eq!(next.rank, rank_for_level(next.level));
        }

        #[test]
        fn prop_rank_is_monotonic_in_level(a in 1..=MAX_LEVEL, b in 1..=MAX_LEVEL) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(rank_for_level(low) <= rank_for_level(high));
        }

        #[test]
        fn prop_award_never_lowers_level_or_rank(level in 1..=MAX_LEVEL, experience in 0..20_000i32) {
            let before = at(level, experience);
            let after = apply_experience_gain(before);
            prop_assert!(after.level >= before.level);
            prop_assert!(after.rank >= before.rank);
            prop_assert!(after.level <= MAX_LEVEL);
        }
    }
}
