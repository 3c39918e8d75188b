//! Reward deltas owed to the local player when a match ends

use serde::{Deserialize, Serialize};

use crate::game::Outcome;

/// Elo K-factor for XP transfer
pub const XP_K_FACTOR: f64 = 32.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RewardDelta {
    pub xp: i64,
    pub ark: i64,
}

impl RewardDelta {
    pub const ZERO: RewardDelta = RewardDelta { xp: 0, ark: 0 };

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

/// XP gained (or lost) against an opponent. Beating a stronger opponent earns
/// more; losing to a weaker one costs more.
pub fn xp_transfer(won: bool, local_xp: i64, opponent_xp: i64) -> i64 {
    let gap = opponent_xp.saturating_sub(local_xp) as f64;
    let expected = 1.0 / (1.0 + 10f64.powf(gap / 400.0));
    let score = if won { 1.0 } else { 0.0 };
    (XP_K_FACTOR * (score - expected)).round() as i64
}

/// Deltas for a finished match. Free play (no stake) and draws pay nothing.
pub fn settle(outcome: Outcome, stake: Option<u64>, local_xp: i64, opponent_xp: i64) -> RewardDelta {
    let Some(stake) = stake.filter(|s| *s > 0) else {
        return RewardDelta::ZERO;
    };
    let stake = i64::try_from(stake).unwrap_or(i64::MAX / 2);

    match outcome {
        Outcome::Win => RewardDelta {
            xp: xp_transfer(true, local_xp, opponent_xp),
            ark: stake.saturating_mul(2),
        },
        Outcome::Loss => RewardDelta {
            xp: xp_transfer(false, local_xp, opponent_xp),
            ark: -stake,
        },
        Outcome::Draw => RewardDelta::ZERO,
    }
}
