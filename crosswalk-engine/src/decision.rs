//! Importance-weighted survival decision.
use serde::{Deserialize, Serialize};

use crate::character::Character;
use crate::constants::ILLEGAL_CROSSING_PENALTY;
use crate::scenario::{Decision, Scenario};

/// Group scores behind a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub passengers: i32,
    pub pedestrians: i32,
}

impl ScoreCard {
    /// Pedestrians win only on a strictly greater score.
    #[must_use]
    pub const fn decision(self) -> Decision {
        if self.pedestrians > self.passengers {
            Decision::Pedestrians
        } else {
            Decision::Passengers
        }
    }
}

#[must_use]
pub fn group_importance(characters: &[Character]) -> i32 {
    characters.iter().map(Character::importance).sum()
}

/// Score both groups. Illegal crossings cost each pedestrian the penalty;
/// passengers are never judged by the crossing's legality.
#[must_use]
pub fn score(scenario: &Scenario) -> ScoreCard {
    let mut pedestrians = group_importance(scenario.pedestrians());
    if !scenario.is_legal_crossing() {
        let count = i32::try_from(scenario.pedestrian_count()).unwrap_or(i32::MAX);
        pedestrians = pedestrians.saturating_add(count.saturating_mul(ILLEGAL_CROSSING_PENALTY));
    }
    ScoreCard {
        passengers: group_importance(scenario.passengers()),
        pedestrians,
    }
}

/// Decide which group survives.
#[must_use]
pub fn decide(scenario: &Scenario) -> Decision {
    score(scenario).decision()
}
