//! A single crossing: who is in the car, who is on the road.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::character::Character;
use crate::constants::REPORT_BAR;

/// Which side of a scenario survives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Passengers,
    Pedestrians,
}

impl Decision {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Passengers => "passengers",
            Self::Pedestrians => "pedestrians",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Decision {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "passenger" | "passengers" => Ok(Self::Passengers),
            "pedestrian" | "pedestrians" => Ok(Self::Pedestrians),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Scenario {
    passengers: Vec<Character>,
    pedestrians: Vec<Character>,
    legal_crossing: bool,
    #[serde(default)]
    you_in_car: bool,
    #[serde(default)]
    you_in_lane: bool,
}

impl Scenario {
    #[must_use]
    pub const fn new(
        passengers: Vec<Character>,
        pedestrians: Vec<Character>,
        legal_crossing: bool,
    ) -> Self {
        Self {
            passengers,
            pedestrians,
            legal_crossing,
            you_in_car: false,
            you_in_lane: false,
        }
    }

    #[must_use]
    pub fn with_you_in_car(mut self, you_in_car: bool) -> Self {
        self.you_in_car = you_in_car;
        self
    }

    #[must_use]
    pub fn with_you_in_lane(mut self, you_in_lane: bool) -> Self {
        self.you_in_lane = you_in_lane;
        self
    }

    #[must_use]
    pub fn passengers(&self) -> &[Character] {
        &self.passengers
    }

    #[must_use]
    pub fn pedestrians(&self) -> &[Character] {
        &self.pedestrians
    }

    /// Characters on the given side of the scenario.
    #[must_use]
    pub fn group(&self, side: Decision) -> &[Character] {
        match side {
            Decision::Passengers => &self.passengers,
            Decision::Pedestrians => &self.pedestrians,
        }
    }

    #[must_use]
    pub const fn is_legal_crossing(&self) -> bool {
        self.legal_crossing
    }

    #[must_use]
    pub const fn has_you_in_car(&self) -> bool {
        self.you_in_car
    }

    #[must_use]
    pub const fn has_you_in_lane(&self) -> bool {
        self.you_in_lane
    }

    #[must_use]
    pub fn passenger_count(&self) -> usize {
        self.passengers.len()
    }

    #[must_use]
    pub fn pedestrian_count(&self) -> usize {
        self.pedestrians.len()
    }
}

fn write_group(f: &mut fmt::Formatter<'_>, group: &[Character]) -> fmt::Result {
    for (idx, character) in group.iter().enumerate() {
        if idx > 0 {
            writeln!(f)?;
        }
        write!(f, "- {character}")?;
    }
    Ok(())
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{REPORT_BAR}")?;
        writeln!(f, "# Scenario")?;
        writeln!(f, "{REPORT_BAR}")?;
        writeln!(
            f,
            "Legal Crossing: {}",
            if self.legal_crossing { "yes" } else { "no" }
        )?;
        writeln!(f, "Passengers ({})", self.passenger_count())?;
        write_group(f, &self.passengers)?;
        writeln!(f)?;
        writeln!(f, "Pedestrians ({})", self.pedestrian_count())?;
        write_group(f, &self.pedestrians)
    }
}
