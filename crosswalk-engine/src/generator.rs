//! Random scenario generation.
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use thiserror::Error;

use crate::character::{AgeCategory, BodyType, Character, Gender, Profession};
use crate::constants::{DEFAULT_MAX_POPULATION, DEFAULT_MIN_POPULATION, MAX_GENERATED_AGE};
use crate::scenario::Scenario;

const SPECIES: [&str; 3] = ["cat", "bird", "dog"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeneratorConfigError {
    #[error("{group} minimum {min} exceeds maximum {max}")]
    MinExceedsMax {
        group: &'static str,
        min: usize,
        max: usize,
    },
    #[error("{group} minimum must be at least 1")]
    EmptyGroup { group: &'static str },
}

/// Inclusive population bounds for each side of a generated scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "GeneratorConfig::default_min")]
    pub passengers_min: usize,
    #[serde(default = "GeneratorConfig::default_max")]
    pub passengers_max: usize,
    #[serde(default = "GeneratorConfig::default_min")]
    pub pedestrians_min: usize,
    #[serde(default = "GeneratorConfig::default_max")]
    pub pedestrians_max: usize,
}

impl GeneratorConfig {
    const fn default_min() -> usize {
        DEFAULT_MIN_POPULATION
    }

    const fn default_max() -> usize {
        DEFAULT_MAX_POPULATION
    }

    /// Check the bounds; every side needs room for at least one character.
    ///
    /// # Errors
    ///
    /// Returns an error when a minimum is zero or exceeds its maximum.
    pub fn validate(&self) -> Result<(), GeneratorConfigError> {
        check_bounds("passengers", self.passengers_min, self.passengers_max)
            .and_then(|()| check_bounds("pedestrians", self.pedestrians_min, self.pedestrians_max))
            .inspect_err(|err| log::debug!("rejected generator config: {err}"))
    }

    fn passenger_range(&self) -> RangeInclusive<usize> {
        self.passengers_min..=self.passengers_max
    }

    fn pedestrian_range(&self) -> RangeInclusive<usize> {
        self.pedestrians_min..=self.pedestrians_max
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            passengers_min: Self::default_min(),
            passengers_max: Self::default_max(),
            pedestrians_min: Self::default_min(),
            pedestrians_max: Self::default_max(),
        }
    }
}

fn check_bounds(group: &'static str, min: usize, max: usize) -> Result<(), GeneratorConfigError> {
    if min == 0 {
        return Err(GeneratorConfigError::EmptyGroup { group });
    }
    if min > max {
        return Err(GeneratorConfigError::MinExceedsMax { group, min, max });
    }
    Ok(())
}

/// Produces random but valid scenarios.
///
/// "You" is placed in the car on a coin flip; only when that misses is the
/// lane given its own coin flip, so a scenario may contain no "you" at all.
#[derive(Debug, Clone)]
pub struct ScenarioGenerator {
    rng: ChaCha20Rng,
    config: GeneratorConfig,
}

impl ScenarioGenerator {
    /// Generator seeded from OS entropy.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration bounds are invalid.
    pub fn new(config: GeneratorConfig) -> Result<Self, GeneratorConfigError> {
        config.validate()?;
        Ok(Self {
            rng: ChaCha20Rng::from_entropy(),
            config,
        })
    }

    /// Reproducible generator.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration bounds are invalid.
    pub fn with_seed(seed: u64, config: GeneratorConfig) -> Result<Self, GeneratorConfigError> {
        config.validate()?;
        Ok(Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            config,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn generate(&mut self) -> Scenario {
        let you_in_car = self.rng.gen_bool(0.5);
        let you_in_lane = !you_in_car && self.rng.gen_bool(0.5);
        let passengers = self.random_group(self.config.passenger_range(), you_in_car);
        let pedestrians = self.random_group(self.config.pedestrian_range(), you_in_lane);
        let legal = self.rng.gen_bool(0.5);

        Scenario::new(passengers, pedestrians, legal)
            .with_you_in_car(you_in_car)
            .with_you_in_lane(you_in_lane)
    }

    /// Generate `count` scenarios in order.
    pub fn generate_many(&mut self, count: usize) -> Vec<Scenario> {
        (0..count).map(|_| self.generate()).collect()
    }

    pub fn random_person(&mut self) -> Character {
        let age = self.random_age();
        let profession = if AgeCategory::from_age(age) == AgeCategory::Adult {
            *Profession::WORKING
                .choose(&mut self.rng)
                .unwrap_or(&Profession::Unemployed)
        } else {
            Profession::None
        };
        let gender = self.random_gender();
        let body_type = self.random_body_type();
        let pregnant = gender == Gender::Female && self.rng.gen_bool(0.5);
        Character::person(age, gender, body_type, profession, pregnant, false)
    }

    pub fn random_animal(&mut self) -> Character {
        let age = self.random_age();
        let gender = self.random_gender();
        let body_type = self.random_body_type();
        let is_pet = self.rng.gen_bool(0.5);
        let species = SPECIES.choose(&mut self.rng).copied().unwrap_or("dog");
        Character::animal(age, gender, body_type, species, is_pet)
    }

    fn random_group(&mut self, range: RangeInclusive<usize>, with_you: bool) -> Vec<Character> {
        let count = self.rng.gen_range(range);
        let you_slot = self.rng.gen_range(0..count);
        (0..count)
            .map(|slot| {
                if slot == you_slot {
                    self.random_person().with_you(with_you)
                } else if self.rng.gen_bool(0.5) {
                    self.random_person()
                } else {
                    self.random_animal()
                }
            })
            .collect()
    }

    fn random_age(&mut self) -> u32 {
        self.rng.gen_range(0..=MAX_GENERATED_AGE)
    }

    fn random_gender(&mut self) -> Gender {
        *Gender::ALL.choose(&mut self.rng).unwrap_or(&Gender::Unknown)
    }

    fn random_body_type(&mut self) -> BodyType {
        *BodyType::ALL
            .choose(&mut self.rng)
            .unwrap_or(&BodyType::Unspecified)
    }
}
