//! Scenario config files: delimited rows grouped into scenarios.
//!
//! The first line is a header and is discarded. A row whose first field is
//! `scenario:<legality>` opens a new scene; every other row must carry ten
//! fields describing one character and the group it belongs to:
//!
//! ```text
//! person,female,30,average,doctor,true,false,,,passenger
//! ```
//!
//! Malformed rows never abort the run. A row with the wrong field count is
//! skipped, unknown tokens fall back to their type's default, and each
//! problem is reported as a [`ConfigWarning`] carrying the 1-based data line.
use std::mem;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::character::{BodyType, Character, CharacterTag, DEFAULT_SPECIES, Gender, Profession};
use crate::constants::{
    CHARACTER_FIELD_COUNT, DEFAULT_DELIMITER, LEGAL_CROSSING_TOKEN, SCENE_ROW_TAG,
};
use crate::scenario::{Decision, Scenario};

/// Recoverable problems found while reading a config file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigWarning {
    #[error("invalid data format in config file in line {line}")]
    InvalidDataFormat { line: usize, fields: usize },
    #[error("invalid characteristic in config file in line {line}")]
    InvalidCharacteristic {
        line: usize,
        field: &'static str,
        value: String,
    },
    #[error("invalid number format in config file in line {line}")]
    InvalidNumber { line: usize, value: String },
}

impl ConfigWarning {
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::InvalidDataFormat { line, .. }
            | Self::InvalidCharacteristic { line, .. }
            | Self::InvalidNumber { line, .. } => *line,
        }
    }
}

/// Failures that stop a config file from being read at all.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not find config file.")]
    NotFound { path: PathBuf },
    #[error("could not read config file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Scenarios read from a config source plus every warning raised on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedScenarios {
    pub scenarios: Vec<Scenario>,
    pub warnings: Vec<ConfigWarning>,
}

impl ParsedScenarios {
    #[must_use]
    pub fn into_scenarios(self) -> Vec<Scenario> {
        self.scenarios
    }
}

#[derive(Debug)]
enum Row {
    Scene {
        legal: bool,
    },
    Character {
        character: Character,
        group: Decision,
        is_you: Option<bool>,
    },
}

#[derive(Debug, Default)]
struct SceneDraft {
    legal: bool,
    you_in_car: bool,
    you_in_lane: bool,
    passengers: Vec<Character>,
    pedestrians: Vec<Character>,
}

impl SceneDraft {
    fn push(&mut self, character: Character, group: Decision, is_you: Option<bool>) {
        let marked = is_you.unwrap_or(false);
        match group {
            Decision::Passengers => {
                self.passengers.push(character);
                self.you_in_car |= marked;
            }
            Decision::Pedestrians => {
                self.pedestrians.push(character);
                self.you_in_lane |= marked;
            }
        }
    }

    fn finish(self) -> Scenario {
        Scenario::new(self.passengers, self.pedestrians, self.legal)
            .with_you_in_car(self.you_in_car)
            .with_you_in_lane(self.you_in_lane)
    }
}

/// Reads delimited scenario rows.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioParser {
    delimiter: char,
}

impl Default for ScenarioParser {
    fn default() -> Self {
        Self::new(DEFAULT_DELIMITER)
    }
}

impl ScenarioParser {
    #[must_use]
    pub const fn new(delimiter: char) -> Self {
        Self { delimiter }
    }

    #[must_use]
    pub const fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Read a config file from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] when the path does not exist and
    /// [`ConfigError::Io`] when it cannot be read. No scenarios are returned
    /// in either case.
    pub fn load(&self, path: &Path) -> Result<ParsedScenarios, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let parsed = self.parse_str(&text);
        log::info!(
            "loaded {} scenario(s) from {} with {} warning(s)",
            parsed.scenarios.len(),
            path.display(),
            parsed.warnings.len()
        );
        Ok(parsed)
    }

    #[must_use]
    pub fn parse_str(&self, text: &str) -> ParsedScenarios {
        self.parse_lines(text.lines())
    }

    /// Group rows into scenarios. The first line is treated as a header.
    ///
    /// Characters seen before the first scene header join that scene; the
    /// scene being built when input runs out is always emitted, so input
    /// without any header yields exactly one (illegal-crossing) scenario.
    pub fn parse_lines<I, S>(&self, lines: I) -> ParsedScenarios
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut lines = lines.into_iter();
        let _header = lines.next();

        let mut parsed = ParsedScenarios::default();
        let mut draft = SceneDraft::default();
        let mut opened = false;

        for (idx, raw) in lines.enumerate() {
            let line = idx + 1;
            match self.parse_row(raw.as_ref(), line, &mut parsed.warnings) {
                Ok(Row::Scene { legal }) => {
                    if opened {
                        parsed.scenarios.push(mem::take(&mut draft).finish());
                    }
                    draft.legal = legal;
                    opened = true;
                }
                Ok(Row::Character {
                    character,
                    group,
                    is_you,
                }) => draft.push(character, group, is_you),
                Err(warning) => record(&mut parsed.warnings, warning),
            }
        }

        parsed.scenarios.push(draft.finish());
        parsed
    }

    fn parse_row(
        &self,
        raw: &str,
        line: usize,
        warnings: &mut Vec<ConfigWarning>,
    ) -> Result<Row, ConfigWarning> {
        let fields: Vec<&str> = raw.split(self.delimiter).map(str::trim).collect();
        let mut head = fields.first().copied().unwrap_or_default().split(':');
        if head.next() == Some(SCENE_ROW_TAG) {
            return Ok(Row::Scene {
                legal: head.next() == Some(LEGAL_CROSSING_TOKEN),
            });
        }

        let [tag, gender, age, body, profession, pregnant, is_you, species, is_pet, group] =
            <[&str; CHARACTER_FIELD_COUNT]>::try_from(fields.as_slice()).map_err(|_| {
                ConfigWarning::InvalidDataFormat {
                    line,
                    fields: fields.len(),
                }
            })?;

        let mut cx = RowContext { line, warnings };
        let tag = cx.token(tag, "type", CharacterTag::Animal);
        let gender = cx.token(gender, "gender", Gender::Unknown);
        let age = cx.age(age);
        let is_you = flag(is_you);

        let character = match tag {
            CharacterTag::Person => Character::person(
                age,
                gender,
                cx.token(body, "bodyType", BodyType::Unspecified),
                if profession.is_empty() {
                    Profession::None
                } else {
                    cx.token(profession, "profession", Profession::None)
                },
                flag(pregnant).unwrap_or(false),
                is_you.unwrap_or(false),
            ),
            CharacterTag::Animal => Character::animal(
                age,
                gender,
                BodyType::Unspecified,
                if species.is_empty() {
                    DEFAULT_SPECIES
                } else {
                    species
                },
                flag(is_pet).unwrap_or(false),
            ),
        };
        let group = cx.token(group, "decision", Decision::Passengers);

        Ok(Row::Character {
            character,
            group,
            is_you,
        })
    }
}

struct RowContext<'a> {
    line: usize,
    warnings: &'a mut Vec<ConfigWarning>,
}

impl RowContext<'_> {
    fn token<T: std::str::FromStr>(&mut self, value: &str, field: &'static str, fallback: T) -> T {
        value.parse().unwrap_or_else(|_| {
            record(
                self.warnings,
                ConfigWarning::InvalidCharacteristic {
                    line: self.line,
                    field,
                    value: value.to_string(),
                },
            );
            fallback
        })
    }

    /// Negative ages leave the default of zero in place; anything else that
    /// is not a valid age is warned about.
    fn age(&mut self, value: &str) -> u32 {
        match value.parse::<u32>() {
            Ok(age) => age,
            Err(_) if value.parse::<i64>().is_ok_and(|age| age < 0) => 0,
            Err(_) => {
                record(
                    self.warnings,
                    ConfigWarning::InvalidNumber {
                        line: self.line,
                        value: value.to_string(),
                    },
                );
                0
            }
        }
    }
}

/// Empty means "not specified"; anything but a case-insensitive `true` is false.
fn flag(value: &str) -> Option<bool> {
    if value.is_empty() {
        None
    } else {
        Some(value.eq_ignore_ascii_case("true"))
    }
}

fn record(warnings: &mut Vec<ConfigWarning>, warning: ConfigWarning) {
    log::warn!("{warning}");
    warnings.push(warning);
}
