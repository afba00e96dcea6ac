//! Centralized weights and limits for the Crosswalk decision engine.
//!
//! These values define the deterministic math for survival decisions and
//! the shape of generated scenarios. Keeping them together means the scoring
//! can only be adjusted via reviewed code changes.

// Age bands (lower bound inclusive) ---------------------------------------
pub(crate) const MIN_CHILD_AGE: u32 = 5;
pub(crate) const MIN_ADULT_AGE: u32 = 17;
pub(crate) const MIN_SENIOR_AGE: u32 = 69;

// Importance weights -------------------------------------------------------
pub(crate) const AGE_IMPORTANCE_BABY: i32 = 4;
pub(crate) const AGE_IMPORTANCE_CHILD: i32 = 3;
pub(crate) const AGE_IMPORTANCE_ADULT: i32 = 2;
pub(crate) const AGE_IMPORTANCE_SENIOR: i32 = 1;

pub(crate) const PROFESSION_IMPORTANCE_PRESIDENT: i32 = 7;
pub(crate) const PROFESSION_IMPORTANCE_POLICE: i32 = 6;
pub(crate) const PROFESSION_IMPORTANCE_DOCTOR: i32 = 5;
pub(crate) const PROFESSION_IMPORTANCE_CEO: i32 = 4;
pub(crate) const PROFESSION_IMPORTANCE_HOMELESS: i32 = 1;
pub(crate) const PROFESSION_IMPORTANCE_CRIMINAL: i32 = -1;

pub(crate) const PREGNANT_IMPORTANCE: i32 = 3;
pub(crate) const YOU_IMPORTANCE: i32 = 5;
pub(crate) const PET_IMPORTANCE: i32 = 2;

/// Applied once per pedestrian when the crossing is illegal.
pub(crate) const ILLEGAL_CROSSING_PENALTY: i32 = -2;

// Generator shape ----------------------------------------------------------
pub const DEFAULT_MIN_POPULATION: usize = 1;
pub const DEFAULT_MAX_POPULATION: usize = 5;
pub(crate) const MAX_GENERATED_AGE: u32 = 100;

// Audit --------------------------------------------------------------------
/// Interactive audits pause for a "continue?" answer after this many scenarios.
pub const SCENARIOS_PER_BATCH: usize = 3;
pub const DEFAULT_RUNS: usize = 100;

pub(crate) const REPORT_BAR: &str = "======================================";
pub(crate) const KEY_PREGNANT: &str = "pregnant";
pub(crate) const KEY_PET: &str = "pet";
pub(crate) const KEY_YOU: &str = "you";
pub(crate) const KEY_GREEN: &str = "green";
pub(crate) const KEY_RED: &str = "red";

// Config file --------------------------------------------------------------
pub const DEFAULT_DELIMITER: char = ',';
pub(crate) const CHARACTER_FIELD_COUNT: usize = 10;
pub(crate) const SCENE_ROW_TAG: &str = "scenario";
pub(crate) const LEGAL_CROSSING_TOKEN: &str = "green";
