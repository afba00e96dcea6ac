//! Audit aggregator: runs scenarios through a decision source and turns the
//! outcomes into per-attribute survival ratios.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Write};

use crate::character::{Character, CharacterKind, Gender, Profession};
use crate::constants::{
    KEY_GREEN, KEY_PET, KEY_PREGNANT, KEY_RED, KEY_YOU, REPORT_BAR, SCENARIOS_PER_BATCH,
};
use crate::generator::ScenarioGenerator;
use crate::numbers::{ratio, round_tenths};
use crate::policy::{AuditType, DecisionSource};
use crate::scenario::{Decision, Scenario};
use crate::tally::{Trait, TraitTally};

/// Snapshot of an audit, rebuilt from the running tallies on every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    pub audit_type: AuditType,
    pub runs: u64,
    pub traits: Vec<Trait>,
    pub average_age: f64,
}

impl AuditReport {
    #[must_use]
    pub fn ratio_of(&self, name: &str) -> Option<f64> {
        self.traits.iter().find(|t| t.name == name).map(|t| t.ratio)
    }
}

impl fmt::Display for AuditReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{REPORT_BAR}")?;
        writeln!(f, "# {} Audit", self.audit_type)?;
        writeln!(f, "{REPORT_BAR}")?;
        writeln!(f, "- % SAVED AFTER {} RUNS", self.runs)?;
        for entry in &self.traits {
            writeln!(f, "{entry}")?;
        }
        writeln!(f, "--")?;
        write!(f, "average age: {:.1}", round_tenths(self.average_age))
    }
}

/// Running counters owned by exactly one audit.
#[derive(Debug, Clone, Default)]
struct AuditStats {
    runs: u64,
    tally: TraitTally,
    survivor_age_total: u64,
    survivor_count: u64,
}

impl AuditStats {
    fn record(&mut self, scenario: &Scenario, decision: Decision) {
        self.runs += 1;
        self.record_group(scenario.passengers(), decision == Decision::Passengers);
        self.record_group(scenario.pedestrians(), decision == Decision::Pedestrians);

        if scenario.has_you_in_car() || scenario.has_you_in_lane() {
            let saved = (scenario.has_you_in_car() && decision == Decision::Passengers)
                || (scenario.has_you_in_lane() && decision == Decision::Pedestrians);
            self.tally.record(KEY_YOU, saved);
        }

        let key = if scenario.is_legal_crossing() {
            KEY_GREEN
        } else {
            KEY_RED
        };
        let total = scenario.passenger_count() + scenario.pedestrian_count();
        let survivors = scenario.group(decision).len();
        self.tally.add(key, widen(total), widen(survivors));
    }

    fn record_group(&mut self, characters: &[Character], saved: bool) {
        for character in characters {
            match character.kind() {
                CharacterKind::Person(person) => {
                    self.tally.record(character.body_type().as_str(), saved);
                    if character.gender() != Gender::Unknown {
                        self.tally.record(character.gender().as_str(), saved);
                    }
                    self.tally.record(character.tag().as_str(), saved);
                    if person.profession != Profession::None {
                        self.tally.record(person.profession.as_str(), saved);
                    }
                    if person.pregnant {
                        self.tally.record(KEY_PREGNANT, saved);
                    }
                    if saved {
                        self.survivor_age_total += u64::from(character.age());
                        self.survivor_count += 1;
                    }
                    self.tally.record(character.age_category().as_str(), saved);
                }
                CharacterKind::Animal(animal) => {
                    self.tally.record(character.tag().as_str(), saved);
                    self.tally.record(&animal.species, saved);
                    if animal.is_pet {
                        self.tally.record(KEY_PET, saved);
                    }
                }
            }
        }
    }

    fn report(&self, audit_type: AuditType) -> AuditReport {
        AuditReport {
            audit_type,
            runs: self.runs,
            traits: self.tally.survival_ratios(),
            average_age: ratio(self.survivor_age_total, self.survivor_count),
        }
    }
}

fn widen(count: usize) -> u64 {
    u64::try_from(count).unwrap_or(u64::MAX)
}

/// Drives scenarios through a [`DecisionSource`] and aggregates the outcome.
///
/// Scenarios are only read; tallies live inside the audit so one scenario set
/// can back several independent audits.
#[derive(Debug, Clone, Default)]
pub struct Audit {
    scenarios: Vec<Scenario>,
    audit_type: AuditType,
    stats: AuditStats,
    stopped: bool,
}

impl Audit {
    #[must_use]
    pub fn new(scenarios: Vec<Scenario>) -> Self {
        Self {
            scenarios,
            ..Self::default()
        }
    }

    /// Audit with no scenarios yet; fill it with [`Audit::run_generated`].
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    #[must_use]
    pub const fn audit_type(&self) -> AuditType {
        self.audit_type
    }

    #[must_use]
    pub const fn runs(&self) -> u64 {
        self.stats.runs
    }

    #[must_use]
    pub const fn tally(&self) -> &TraitTally {
        &self.stats.tally
    }

    /// True once an interactive source declined to continue.
    #[must_use]
    pub const fn stopped(&self) -> bool {
        self.stopped
    }

    #[must_use]
    pub fn report(&self) -> AuditReport {
        self.stats.report(self.audit_type)
    }

    /// Evaluate every owned scenario and write the final report to `sink`.
    ///
    /// Interactive sources get an interim report and a "continue?" question
    /// before scenario 4, 7, and so on; declining ends the loop early but the
    /// final report is still written.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `sink` fails.
    pub fn run(&mut self, source: &mut dyn DecisionSource, sink: &mut dyn Write) -> io::Result<()> {
        self.evaluate_from(0, source, sink)
    }

    /// Generate scenarios on the fly and audit them.
    ///
    /// Non-interactive sources get `runs` scenarios. Interactive sources get
    /// batches of [`SCENARIOS_PER_BATCH`] with a report after each, until they
    /// decline to continue; tallies accumulate across batches.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `sink` fails.
    pub fn run_generated(
        &mut self,
        generator: &mut ScenarioGenerator,
        runs: usize,
        source: &mut dyn DecisionSource,
        sink: &mut dyn Write,
    ) -> io::Result<()> {
        if !source.audit_type().is_interactive() {
            let start = self.scenarios.len();
            self.scenarios.extend(generator.generate_many(runs));
            return self.evaluate_from(start, source, sink);
        }

        while !self.stopped {
            let start = self.scenarios.len();
            self.scenarios
                .extend(generator.generate_many(SCENARIOS_PER_BATCH));
            self.evaluate_from(start, source, sink)?;
            if !self.stopped && !source.continue_auditing() {
                log::debug!("audit stopped after {} runs", self.stats.runs);
                self.stopped = true;
            }
        }
        Ok(())
    }

    fn evaluate_from(
        &mut self,
        start: usize,
        source: &mut dyn DecisionSource,
        sink: &mut dyn Write,
    ) -> io::Result<()> {
        self.audit_type = source.audit_type();
        let interactive = self.audit_type.is_interactive();

        for (offset, scenario) in self.scenarios.iter().skip(start).enumerate() {
            if interactive && offset > 0 && offset % SCENARIOS_PER_BATCH == 0 {
                writeln!(sink, "{}", self.stats.report(self.audit_type))?;
                if !source.continue_auditing() {
                    log::debug!("audit stopped after {} runs", self.stats.runs);
                    self.stopped = true;
                    break;
                }
            }
            let decision = source.decide(scenario);
            self.stats.record(scenario, decision);
        }

        let report = self.stats.report(self.audit_type);
        log::info!(
            "{} audit finished after {} runs ({} traits)",
            self.audit_type,
            report.runs,
            report.traits.len()
        );
        writeln!(sink, "{report}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::BodyType;
    use crate::generator::GeneratorConfig;
    use crate::policy::{AlgorithmPolicy, ScriptedPolicy};

    fn person(age: u32, gender: Gender, profession: Profession, is_you: bool) -> Character {
        Character::person(age, gender, BodyType::Average, profession, false, is_you)
    }

    fn sample() -> Scenario {
        Scenario::new(
            vec![person(30, Gender::Male, Profession::None, true)],
            vec![
                person(40, Gender::Female, Profession::Doctor, false),
                Character::animal(3, Gender::Unknown, BodyType::Unspecified, "cat", true),
            ],
            false,
        )
        .with_you_in_car(true)
    }

    #[test]
    fn constant_decisions_give_extreme_ratios() {
        let scene = Scenario::new(
            vec![person(30, Gender::Male, Profession::Ceo, true)],
            vec![
                Character::animal(3, Gender::Unknown, BodyType::Unspecified, "cat", true),
                Character::animal(1, Gender::Female, BodyType::Unspecified, "bird", false),
            ],
            false,
        )
        .with_you_in_car(true);
        let mut audit = Audit::new(vec![scene; 5]);
        let mut sink = Vec::new();
        audit.run(&mut AlgorithmPolicy, &mut sink).unwrap();

        let report = audit.report();
        assert_eq!(report.runs, 5);
        for entry in report.traits.iter().filter(|t| t.name != "red") {
            assert!(
                entry.ratio == 0.0 || entry.ratio == 1.0,
                "{} had {}",
                entry.name,
                entry.ratio
            );
        }
        assert_eq!(report.ratio_of("male"), Some(1.0));
        assert_eq!(report.ratio_of("ceo"), Some(1.0));
        assert_eq!(report.ratio_of("cat"), Some(0.0));
        assert_eq!(report.ratio_of("you"), Some(1.0));
        assert!((report.average_age - 30.0).abs() < f64::EPSILON);
        assert!(String::from_utf8(sink).unwrap().contains("red: 0.3"));
    }

    #[test]
    fn legality_counts_whole_groups() {
        let mut audit = Audit::new(vec![sample()]);
        audit.run(&mut AlgorithmPolicy, &mut io::sink()).unwrap();
        let red = audit.tally().get("red").unwrap();
        assert_eq!((red.seen, red.saved), (3, 1));
        assert!(audit.tally().get("green").is_none());
    }

    #[test]
    fn animals_do_not_count_towards_age() {
        let only_animals = Scenario::new(
            vec![Character::default_animal()],
            vec![],
            true,
        );
        let mut audit = Audit::new(vec![only_animals]);
        audit.run(&mut AlgorithmPolicy, &mut io::sink()).unwrap();
        let report = audit.report();
        assert!(report.average_age.abs() < f64::EPSILON);
        assert!(report.to_string().ends_with("average age: 0.0"));
        assert_eq!(report.ratio_of("dog"), Some(1.0));
        assert_eq!(report.ratio_of("pet"), None);
    }

    #[test]
    fn you_follows_the_chosen_side() {
        let lane = Scenario::new(
            vec![person(30, Gender::Male, Profession::None, false)],
            vec![person(30, Gender::Male, Profession::None, true)],
            true,
        )
        .with_you_in_lane(true);
        let mut policy = ScriptedPolicy::new([Decision::Pedestrians, Decision::Passengers], Vec::new());
        let mut audit = Audit::new(vec![lane.clone(), lane]);
        audit.run(&mut policy, &mut io::sink()).unwrap();
        let you = audit.tally().get("you").unwrap();
        assert_eq!((you.seen, you.saved), (2, 1));
    }

    #[test]
    fn report_text_layout() {
        let mut audit = Audit::new(vec![sample()]);
        audit.run(&mut AlgorithmPolicy, &mut io::sink()).unwrap();
        let text = audit.report().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], REPORT_BAR);
        assert_eq!(lines[1], "# Unspecified Audit");
        assert_eq!(lines[2], REPORT_BAR);
        assert_eq!(lines[3], "- % SAVED AFTER 1 RUNS");
        assert_eq!(lines[lines.len() - 2], "--");
        assert_eq!(lines[lines.len() - 1], "average age: 30.0");
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn interactive_checkpoints_every_three_scenarios() {
        let mut policy = ScriptedPolicy::new(Vec::new(), [true, false]);
        let mut audit = Audit::new(vec![sample(); 8]);
        let mut sink = Vec::new();
        audit.run(&mut policy, &mut sink).unwrap();

        assert!(audit.stopped());
        assert_eq!(audit.runs(), 6);
        assert_eq!(audit.audit_type(), AuditType::User);
        let output = String::from_utf8(sink).unwrap();
        assert_eq!(output.matches("# User Audit").count(), 3);
    }

    #[test]
    fn algorithm_audit_never_checkpoints() {
        let mut audit = Audit::new(vec![sample(); 7]);
        let mut sink = Vec::new();
        audit.run(&mut AlgorithmPolicy, &mut sink).unwrap();
        let output = String::from_utf8(sink).unwrap();
        assert_eq!(output.matches("Audit").count(), 1);
        assert!(!audit.stopped());
    }

    #[test]
    fn generated_interactive_audit_runs_batches_until_stopped() {
        let mut generator = ScenarioGenerator::with_seed(5, GeneratorConfig::default()).unwrap();
        let mut policy = ScriptedPolicy::new(Vec::new(), [true, true, false]);
        let mut audit = Audit::empty();
        let mut sink = Vec::new();
        audit
            .run_generated(&mut generator, 100, &mut policy, &mut sink)
            .unwrap();
        assert_eq!(audit.runs(), 9);
        assert_eq!(audit.scenarios().len(), 9);
        let output = String::from_utf8(sink).unwrap();
        assert!(output.contains("- % SAVED AFTER 9 RUNS"));
    }

    #[test]
    fn generated_algorithm_audit_uses_requested_runs() {
        let mut generator = ScenarioGenerator::with_seed(5, GeneratorConfig::default()).unwrap();
        let mut audit = Audit::empty();
        audit
            .run_generated(&mut generator, 25, &mut AlgorithmPolicy, &mut io::sink())
            .unwrap();
        assert_eq!(audit.runs(), 25);
        assert_eq!(audit.report().audit_type, AuditType::Algorithm);
    }
}
