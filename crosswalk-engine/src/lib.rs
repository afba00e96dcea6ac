//! Crosswalk Decision Engine
//!
//! Platform-agnostic core for the crosswalk survival dilemma: scenario
//! parsing and generation, the importance-weighted decision, and the audit
//! that turns many decisions into per-attribute survival ratios.
//! Nothing in this crate reads stdin or prints; collaborators are passed in.

pub mod audit;
pub mod character;
pub mod constants;
pub mod decision;
pub mod generator;
pub mod numbers;
pub mod parser;
pub mod policy;
pub mod report;
pub mod scenario;
pub mod tally;

// Re-export commonly used types
pub use audit::{Audit, AuditReport};
pub use character::{
    AgeCategory, AnimalTraits, BodyType, Character, CharacterKind, CharacterTag, Gender,
    PersonTraits, Profession,
};
pub use decision::{ScoreCard, decide, score};
pub use generator::{GeneratorConfig, GeneratorConfigError, ScenarioGenerator};
pub use parser::{ConfigError, ConfigWarning, ParsedScenarios, ScenarioParser};
pub use policy::{AlgorithmPolicy, AuditType, DecisionSource, ScriptedPolicy};
pub use report::{ReportError, ReportStore, ResultsDir, append_report};
pub use scenario::{Decision, Scenario};
pub use tally::{Trait, TraitCount, TraitTally};

/// Run an algorithm audit over `scenarios` and hand the report to `store`.
///
/// # Errors
///
/// Returns the store's error if the report cannot be persisted.
pub fn audit_and_store<S>(scenarios: Vec<Scenario>, store: &S) -> Result<AuditReport, S::Error>
where
    S: ReportStore,
{
    let mut audit = Audit::new(scenarios);
    // Writing into io::sink cannot fail.
    let _ = audit.run(&mut AlgorithmPolicy, &mut std::io::sink());
    let report = audit.report();
    store.store(&report)?;
    Ok(report)
}
