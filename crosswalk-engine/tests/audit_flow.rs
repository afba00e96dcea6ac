use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crosswalk_engine::{
    AlgorithmPolicy, Audit, AuditReport, AuditType, Decision, GeneratorConfig, ReportStore,
    ResultsDir, ScenarioGenerator, ScenarioParser, ScriptedPolicy,
};

fn fixture_audit() -> Audit {
    let path = Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/scenarios.csv"));
    Audit::new(ScenarioParser::default().load(path).unwrap().into_scenarios())
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("crosswalk-flow-{}-{name}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn fixture_ratios_sort_descending_in_discovery_order() {
    let mut audit = fixture_audit();
    audit.run(&mut AlgorithmPolicy, &mut io::sink()).unwrap();
    let report = audit.report();

    let names: Vec<&str> = report.traits.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "female",
            "doctor",
            "pregnant",
            "adult",
            "athletic",
            "child",
            "overweight",
            "criminal",
            "you",
            "unspecified",
            "president",
            "person",
            "average",
            "male",
            "red",
            "green",
            "baby",
            "animal",
            "cat",
            "pet",
            "dog",
        ]
    );
}

#[test]
fn fixture_report_text() {
    let mut audit = fixture_audit();
    let mut sink = Vec::new();
    audit.run(&mut AlgorithmPolicy, &mut sink).unwrap();
    let text = String::from_utf8(sink).unwrap();

    assert!(text.contains("# Unspecified Audit\n"));
    assert!(text.contains("- % SAVED AFTER 3 RUNS\n"));
    assert!(text.contains("person: 0.8\n"));
    assert!(text.contains("red: 0.7\n"));
    assert!(text.contains("green: 0.6\n"));
    assert!(text.contains("baby: 0.5\n"));
    assert!(text.contains("dog: 0.0\n"));
    assert!(text.ends_with("--\naverage age: 22.0\n"));
}

#[test]
fn user_decisions_replace_the_algorithm() {
    let mut audit = fixture_audit();
    let mut policy = ScriptedPolicy::new(
        [Decision::Pedestrians, Decision::Passengers, Decision::Passengers],
        Vec::new(),
    );
    audit.run(&mut policy, &mut io::sink()).unwrap();
    let report = audit.report();

    assert_eq!(report.audit_type, AuditType::User);
    assert_eq!(report.ratio_of("cat"), Some(1.0));
    assert_eq!(report.ratio_of("dog"), Some(1.0));
    assert_eq!(report.ratio_of("you"), Some(0.0));
    assert_eq!(report.ratio_of("president"), Some(0.0));
}

#[test]
fn appending_twice_separates_blocks_with_one_blank_line() {
    let dir = scratch_dir("append");
    let results = ResultsDir::new(&dir).unwrap();

    let mut audit = fixture_audit();
    audit.run(&mut AlgorithmPolicy, &mut io::sink()).unwrap();
    let report = audit.report();

    results.store(&report).unwrap();
    let first = fs::read_to_string(dir.join("results.log")).unwrap();
    assert_eq!(first, format!("{report}\n"));

    results.store(&report).unwrap();
    let both = fs::read_to_string(dir.join("results.log")).unwrap();
    let blocks: Vec<&str> = both.split("\n\n").collect();
    assert_eq!(blocks.len(), 2);
    assert_eq!(format!("{}\n", blocks[0]), first);
    fs::remove_dir_all(dir).ok();
}

#[test]
fn report_serializes_to_json() {
    let mut generator = ScenarioGenerator::with_seed(11, GeneratorConfig::default()).unwrap();
    let mut audit = Audit::empty();
    audit
        .run_generated(&mut generator, 40, &mut AlgorithmPolicy, &mut io::sink())
        .unwrap();
    let report = audit.report();

    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"audit_type\":\"algorithm\""));
    let back: AuditReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back.runs, 40);
    assert_eq!(back.traits.len(), report.traits.len());
}

#[test]
fn seeded_audits_are_reproducible() {
    let run = |seed| {
        let mut generator = ScenarioGenerator::with_seed(seed, GeneratorConfig::default()).unwrap();
        let mut audit = Audit::empty();
        audit
            .run_generated(&mut generator, 60, &mut AlgorithmPolicy, &mut io::sink())
            .unwrap();
        audit.report().to_string()
    };
    assert_eq!(run(3), run(3));
}
