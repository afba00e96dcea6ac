mod console;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write, stdout};
use std::path::{Path, PathBuf};

use console::Console;
use crosswalk_engine::constants::{DEFAULT_DELIMITER, DEFAULT_RUNS};
use crosswalk_engine::{
    AlgorithmPolicy, Audit, AuditReport, ConfigError, GeneratorConfig, ReportStore, ResultsDir,
    ScenarioGenerator, ScenarioParser,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Plain text audit blocks
    Text,
    /// Final report as pretty JSON
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "crosswalk", version)]
#[command(
    about = "Audit who survives at a crosswalk - scenarios from a config file or generated at random"
)]
struct Args {
    /// Optional: path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Optional: directory for the results log
    #[arg(short, long)]
    results: Option<PathBuf>,

    /// Launch interactive mode: you make the decisions
    #[arg(short, long)]
    interactive: bool,

    /// Number of random scenarios to audit when no config file is given
    #[arg(short = 'n', long, default_value_t = DEFAULT_RUNS)]
    runs: usize,

    /// Seed for random scenarios (reproducible runs)
    #[arg(long)]
    seed: Option<u64>,

    /// Column delimiter of the config file
    #[arg(long, default_value_t = DEFAULT_DELIMITER)]
    delimiter: char,

    /// Console report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), stdout());
    if let Err(err) = run(&args, &mut console) {
        eprintln!("{} {err:#}", "ERROR:".red().bold());
        std::process::exit(1);
    }
}

fn run<R: BufRead, W: Write>(args: &Args, console: &mut Console<R, W>) -> Result<AuditReport> {
    let results = resolve_results_dir(args)?;
    if let Some(path) = &args.config
        && !path.is_file()
    {
        return Err(ConfigError::NotFound { path: path.clone() }.into());
    }
    let mut output = ReportOutput::open(args.format, args.output.as_deref())?;

    let consent = if args.interactive {
        console.banner()?;
        console.ask_consent()?
    } else {
        false
    };

    let report = match &args.config {
        Some(path) => run_config_audit(args, path, console, output.progress())?,
        None => run_random_audit(args, console, output.progress())?,
    };
    output.finish(&report)?;

    if !args.interactive || consent {
        results.store(&report)?;
    } else {
        log::info!("decisions not stored: no consent");
    }

    if args.interactive && args.config.is_some() {
        console.wait_for_enter()?;
    }
    Ok(report)
}

fn resolve_results_dir(args: &Args) -> Result<ResultsDir> {
    Ok(match &args.results {
        Some(dir) => ResultsDir::new(dir)?,
        None => ResultsDir::current(),
    })
}

fn run_config_audit<R: BufRead, W: Write>(
    args: &Args,
    path: &Path,
    console: &mut Console<R, W>,
    progress: &mut dyn Write,
) -> Result<AuditReport> {
    let parsed = ScenarioParser::new(args.delimiter).load(path)?;
    for warning in &parsed.warnings {
        eprintln!("{} {warning}", "WARNING:".yellow().bold());
    }

    let mut audit = Audit::new(parsed.into_scenarios());
    if args.interactive {
        audit.run(console, progress)?;
    } else {
        audit.run(&mut AlgorithmPolicy, progress)?;
    }
    Ok(audit.report())
}

fn run_random_audit<R: BufRead, W: Write>(
    args: &Args,
    console: &mut Console<R, W>,
    progress: &mut dyn Write,
) -> Result<AuditReport> {
    let config = GeneratorConfig::default();
    let mut generator = match args.seed {
        Some(seed) => ScenarioGenerator::with_seed(seed, config)?,
        None => ScenarioGenerator::new(config)?,
    };

    let mut audit = Audit::empty();
    if args.interactive {
        audit.run_generated(&mut generator, args.runs, console, progress)?;
    } else {
        audit.run_generated(&mut generator, args.runs, &mut AlgorithmPolicy, progress)?;
    }
    Ok(audit.report())
}

/// Console side of the report. Text mode streams every audit block as it is
/// produced; JSON mode swallows those and prints only the final report.
struct ReportOutput {
    format: ReportFormat,
    writer: Box<dyn Write>,
    quiet: io::Sink,
}

impl ReportOutput {
    fn open(format: ReportFormat, path: Option<&Path>) -> Result<Self> {
        let writer: Box<dyn Write> = match path {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("failed to create {}", path.display()))?;
                Box::new(BufWriter::new(file))
            }
            None => Box::new(stdout()),
        };
        Ok(Self {
            format,
            writer,
            quiet: io::sink(),
        })
    }

    /// Where in-progress audit blocks go.
    fn progress(&mut self) -> &mut dyn Write {
        match self.format {
            ReportFormat::Text => self.writer.as_mut(),
            ReportFormat::Json => &mut self.quiet,
        }
    }

    fn finish(&mut self, report: &AuditReport) -> Result<()> {
        if self.format == ReportFormat::Json {
            let json = serde_json::to_string_pretty(report).context("failed to encode report")?;
            writeln!(self.writer, "{json}")?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crosswalk_engine::AuditType;
    use std::io::Cursor;

    fn fixture() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../crosswalk-engine/tests/fixtures/scenarios.csv")
    }

    fn scratch(label: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("crosswalk-main-{label}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn base_args(dir: &Path) -> Args {
        Args {
            config: None,
            results: Some(dir.to_path_buf()),
            interactive: false,
            runs: 12,
            seed: Some(1337),
            delimiter: ',',
            format: ReportFormat::Text,
            output: Some(dir.join("console.txt")),
        }
    }

    fn quiet_console(input: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn random_audit_stores_results_log() {
        let dir = scratch("random");
        let report = run(&base_args(&dir), &mut quiet_console("")).unwrap();
        assert_eq!(report.runs, 12);
        assert_eq!(report.audit_type, AuditType::Algorithm);

        let log = std::fs::read_to_string(dir.join("results.log")).unwrap();
        assert_eq!(log, format!("{report}\n"));
        let console = std::fs::read_to_string(dir.join("console.txt")).unwrap();
        assert!(console.contains("- % SAVED AFTER 12 RUNS"));
    }

    #[test]
    fn config_audit_runs_every_scene() {
        let dir = scratch("config");
        let args = Args {
            config: Some(fixture()),
            ..base_args(&dir)
        };
        let report = run(&args, &mut quiet_console("")).unwrap();
        assert_eq!(report.runs, 3);
        assert!(dir.join("results.log").is_file());
    }

    #[test]
    fn missing_config_is_an_error() {
        let dir = scratch("noconfig");
        let args = Args {
            config: Some(dir.join("absent.csv")),
            ..base_args(&dir)
        };
        let err = run(&args, &mut quiet_console("")).unwrap_err();
        assert_eq!(err.to_string(), "could not find config file.");
    }

    #[test]
    fn missing_results_dir_is_an_error() {
        let dir = scratch("nodir");
        let args = Args {
            results: Some(dir.join("nope")),
            ..base_args(&dir)
        };
        let err = run(&args, &mut quiet_console("")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "could not print results. Target directory does not exist."
        );
    }

    #[test]
    fn interactive_without_consent_stores_nothing() {
        let dir = scratch("noconsent");
        let args = Args {
            interactive: true,
            ..base_args(&dir)
        };
        let mut console = quiet_console("no\n1\n2\n1\nno\n");
        let report = run(&args, &mut console).unwrap();
        assert_eq!(report.audit_type, AuditType::User);
        assert_eq!(report.runs, 3);
        assert!(!dir.join("user.log").exists());
        assert!(!dir.join("results.log").exists());
    }

    #[test]
    fn interactive_config_with_consent_writes_user_log() {
        let dir = scratch("consent");
        let args = Args {
            interactive: true,
            config: Some(fixture()),
            ..base_args(&dir)
        };
        let mut console = quiet_console("yes\n1\n2\n2\n\n");
        let report = run(&args, &mut console).unwrap();
        assert_eq!(report.runs, 3);
        let log = std::fs::read_to_string(dir.join("user.log")).unwrap();
        assert!(log.starts_with("======================================\n# User Audit"));

        let transcript = String::from_utf8(console.into_output()).unwrap();
        assert!(transcript.contains(console::QUIT_PROMPT));
    }

    #[test]
    fn json_format_prints_final_report_only() {
        let dir = scratch("json");
        let args = Args {
            format: ReportFormat::Json,
            ..base_args(&dir)
        };
        run(&args, &mut quiet_console("")).unwrap();
        let text = std::fs::read_to_string(dir.join("console.txt")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["runs"], 12);
        assert_eq!(value["audit_type"], "algorithm");
        assert!(dir.join("results.log").is_file());
    }

    #[test]
    fn interactive_missing_config_fails_before_prompting() {
        let dir = scratch("noconfig-interactive");
        let args = Args {
            interactive: true,
            config: Some(dir.join("absent.csv")),
            ..base_args(&dir)
        };
        let mut console = quiet_console("yes\n");
        let err = run(&args, &mut console).unwrap_err();
        assert_eq!(err.to_string(), "could not find config file.");
        assert!(console.into_output().is_empty());
        assert!(!dir.join("console.txt").exists());
    }

    #[test]
    fn report_output_quiets_progress_only_for_json() {
        let dir = scratch("output");
        let report = AuditReport {
            audit_type: AuditType::Algorithm,
            runs: 0,
            traits: Vec::new(),
            average_age: 0.0,
        };

        let text_path = dir.join("text.txt");
        let mut text = ReportOutput::open(ReportFormat::Text, Some(&text_path)).unwrap();
        write!(text.progress(), "block").unwrap();
        text.finish(&report).unwrap();
        assert_eq!(std::fs::read_to_string(&text_path).unwrap(), "block");

        let json_path = dir.join("report.json");
        let mut json = ReportOutput::open(ReportFormat::Json, Some(&json_path)).unwrap();
        write!(json.progress(), "block").unwrap();
        json.finish(&report).unwrap();
        let written = std::fs::read_to_string(&json_path).unwrap();
        assert!(!written.contains("block"));
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["runs"], 0);
    }
}
