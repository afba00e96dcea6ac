//! Prompt handling for interactive audits.
use colored::Colorize;
use std::io::{self, BufRead, Write};

use crosswalk_engine::{AuditType, Decision, DecisionSource, Scenario};

pub const CONSENT_PROMPT: &str = "Do you consent to have your decisions saved to a file? (yes/no)";
pub const CONSENT_RETRY: &str =
    "Invalid response. Do you consent to have your decisions saved to a file? (yes/no)";
pub const DECISION_PROMPT: &str = "Who should be saved? (passenger(s) [1] or pedestrian(s) [2])";
pub const CONTINUE_PROMPT: &str = "Would you like to continue? (yes/no)";
pub const QUIT_PROMPT: &str = "That's all. Press Enter to quit.";

/// Line-oriented console over any reader/writer pair.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    pub fn banner(&mut self) -> io::Result<()> {
        writeln!(self.output, "{}", "🚦 Crosswalk Decision Engine".bright_cyan().bold())?;
        writeln!(self.output, "{}", "================================".cyan())?;
        writeln!(
            self.output,
            "You will be shown who is in the car and who is on the road."
        )?;
        writeln!(self.output, "Decide who survives.")?;
        writeln!(self.output)
    }

    /// Ask until the answer is exactly `yes` or `no`. Closed input counts as `no`.
    pub fn ask_consent(&mut self) -> io::Result<bool> {
        writeln!(self.output, "{CONSENT_PROMPT}")?;
        loop {
            match self.read_answer()?.as_deref() {
                Some("yes") => return Ok(true),
                Some("no") => return Ok(false),
                Some(_) => writeln!(self.output, "{CONSENT_RETRY}")?,
                None => {
                    log::debug!("input closed before consent was given");
                    return Ok(false);
                }
            }
        }
    }

    /// Show the scenario and ask who to save. Closed input saves passengers.
    pub fn ask_decision(&mut self, scenario: &Scenario) -> io::Result<Decision> {
        writeln!(self.output, "{scenario}")?;
        loop {
            writeln!(self.output, "{DECISION_PROMPT}")?;
            let Some(answer) = self.read_answer()? else {
                return Ok(Decision::Passengers);
            };
            match answer.as_str() {
                "1" => return Ok(Decision::Passengers),
                "2" => return Ok(Decision::Pedestrians),
                other => {
                    if let Ok(decision) = other.parse() {
                        return Ok(decision);
                    }
                }
            }
        }
    }

    /// Closed input means stop.
    pub fn ask_continue(&mut self) -> io::Result<bool> {
        loop {
            writeln!(self.output, "{CONTINUE_PROMPT}")?;
            match self.read_answer()?.as_deref() {
                Some("yes") => return Ok(true),
                Some("no") | None => return Ok(false),
                Some(_) => {}
            }
        }
    }

    pub fn wait_for_enter(&mut self) -> io::Result<()> {
        writeln!(self.output, "{QUIT_PROMPT}")?;
        self.output.flush()?;
        self.read_answer().map(|_| ())
    }

    fn read_answer(&mut self) -> io::Result<Option<String>> {
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

impl<R: BufRead, W: Write> DecisionSource for Console<R, W> {
    fn audit_type(&self) -> AuditType {
        AuditType::User
    }

    fn decide(&mut self, scenario: &Scenario) -> Decision {
        self.ask_decision(scenario).unwrap_or_else(|err| {
            log::warn!("console failed while asking for a decision: {err}");
            Decision::Passengers
        })
    }

    fn continue_auditing(&mut self) -> bool {
        self.ask_continue().unwrap_or_else(|err| {
            log::warn!("console failed while asking to continue: {err}");
            false
        })
    }
}
