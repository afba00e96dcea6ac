use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

use crate::decision::decide;
use crate::scenario::{Decision, Scenario};

/// Who supplied the decisions of an audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuditType {
    #[default]
    Algorithm,
    User,
}

impl AuditType {
    /// Label printed in the report banner.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Algorithm => "Unspecified",
            Self::User => "User",
        }
    }

    /// Interactive audits pause between batches to ask whether to continue.
    #[must_use]
    pub const fn is_interactive(self) -> bool {
        matches!(self, Self::User)
    }
}

impl fmt::Display for AuditType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Source of survival decisions for an audit.
pub trait DecisionSource {
    fn audit_type(&self) -> AuditType;

    /// Pick the group to save; may block on a human answer.
    fn decide(&mut self, scenario: &Scenario) -> Decision;

    /// Asked between batches of interactive audits. `false` ends the audit.
    fn continue_auditing(&mut self) -> bool {
        true
    }
}

/// The importance-weighted decision algorithm.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlgorithmPolicy;

impl DecisionSource for AlgorithmPolicy {
    fn audit_type(&self) -> AuditType {
        AuditType::Algorithm
    }

    fn decide(&mut self, scenario: &Scenario) -> Decision {
        decide(scenario)
    }
}

/// Replays pre-recorded human answers, e.g. from a saved session.
///
/// Once the decisions run out every further scenario saves passengers;
/// once the continue answers run out the audit stops.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPolicy {
    decisions: VecDeque<Decision>,
    answers: VecDeque<bool>,
}

impl ScriptedPolicy {
    #[must_use]
    pub fn new(
        decisions: impl IntoIterator<Item = Decision>,
        answers: impl IntoIterator<Item = bool>,
    ) -> Self {
        Self {
            decisions: decisions.into_iter().collect(),
            answers: answers.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn remaining_decisions(&self) -> usize {
        self.decisions.len()
    }
}

impl DecisionSource for ScriptedPolicy {
    fn audit_type(&self) -> AuditType {
        AuditType::User
    }

    fn decide(&mut self, _scenario: &Scenario) -> Decision {
        self.decisions.pop_front().unwrap_or(Decision::Passengers)
    }

    fn continue_auditing(&mut self) -> bool {
        self.answers.pop_front().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_match_report_banner() {
        assert_eq!(AuditType::Algorithm.to_string(), "Unspecified");
        assert_eq!(AuditType::User.to_string(), "User");
        assert!(AuditType::User.is_interactive());
        assert!(!AuditType::Algorithm.is_interactive());
    }

    #[test]
    fn scripted_policy_replays_then_defaults() {
        let mut policy = ScriptedPolicy::new([Decision::Pedestrians], [true]);
        let scene = Scenario::default();
        assert_eq!(policy.decide(&scene), Decision::Pedestrians);
        assert_eq!(policy.decide(&scene), Decision::Passengers);
        assert!(policy.continue_auditing());
        assert!(!policy.continue_auditing());
        assert_eq!(policy.remaining_decisions(), 0);
    }

    #[test]
    fn algorithm_policy_never_asks_to_stop() {
        let mut policy = AlgorithmPolicy;
        assert!(policy.continue_auditing());
        assert_eq!(policy.decide(&Scenario::default()), Decision::Passengers);
    }
}
