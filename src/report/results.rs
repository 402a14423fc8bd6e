//! Ordered collection of check and probe results.

use serde::Serialize;

use crate::checks::{CheckResult, ProbeOutcome};

/// One entry in a run: a check result or a backend probe outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    Check(CheckResult),
    Probe(ProbeOutcome),
}

impl Finding {
    /// Whether this entry counts as a pass.
    pub fn passed(&self) -> bool {
        match self {
            Self::Check(result) => result.passed,
            Self::Probe(outcome) => outcome.is_available(),
        }
    }

    /// Short detail line, if any.
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Check(result) => result.message.clone(),
            Self::Probe(outcome) => match outcome.evidence() {
                Some(evidence) => Some(evidence.describe().to_string()),
                None => outcome.diagnostic().map(str::to_string),
            },
        }
    }
}

impl From<CheckResult> for Finding {
    fn from(result: CheckResult) -> Self {
        Self::Check(result)
    }
}

impl From<ProbeOutcome> for Finding {
    fn from(outcome: ProbeOutcome) -> Self {
        Self::Probe(outcome)
    }
}

/// Results keyed by name, in insertion order.
///
/// Keys are unique: inserting an existing name replaces its finding
/// without moving it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckResults {
    entries: Vec<(String, Finding)>,
}

impl CheckResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finding under `name`.
    pub fn insert(&mut self, name: impl Into<String>, finding: impl Into<Finding>) {
        let name = name.into();
        let finding = finding.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = finding,
            None => self.entries.push((name, finding)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Finding> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, finding)| finding)
    }

    /// Whether `name` was recorded and passed. Missing names count as failed.
    pub fn passed(&self, name: &str) -> bool {
        self.get(name).is_some_and(Finding::passed)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Finding)> {
        self.entries.iter().map(|(n, f)| (n.as_str(), f))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries that passed.
    pub fn passed_count(&self) -> usize {
        self.entries.iter().filter(|(_, f)| f.passed()).count()
    }
}
