//! Result types produced by checks and backend probes.
//!
//! A check yields a [`CheckResult`]; a backend probe yields a
//! [`ProbeOutcome`]. Both are plain data and serialize into the JSON report.

use serde::Serialize;

/// The result of one named check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    /// Display name (e.g. "Node.js", "environment")
    pub name: String,

    /// Whether the check passed
    pub passed: bool,

    /// Short human-readable detail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Sub-checks, in the order they ran
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<CheckResult>,
}

impl CheckResult {
    /// A passing result.
    pub fn pass(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            message: Some(message.into()),
            details: Vec::new(),
        }
    }

    /// A failing result.
    pub fn fail(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: false,
            message: Some(message.into()),
            details: Vec::new(),
        }
    }

    /// Combine sub-checks: passes only if every sub-check passed.
    ///
    /// All sub-checks are kept in `details` regardless of the verdict.
    pub fn all_of(name: impl Into<String>, details: Vec<CheckResult>) -> Self {
        let passed = details.iter().all(|d| d.passed);
        let failed = details.iter().filter(|d| !d.passed).count();
        let message = if passed {
            format!("{} checks passed", details.len())
        } else {
            format!("{} of {} checks failed", failed, details.len())
        };
        Self {
            name: name.into(),
            passed,
            message: Some(message),
            details,
        }
    }
}

/// Classification of a backend probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeStatus {
    /// Some strategy reached the backend.
    Available,
    /// Every strategy failed.
    Unavailable,
    /// Every strategy failed and at least one timed out without answering.
    Ambiguous,
}

impl ProbeStatus {
    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Unavailable => "unavailable",
            Self::Ambiguous => "ambiguous",
        }
    }
}

/// Why a backend was judged available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Evidence {
    /// A long-lived process was still running after the grace period.
    StillRunning,
    /// The process exited but printed help or usage text.
    UsageText,
    /// `--help` exited with status 0.
    HelpExitZero,
}

impl Evidence {
    /// Display label.
    pub fn describe(self) -> &'static str {
        match self {
            Self::StillRunning => "process started",
            Self::UsageText => "responds with usage text",
            Self::HelpExitZero => "help exited cleanly",
        }
    }
}

/// Outcome of probing one backend.
///
/// Fields are private so the constructors can guarantee that an available
/// outcome always names its strategy and evidence, and that a non-available
/// one never does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeOutcome {
    status: ProbeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    diagnostic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    strategy: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    evidence: Option<Evidence>,
}

impl ProbeOutcome {
    /// Strategy `index` (zero-based) reached the backend.
    pub fn available(index: usize, evidence: Evidence) -> Self {
        Self {
            status: ProbeStatus::Available,
            diagnostic: None,
            strategy: Some(index),
            evidence: Some(evidence),
        }
    }

    /// No strategy reached the backend.
    pub fn unavailable(diagnostic: Option<String>) -> Self {
        Self {
            status: ProbeStatus::Unavailable,
            diagnostic,
            strategy: None,
            evidence: None,
        }
    }

    /// No strategy reached the backend and some attempt hung.
    pub fn ambiguous(diagnostic: Option<String>) -> Self {
        Self {
            status: ProbeStatus::Ambiguous,
            diagnostic,
            strategy: None,
            evidence: None,
        }
    }

    pub fn status(&self) -> ProbeStatus {
        self.status
    }

    pub fn is_available(&self) -> bool {
        self.status == ProbeStatus::Available
    }

    pub fn diagnostic(&self) -> Option<&str> {
        self.diagnostic.as_deref()
    }

    /// Index of the strategy that succeeded.
    pub fn strategy(&self) -> Option<usize> {
        self.strategy
    }

    pub fn evidence(&self) -> Option<Evidence> {
        self.evidence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_of_passes_when_every_detail_passes() {
        let result = CheckResult::all_of(
            "environment",
            vec![
                CheckResult::pass("Node.js", "v18.17.0"),
                CheckResult::pass("Python", "3.11.4"),
            ],
        );
        assert!(result.passed);
        assert_eq!(result.details.len(), 2);
    }

    #[test]
    fn all_of_keeps_details_on_failure() {
        let result = CheckResult::all_of(
            "environment",
            vec![
                CheckResult::pass("Node.js", "v18.17.0"),
                CheckResult::fail("Editor settings", "not found"),
                CheckResult::pass("Python", "3.11.4"),
            ],
        );
        assert!(!result.passed);
        assert_eq!(result.message.as_deref(), Some("1 of 3 checks failed"));
        let names: Vec<&str> = result.details.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Node.js", "Editor settings", "Python"]);
    }

    #[test]
    fn available_outcome_carries_strategy_and_evidence() {
        let outcome = ProbeOutcome::available(1, Evidence::UsageText);
        assert!(outcome.is_available());
        assert_eq!(outcome.strategy(), Some(1));
        assert_eq!(outcome.evidence(), Some(Evidence::UsageText));
        assert_eq!(outcome.diagnostic(), None);
    }

    #[test]
    fn unavailable_outcome_has_no_strategy() {
        let outcome = ProbeOutcome::unavailable(Some("boom".to_string()));
        assert_eq!(outcome.status(), ProbeStatus::Unavailable);
        assert_eq!(outcome.strategy(), None);
        assert_eq!(outcome.evidence(), None);
        assert_eq!(outcome.diagnostic(), Some("boom"));
    }

    #[test]
    fn ambiguous_is_not_available() {
        let outcome = ProbeOutcome::ambiguous(None);
        assert!(!outcome.is_available());
        assert_eq!(outcome.status().label(), "ambiguous");
    }

    #[test]
    fn outcome_serializes_without_empty_fields() {
        let json = serde_json::to_value(ProbeOutcome::available(0, Evidence::StillRunning)).unwrap();
        assert_eq!(json["status"], "available");
        assert_eq!(json["evidence"], "still_running");
        assert!(json.get("diagnostic").is_none());
    }
}
