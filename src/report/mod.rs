//! Aggregation of check results into a report and verdict.
//!
//! - [`CheckResults`] collects findings in the order they were produced
//! - [`MajorityRule`] turns them into a [`Verdict`]
//! - [`RunReport`] renders the summary as text or JSON
//!
//! # Example
//!
//! ```
//! use svcheck::checks::CheckResult;
//! use svcheck::report::{CheckResults, MajorityRule, RunReport};
//!
//! let mut results = CheckResults::new();
//! results.insert("environment", CheckResult::pass("environment", "4 checks passed"));
//! results.insert("operations", CheckResult::fail("operations", "1 of 2 checks failed"));
//!
//! let report = RunReport::new("Test Results Summary", results, &MajorityRule::threshold(1));
//! assert!(report.verdict().overall);
//! assert!(report.render(None).contains("Environment"));
//! ```

pub mod results;
pub mod rule;

pub use results::{CheckResults, Finding};
pub use rule::{MajorityRule, Verdict};

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::error::Result;
use crate::ui::{StatusKind, SvcheckTheme};

/// Width the entry names are padded to.
pub const NAME_WIDTH: usize = 25;

/// A finished run. Built once and only read afterwards.
#[derive(Debug, Clone)]
pub struct RunReport {
    title: String,
    results: CheckResults,
    verdict: Verdict,
    generated_at: DateTime<Local>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    title: &'a str,
    generated_at: String,
    entries: Vec<JsonEntry<'a>>,
    verdict: Verdict,
}

#[derive(Serialize)]
struct JsonEntry<'a> {
    name: &'a str,
    passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    outcome: &'a Finding,
}

impl RunReport {
    /// Apply `rule` to `results` and stamp the report.
    pub fn new(title: impl Into<String>, results: CheckResults, rule: &MajorityRule) -> Self {
        let verdict = rule.evaluate(&results);
        Self {
            title: title.into(),
            results,
            verdict,
            generated_at: Local::now(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn results(&self) -> &CheckResults {
        &self.results
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    pub fn generated_at(&self) -> DateTime<Local> {
        self.generated_at
    }

    /// Render the summary. With no theme, markers are bracketed text.
    pub fn render(&self, theme: Option<&SvcheckTheme>) -> String {
        let mut lines = Vec::new();

        for (name, finding) in self.results.iter() {
            let marker = marker(finding, theme);
            lines.push(format!(
                "{:<width$}: {}",
                title_case(name),
                marker,
                width = NAME_WIDTH
            ));
        }

        lines.push("-".repeat(40));
        lines.push(format!(
            "Total: {}/{} passed",
            self.results.passed_count(),
            self.results.len()
        ));

        let verdict = &self.verdict;
        let label = if verdict.overall { "PASS" } else { "FAIL" };
        lines.push(format!(
            "Verdict: {} ({}/{} counted checks passed, {} required)",
            label, verdict.passed, verdict.considered, verdict.required
        ));

        lines.join("\n")
    }

    /// Serialize the report as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        let report = JsonReport {
            title: &self.title,
            generated_at: self.generated_at.to_rfc3339(),
            entries: self
                .results
                .iter()
                .map(|(name, finding)| JsonEntry {
                    name,
                    passed: finding.passed(),
                    message: finding.message(),
                    outcome: finding,
                })
                .collect(),
            verdict: self.verdict,
        };
        serde_json::to_string_pretty(&report).map_err(|e| anyhow::Error::new(e).into())
    }
}

fn marker(finding: &Finding, theme: Option<&SvcheckTheme>) -> String {
    let (kind, label) = match finding {
        Finding::Check(result) => {
            let label = if result.passed { "PASS" } else { "FAIL" };
            (StatusKind::from(result.passed), label)
        }
        Finding::Probe(outcome) => (StatusKind::from(outcome.status()), outcome.status().label()),
    };
    match theme {
        Some(theme) => kind.format(theme, label),
        None => kind.format_plain(label),
    }
}

/// `sequential_thinking` becomes `Sequential Thinking`.
pub fn title_case(name: &str) -> String {
    name.split(['_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
