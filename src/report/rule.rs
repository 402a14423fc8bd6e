//! Weighted-majority pass/fail rule.

use serde::{Deserialize, Serialize};

use super::results::CheckResults;

/// Pass when at least `minimum` of the considered entries passed.
///
/// With `critical` unset every entry is considered. With a name list, only
/// those names are considered and a name with no result counts as failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MajorityRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critical: Option<Vec<String>>,
    pub minimum: usize,
}

impl MajorityRule {
    /// Consider only `names`.
    pub fn critical<I, S>(names: I, minimum: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            critical: Some(names.into_iter().map(Into::into).collect()),
            minimum,
        }
    }

    /// Consider every entry.
    pub fn threshold(minimum: usize) -> Self {
        Self {
            critical: None,
            minimum,
        }
    }

    pub fn evaluate(&self, results: &CheckResults) -> Verdict {
        let (passed, considered) = match &self.critical {
            Some(names) => (
                names.iter().filter(|n| results.passed(n)).count(),
                names.len(),
            ),
            None => (results.passed_count(), results.len()),
        };

        Verdict {
            passed,
            considered,
            required: self.minimum,
            overall: passed >= self.minimum,
        }
    }
}

/// Result of applying a [`MajorityRule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Verdict {
    /// Passing entries among those considered
    pub passed: usize,
    /// Entries the rule looked at
    pub considered: usize,
    /// Passes needed
    pub required: usize,
    pub overall: bool,
}
