//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion.
//!
//! # Example
//!
//! ```
//! use svcheck::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.message("Testing filesystem...");
//! ui.success("filesystem: help exited cleanly");
//!
//! assert!(ui.has_message("Testing filesystem"));
//! assert!(ui.has_success("filesystem"));
//! ```

use crate::report::RunReport;

use super::{OutputMode, UserInterface};

/// Mock UI implementation for testing.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    messages: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    headers: Vec<String>,
    reports: Vec<String>,
}

impl MockUI {
    /// Create a new MockUI with Normal output mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new MockUI with a specific output mode.
    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Get all captured messages.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Get all captured success messages.
    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    /// Get all captured warning messages.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Get all captured error messages.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Get all captured headers.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Reports shown, rendered without styling.
    pub fn reports(&self) -> &[String] {
        &self.reports
    }

    /// Check if a specific message was shown.
    pub fn has_message(&self, msg: &str) -> bool {
        self.messages.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific success was shown.
    pub fn has_success(&self, msg: &str) -> bool {
        self.successes.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific warning was shown.
    pub fn has_warning(&self, msg: &str) -> bool {
        self.warnings.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific error was shown.
    pub fn has_error(&self, msg: &str) -> bool {
        self.errors.iter().any(|m| m.contains(msg))
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn show_header(&mut self, title: &str) {
        self.headers.push(title.to_string());
    }

    fn show_report(&mut self, report: &RunReport) {
        self.reports.push(report.render(None));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{CheckResults, MajorityRule};

    #[test]
    fn captures_each_channel() {
        let mut ui = MockUI::new();
        ui.message("msg");
        ui.success("ok");
        ui.warning("careful");
        ui.error("bad");
        ui.show_header("Title");

        assert_eq!(ui.messages(), ["msg"]);
        assert!(ui.has_success("ok"));
        assert!(ui.has_warning("careful"));
        assert!(ui.has_error("bad"));
        assert_eq!(ui.headers(), ["Title"]);
    }

    #[test]
    fn captures_rendered_report() {
        let mut ui = MockUI::with_mode(OutputMode::Quiet);
        let report = RunReport::new("Summary", CheckResults::new(), &MajorityRule::threshold(0));
        ui.show_report(&report);

        assert_eq!(ui.output_mode(), OutputMode::Quiet);
        assert!(ui.reports()[0].contains("Total: 0/0 passed"));
    }
}
