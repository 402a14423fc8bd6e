//! Plain UI for pipes, CI logs, and `--no-color`.

use crate::report::RunReport;

use super::{OutputMode, StatusKind, UserInterface};

/// UI implementation without styling.
///
/// Status lines use bracketed markers so they stay greppable in logs.
/// Warnings and errors go to stderr.
pub struct NonInteractiveUI {
    mode: OutputMode,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", StatusKind::Success.format_plain(msg));
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("{}", StatusKind::Warning.format_plain(msg));
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("{}", StatusKind::Failed.format_plain(msg));
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            println!("{}", "=".repeat(60));
            println!("{}", title);
            println!("{}", "=".repeat(60));
        }
    }

    fn show_report(&mut self, report: &RunReport) {
        if self.mode.shows_status() {
            println!();
            self.show_header(report.title());
            println!("{}", report.render(None));
        }
    }
}
