//! Styled terminal UI.

use console::Term;
use std::io::Write;

use crate::report::RunReport;

use super::{should_use_colors, NonInteractiveUI, OutputMode, SvcheckTheme, UserInterface};

/// Terminal UI implementation.
pub struct TerminalUI {
    term: Term,
    theme: SvcheckTheme,
    mode: OutputMode,
}

impl TerminalUI {
    /// Create a new terminal UI.
    pub fn new(mode: OutputMode) -> Self {
        let theme = if should_use_colors() {
            SvcheckTheme::new()
        } else {
            SvcheckTheme::plain()
        };

        Self {
            term: Term::stdout(),
            theme,
            mode,
        }
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "{}", msg).ok();
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "{}", self.theme.format_success(msg)).ok();
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "{}", self.theme.format_warning(msg)).ok();
        }
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.term, "{}", self.theme.format_error(msg)).ok();
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "{}", self.theme.format_header(title)).ok();
        }
    }

    fn show_report(&mut self, report: &RunReport) {
        if self.mode.shows_status() {
            writeln!(self.term).ok();
            writeln!(self.term, "{}", self.theme.format_header(report.title())).ok();
            writeln!(self.term, "{}", report.render(Some(&self.theme))).ok();
        }
    }
}

/// Create the appropriate UI based on context.
pub fn create_ui(interactive: bool, mode: OutputMode) -> Box<dyn UserInterface> {
    if interactive && Term::stdout().is_term() {
        Box::new(TerminalUI::new(mode))
    } else {
        Box::new(NonInteractiveUI::new(mode))
    }
}
