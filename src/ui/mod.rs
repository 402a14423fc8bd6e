//! Terminal output.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for styled terminal output
//! - [`NonInteractiveUI`] for pipes, CI logs, and `--no-color`
//! - [`MockUI`] for capturing output in tests
//!
//! # Example
//!
//! ```
//! use svcheck::ui::{create_ui, OutputMode};
//!
//! let mut ui = create_ui(false, OutputMode::Quiet);
//! ui.show_header("MCP Server Connectivity Test");
//! ui.success("Filesystem MCP: process started");
//! ```

pub mod icons;
pub mod mock;
pub mod non_interactive;
pub mod output;
pub mod terminal;
pub mod theme;

pub use icons::StatusKind;
pub use mock::MockUI;
pub use non_interactive::NonInteractiveUI;
pub use output::OutputMode;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, SvcheckTheme};

use crate::report::RunReport;

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);

    /// Show a header/banner.
    fn show_header(&mut self, title: &str);

    /// Show the summary of a finished run.
    fn show_report(&mut self, report: &RunReport);
}
