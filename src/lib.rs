//! svcheck - Health checks for the tool servers a workspace depends on.
//!
//! svcheck probes each configured backend through an ordered list of launch
//! strategies, runs environment and operation checks against the workspace,
//! and reduces everything to a pass/fail verdict with a weighted-majority
//! rule.
//!
//! # Modules
//!
//! - [`checks`] - Backend probes, environment checks, and workspace operations
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, parsing, and validation
//! - [`error`] - Error types and result aliases
//! - [`report`] - Result aggregation, verdicts, and rendering
//! - [`runner`] - Suite orchestration
//! - [`shell`] - Process execution with bounded waits
//! - [`ui`] - Terminal output
//!
//! # Example
//!
//! ```
//! use svcheck::config::{resolve_string, InterpolationContext};
//! use std::collections::HashMap;
//! use std::path::Path;
//!
//! let mut env = HashMap::new();
//! env.insert("HOME".to_string(), "/home/dev".to_string());
//! let ctx = InterpolationContext::with_env(Path::new("/work/app"), env);
//!
//! let command = resolve_string("${local_bin}/mcp-server-git", &ctx).unwrap();
//! assert_eq!(command, "/home/dev/.local/bin/mcp-server-git");
//! ```

pub mod checks;
pub mod cli;
pub mod config;
pub mod error;
pub mod report;
pub mod runner;
pub mod shell;
pub mod ui;

pub use error::{Result, SvcheckError};
