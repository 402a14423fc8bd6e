//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. Both commands share
//! [`CheckContext`] for config loading and the final report.

pub mod connectivity;
pub mod context;
pub mod dispatcher;
pub mod suite;

pub use context::{CheckContext, CONFIG_ERROR_EXIT};
pub use dispatcher::{Command, CommandDispatcher, CommandResult};
