//! Command-line interface for svcheck.
//!
//! This module provides the CLI argument parsing using clap's derive macros
//! and command implementations.
//!
//! # Architecture
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, ConnectivityArgs, SuiteArgs};
pub use commands::{CheckContext, Command, CommandDispatcher, CommandResult, CONFIG_ERROR_EXIT};
