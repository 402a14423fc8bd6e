//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// svcheck - Health checks for the tool servers a workspace depends on.
#[derive(Debug, Parser)]
#[command(name = "svcheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides default .svcheck/config.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the workspace to check (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the full check suite (default if no command specified)
    Suite(SuiteArgs),

    /// Check that each backend starts and stays up
    Connectivity(ConnectivityArgs),
}

/// Arguments for the `suite` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct SuiteArgs {
    /// Only probe these backends (repeatable)
    #[arg(short, long = "backend", value_name = "NAME")]
    pub backends: Vec<String>,
}

/// Arguments for the `connectivity` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConnectivityArgs {
    /// How long a backend must stay up, in milliseconds
    #[arg(long, value_name = "MS")]
    pub grace_ms: Option<u64>,
}
