//! Health checks.
//!
//! - [`backend`] probes a backend through its launch strategies
//! - [`environment`] checks toolchains, source control, and editor settings
//! - [`operations`] exercises the workspace with harmless operations
//! - [`status`] holds the result types they produce

pub mod backend;
pub mod environment;
pub mod operations;
pub mod status;

pub use backend::{BackendProbe, DIAGNOSTIC_CHARS, HELP_FLAG};
pub use environment::{extract_version, EnvironmentCheck, ENVIRONMENT};
pub use operations::{
    round_trip, round_trip_with, OperationCheck, ScratchFile, OPERATIONS, SCRATCH_CONTENT,
};
pub use status::{CheckResult, Evidence, ProbeOutcome, ProbeStatus};
