//! Error types for svcheck operations.
//!
//! This module defines [`SvcheckError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Checks never propagate errors out of a run: each check converts its
//!   errors into a failed [`CheckResult`](crate::checks::CheckResult)
//! - Use `SvcheckError` for failures that need distinct messages
//! - Use `anyhow::Error` (via `SvcheckError::Other`) for unexpected errors

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Core error type for svcheck operations.
#[derive(Debug, Error)]
pub enum SvcheckError {
    /// Executable not found or failed to start.
    #[error("Failed to launch '{command}': {source}")]
    LaunchFailure {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Process did not complete within its bound.
    #[error("'{command}' timed out after {}s", timeout.as_secs_f64())]
    Timeout { command: String, timeout: Duration },

    /// Process exited unsuccessfully.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// Scratch file contents differ from what was written.
    #[error("Content mismatch reading back {path}")]
    ContentMismatch { path: PathBuf },

    /// A configuration file is absent.
    #[error("Configuration not found: {path}")]
    ConfigurationMissing { path: PathBuf },

    /// A configuration file parsed but lacks a required key.
    #[error("Missing key '{key}' in {path}")]
    ConfigKeyMissing { path: PathBuf, key: String },

    /// Failed to parse a configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for svcheck operations.
pub type Result<T> = std::result::Result<T, SvcheckError>;
