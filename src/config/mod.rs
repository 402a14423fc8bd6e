//! Configuration loading, parsing, and validation for svcheck.
//!
//! - Schema definitions and built-in defaults in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Validation in [`validator`]
//! - `${variable}` resolution in [`interpolation`]
//! - Editor settings access in [`editor`]
//!
//! # Example
//!
//! ```
//! use svcheck::config::{load_config, validate};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let dir = temp.path().join(".svcheck");
//! fs::create_dir_all(&dir).unwrap();
//! fs::write(dir.join("config.yml"), "settings:\n  grace_period_ms: 500\n").unwrap();
//!
//! let config = load_config(temp.path(), None).unwrap();
//! validate(&config).unwrap();
//! assert_eq!(config.settings.grace_period_ms, 500);
//! ```

pub mod editor;
pub mod interpolation;
pub mod loader;
pub mod schema;
pub mod validator;

pub use editor::EditorSettings;
pub use interpolation::{
    parse_interpolation, resolve_config, resolve_string, InterpolationContext, Segment,
};
pub use loader::{
    default_config_path, load_config, load_config_file, parse_config, CONFIG_DIR, CONFIG_FILE,
};
pub use schema::{
    BackendSpec, LaunchStrategy, RulesConfig, Settings, StrategyKind, SvcheckConfig,
    ToolchainConfig,
};
pub use validator::{validate, validate_config, ValidationError};
