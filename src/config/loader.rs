//! Configuration file discovery and loading.
//!
//! svcheck reads at most one file: `--config <FILE>` when given, otherwise
//! `.svcheck/config.yml` under the project root if it exists. With neither,
//! the built-in defaults are used.

use crate::config::schema::SvcheckConfig;
use crate::config::validator::validate;
use crate::error::{Result, SvcheckError};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory holding svcheck's own configuration.
pub const CONFIG_DIR: &str = ".svcheck";

/// File name of the project configuration.
pub const CONFIG_FILE: &str = "config.yml";

/// Default configuration path for a project root.
pub fn default_config_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_DIR).join(CONFIG_FILE)
}

/// Load and validate the configuration for a project.
///
/// An explicit path must exist. The default path is optional.
pub fn load_config(project_root: &Path, explicit: Option<&Path>) -> Result<SvcheckConfig> {
    let config = match explicit {
        Some(path) => load_config_file(path)?,
        None => {
            let path = default_config_path(project_root);
            if path.exists() {
                load_config_file(&path)?
            } else {
                tracing::debug!("no config at {}, using defaults", path.display());
                SvcheckConfig::default()
            }
        }
    };

    validate(&config)?;
    Ok(config)
}

/// Load a single config file without validating it.
pub fn load_config_file(path: &Path) -> Result<SvcheckConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SvcheckError::ConfigurationMissing {
                path: path.to_path_buf(),
            }
        } else {
            SvcheckError::Io(e)
        }
    })?;

    tracing::debug!("loaded config from {}", path.display());
    parse_config(&content, path)
}

/// Parse YAML content into `SvcheckConfig`.
///
/// # Arguments
///
/// * `content` - The YAML content to parse
/// * `source_path` - Path for error reporting
pub fn parse_config(content: &str, source_path: &Path) -> Result<SvcheckConfig> {
    if content.trim().is_empty() {
        return Ok(SvcheckConfig::default());
    }

    serde_yaml::from_str(content).map_err(|e| SvcheckError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}
