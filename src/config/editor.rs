//! Editor settings file access.
//!
//! The environment check only needs to know that the editor's JSON settings
//! exist and declare the backends; nothing here writes to the file.

use crate::error::{Result, SvcheckError};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// A parsed editor settings file.
#[derive(Debug, Clone)]
pub struct EditorSettings {
    path: PathBuf,
    value: Value,
}

impl EditorSettings {
    /// Read and parse the settings file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SvcheckError::ConfigurationMissing {
                    path: path.to_path_buf(),
                }
            } else {
                SvcheckError::Io(e)
            }
        })?;

        Self::parse(&content, path)
    }

    /// Parse settings content; `path` is used for error reporting.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let value = serde_json::from_str(content).map_err(|e| SvcheckError::ConfigParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            value,
        })
    }

    /// Look up a literal top-level key (dots are part of the key).
    pub fn get(&self, key: &str) -> Result<&Value> {
        self.value
            .get(key)
            .ok_or_else(|| SvcheckError::ConfigKeyMissing {
                path: self.path.clone(),
                key: key.to_string(),
            })
    }

    /// Number of entries configured under `key`.
    pub fn count(&self, key: &str) -> Result<usize> {
        Ok(match self.get(key)? {
            Value::Object(map) => map.len(),
            Value::Array(items) => items.len(),
            Value::Null => 0,
            _ => 1,
        })
    }

    /// Path the settings were read from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
