//! Configuration validation rules.
//!
//! - Backend names must be unique within a suite
//! - Every backend needs at least one strategy
//! - Strategy commands must be non-empty and timeouts positive
//! - A rule's minimum cannot exceed its critical subset

use crate::config::schema::{BackendSpec, SvcheckConfig};
use crate::error::{Result, SvcheckError};
use crate::report::MajorityRule;
use std::collections::HashSet;

/// Validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Human-readable error message
    pub message: String,
    /// Backend name if error is backend-specific
    pub backend: Option<String>,
}

/// Validate a configuration and return all errors.
pub fn validate_config(config: &SvcheckConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    errors.extend(validate_backends("backends", &config.backends));
    errors.extend(validate_backends("connectivity", &config.connectivity));
    errors.extend(validate_rule("suite", &config.rules.suite));
    errors.extend(validate_rule("connectivity", &config.rules.connectivity));

    for toolchain in &config.toolchains {
        if toolchain.command.trim().is_empty() {
            errors.push(ValidationError {
                rule: "empty-command".to_string(),
                message: format!("Toolchain '{}' has an empty command", toolchain.name),
                backend: None,
            });
        }
    }

    errors
}

/// Validate a configuration, failing with every error joined.
pub fn validate(config: &SvcheckConfig) -> Result<()> {
    let errors = validate_config(config);
    if errors.is_empty() {
        return Ok(());
    }
    Err(SvcheckError::ConfigValidationError {
        message: errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; "),
    })
}

fn validate_backends(section: &str, backends: &[BackendSpec]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for backend in backends {
        if !seen.insert(backend.name.as_str()) {
            errors.push(ValidationError {
                rule: "duplicate-backend".to_string(),
                message: format!("Backend '{}' is defined twice in {}", backend.name, section),
                backend: Some(backend.name.clone()),
            });
        }

        if backend.strategies.is_empty() {
            errors.push(ValidationError {
                rule: "no-strategies".to_string(),
                message: format!("Backend '{}' has no launch strategies", backend.name),
                backend: Some(backend.name.clone()),
            });
        }

        for (index, strategy) in backend.strategies.iter().enumerate() {
            if strategy.command.trim().is_empty() {
                errors.push(ValidationError {
                    rule: "empty-command".to_string(),
                    message: format!(
                        "Backend '{}' strategy {} has an empty command",
                        backend.name,
                        index + 1
                    ),
                    backend: Some(backend.name.clone()),
                });
            }
            if strategy.timeout_secs == 0 {
                errors.push(ValidationError {
                    rule: "zero-timeout".to_string(),
                    message: format!(
                        "Backend '{}' strategy {} has a zero timeout",
                        backend.name,
                        index + 1
                    ),
                    backend: Some(backend.name.clone()),
                });
            }
        }
    }

    errors
}

fn validate_rule(name: &str, rule: &MajorityRule) -> Vec<ValidationError> {
    match &rule.critical {
        Some(critical) if rule.minimum > critical.len() => vec![ValidationError {
            rule: "unreachable-minimum".to_string(),
            message: format!(
                "Rule '{}' requires {} passes but names only {} critical checks",
                name,
                rule.minimum,
                critical.len()
            ),
            backend: None,
        }],
        _ => Vec::new(),
    }
}
