//! Variable interpolation for launch commands.
//!
//! Commands and arguments may reference `${variable}`:
//!
//! - `${workspace}` - the workspace root being checked
//! - `${home}` - the user's home directory
//! - `${local_bin}` - `${home}/.local/bin`
//! - `${env.NAME}` - environment variable `NAME`
//!
//! `$${text}` produces a literal `${text}`.

use crate::config::schema::{BackendSpec, SvcheckConfig, ToolchainConfig};
use crate::error::{Result, SvcheckError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A segment of an interpolated string.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Literal text
    Literal(String),
    /// Variable reference: ${name}
    Variable(String),
}

/// Split a string into literal and `${variable}` segments.
pub fn parse_interpolation(input: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = input;

    while let Some(pos) = rest.find('$') {
        literal.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if let Some(escaped) = tail.strip_prefix("$${") {
            literal.push_str("${");
            rest = escaped;
        } else if let Some(body) = tail.strip_prefix("${") {
            match body.find('}') {
                Some(end) => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Variable(body[..end].to_string()));
                    rest = &body[end + 1..];
                }
                None => {
                    // Unterminated reference is kept verbatim.
                    literal.push_str(tail);
                    rest = "";
                }
            }
        } else {
            literal.push('$');
            rest = &tail[1..];
        }
    }
    literal.push_str(rest);

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    segments
}

/// Variables available to launch commands.
#[derive(Debug, Clone, Default)]
pub struct InterpolationContext {
    /// Built-in variables (workspace, home, local_bin)
    pub builtins: HashMap<String, String>,

    /// Environment variables, looked up as `env.NAME`
    pub env: HashMap<String, String>,
}

impl InterpolationContext {
    /// Build a context for `workspace` using the process environment.
    pub fn for_workspace(workspace: &Path) -> Self {
        Self::with_env(workspace, std::env::vars().collect())
    }

    /// Build a context for `workspace` with an explicit environment.
    pub fn with_env(workspace: &Path, env: HashMap<String, String>) -> Self {
        let mut builtins = HashMap::new();
        builtins.insert("workspace".to_string(), workspace.display().to_string());

        let home = env
            .get("HOME")
            .or_else(|| env.get("USERPROFILE"))
            .map(PathBuf::from);
        if let Some(home) = home {
            builtins.insert(
                "local_bin".to_string(),
                home.join(".local").join("bin").display().to_string(),
            );
            builtins.insert("home".to_string(), home.display().to_string());
        }

        Self { builtins, env }
    }

    /// Resolve a variable name to its value.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        let value = match name.strip_prefix("env.") {
            Some(var) => self.env.get(var),
            None => self.builtins.get(name),
        };
        value.map(String::as_str)
    }
}

/// Resolve all variables in `input`.
///
/// # Errors
///
/// Returns `ConfigValidationError` if a variable is not defined.
pub fn resolve_string(input: &str, context: &InterpolationContext) -> Result<String> {
    let mut result = String::new();
    for segment in parse_interpolation(input) {
        match segment {
            Segment::Literal(text) => result.push_str(&text),
            Segment::Variable(name) => {
                let value =
                    context
                        .resolve(&name)
                        .ok_or_else(|| SvcheckError::ConfigValidationError {
                            message: format!("Unresolved variable: ${{{}}}", name),
                        })?;
                result.push_str(value);
            }
        }
    }
    Ok(result)
}

/// Resolve every command and argument in `config`.
pub fn resolve_config(config: &SvcheckConfig, context: &InterpolationContext) -> Result<SvcheckConfig> {
    let mut resolved = config.clone();
    for toolchain in &mut resolved.toolchains {
        resolve_toolchain(toolchain, context)?;
    }
    for backend in resolved
        .backends
        .iter_mut()
        .chain(resolved.connectivity.iter_mut())
    {
        resolve_backend(backend, context)?;
    }
    Ok(resolved)
}

fn resolve_toolchain(toolchain: &mut ToolchainConfig, context: &InterpolationContext) -> Result<()> {
    toolchain.command = resolve_string(&toolchain.command, context)?;
    for arg in &mut toolchain.args {
        *arg = resolve_string(arg, context)?;
    }
    Ok(())
}

fn resolve_backend(backend: &mut BackendSpec, context: &InterpolationContext) -> Result<()> {
    for strategy in &mut backend.strategies {
        strategy.command = resolve_string(&strategy.command, context)?;
        for arg in &mut strategy.args {
            *arg = resolve_string(arg, context)?;
        }
    }
    Ok(())
}
