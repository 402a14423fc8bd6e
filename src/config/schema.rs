//! Configuration schema definitions for svcheck.
//!
//! This module contains the struct definitions that map to the YAML
//! configuration file format. Every section is optional; a missing section
//! takes its built-in default, which mirrors the MCP server setup the tool
//! was written for.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::report::MajorityRule;

/// Root configuration structure for `.svcheck/config.yml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SvcheckConfig {
    /// Global settings
    pub settings: Settings,

    /// Version queries run by the environment check
    pub toolchains: Vec<ToolchainConfig>,

    /// Backends probed by the full suite
    pub backends: Vec<BackendSpec>,

    /// Backends probed by the connectivity suite
    pub connectivity: Vec<BackendSpec>,

    /// Pass/fail rules
    pub rules: RulesConfig,
}

impl Default for SvcheckConfig {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            toolchains: default_toolchains(),
            backends: default_backends(),
            connectivity: default_connectivity(),
            rules: RulesConfig::default(),
        }
    }
}

/// Global settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// How long a long-lived strategy must stay up to count as serving
    pub grace_period_ms: u64,

    /// Window between terminate and force-kill
    pub kill_grace_ms: u64,

    /// Timeout for environment and operation commands
    pub command_timeout_secs: u64,

    /// Editor settings file, relative to the workspace
    pub editor_settings: PathBuf,

    /// Key the editor settings file must contain
    pub editor_settings_key: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grace_period_ms: 1000,
            kill_grace_ms: 2000,
            command_timeout_secs: 5,
            editor_settings: PathBuf::from(".vscode").join("settings.json"),
            editor_settings_key: "mcp.servers".to_string(),
        }
    }
}

impl Settings {
    /// Grace period as a duration.
    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(self.grace_period_ms)
    }

    /// Kill grace as a duration.
    pub fn kill_grace(&self) -> Duration {
        Duration::from_millis(self.kill_grace_ms)
    }

    /// Command timeout as a duration.
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }
}

/// A toolchain whose version query must succeed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolchainConfig {
    /// Display name (e.g. "Node.js")
    pub name: String,

    /// Executable to run
    pub command: String,

    /// Arguments for the version query
    #[serde(default = "default_version_args")]
    pub args: Vec<String>,
}

/// A backend and the ordered ways to reach it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendSpec {
    /// Unique name within a suite; also the result key
    pub name: String,

    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Launch strategies, tried in order
    pub strategies: Vec<LaunchStrategy>,
}

/// One concrete way to launch or query a backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchStrategy {
    /// Executable name or path
    pub command: String,

    /// Fixed argument vector
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,

    /// How the strategy is classified
    pub kind: StrategyKind,

    /// Bound on a help-flag run
    #[serde(default = "default_strategy_timeout")]
    pub timeout_secs: u64,
}

impl LaunchStrategy {
    /// A help-flag strategy with the default timeout.
    pub fn help_flag<I, S>(command: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            command: command.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            kind: StrategyKind::HelpFlag,
            timeout_secs: default_strategy_timeout(),
        }
    }

    /// A long-lived process strategy with the default timeout.
    pub fn long_lived<I, S>(command: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: StrategyKind::LongLived,
            ..Self::help_flag(command, args)
        }
    }

    /// Timeout as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// How a strategy's process is judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// A stdio server: alive after the grace period means available.
    LongLived,
    /// Run with `--help`: exit 0 means available.
    HelpFlag,
}

/// Rules for the two suites.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Rule for the full suite
    pub suite: MajorityRule,

    /// Rule for the connectivity suite
    pub connectivity: MajorityRule,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            suite: MajorityRule::critical(["environment", "filesystem", "git", "operations"], 3),
            connectivity: MajorityRule::threshold(2),
        }
    }
}

fn default_version_args() -> Vec<String> {
    vec!["--version".to_string()]
}

fn default_strategy_timeout() -> u64 {
    5
}

fn default_toolchains() -> Vec<ToolchainConfig> {
    vec![
        ToolchainConfig {
            name: "Node.js".to_string(),
            command: "node".to_string(),
            args: default_version_args(),
        },
        ToolchainConfig {
            name: "Python".to_string(),
            command: "python3".to_string(),
            args: default_version_args(),
        },
    ]
}

fn default_backends() -> Vec<BackendSpec> {
    vec![
        BackendSpec {
            name: "filesystem".to_string(),
            description: Some("File access scoped to the workspace".to_string()),
            strategies: vec![
                LaunchStrategy::help_flag("npx", ["@modelcontextprotocol/server-filesystem"]),
                LaunchStrategy::help_flag("${local_bin}/mcp-server-filesystem", Vec::<String>::new()),
            ],
        },
        BackendSpec {
            name: "git".to_string(),
            description: Some("Repository queries".to_string()),
            strategies: vec![
                LaunchStrategy::help_flag("python3", ["-m", "mcp_server_git"]),
                LaunchStrategy::help_flag("${local_bin}/mcp-server-git", Vec::<String>::new()),
            ],
        },
        BackendSpec {
            name: "memory".to_string(),
            description: Some("Persistent memory across sessions".to_string()),
            strategies: vec![LaunchStrategy::help_flag(
                "npx",
                ["@modelcontextprotocol/server-memory"],
            )],
        },
        BackendSpec {
            name: "sequential_thinking".to_string(),
            description: Some("Enhanced reasoning capabilities".to_string()),
            strategies: vec![LaunchStrategy::help_flag(
                "npx",
                ["@modelcontextprotocol/server-sequential-thinking"],
            )],
        },
    ]
}

fn default_connectivity() -> Vec<BackendSpec> {
    let server = |name: &str, command: &str, args: &[&str]| BackendSpec {
        name: name.to_string(),
        description: None,
        strategies: vec![LaunchStrategy::long_lived(command, args.iter().copied())],
    };
    vec![
        server(
            "Filesystem MCP",
            "npx",
            &["@modelcontextprotocol/server-filesystem", "${workspace}"],
        ),
        server(
            "Git MCP",
            "python3",
            &["-m", "mcp_server_git", "--repository", "${workspace}"],
        ),
        server("Memory MCP", "npx", &["@modelcontextprotocol/server-memory"]),
        server(
            "Sequential Thinking MCP",
            "npx",
            &["@modelcontextprotocol/server-sequential-thinking"],
        ),
    ]
}
