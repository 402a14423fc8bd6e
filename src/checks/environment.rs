//! Workspace environment checks.
//!
//! A fixed battery run once per suite: toolchain version queries, the
//! source-control status of the workspace, and the editor settings file.
//! Every sub-check runs even if an earlier one failed.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::checks::status::CheckResult;
use crate::config::schema::{Settings, ToolchainConfig};
use crate::config::EditorSettings;
use crate::error::SvcheckError;
use crate::shell::{CommandSpec, ProcessRunner};

/// Name of the combined result.
pub const ENVIRONMENT: &str = "environment";

static VERSION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\d+(\.\d+)?").expect("VERSION_REGEX must compile"));

/// Runs the environment battery against a workspace.
pub struct EnvironmentCheck<'a> {
    runner: &'a dyn ProcessRunner,
    workspace: &'a Path,
    settings: &'a Settings,
    toolchains: &'a [ToolchainConfig],
}

impl<'a> EnvironmentCheck<'a> {
    pub fn new(
        runner: &'a dyn ProcessRunner,
        workspace: &'a Path,
        settings: &'a Settings,
        toolchains: &'a [ToolchainConfig],
    ) -> Self {
        Self {
            runner,
            workspace,
            settings,
            toolchains,
        }
    }

    /// Run every sub-check and combine them.
    pub fn run(&self) -> CheckResult {
        let mut details: Vec<CheckResult> = self
            .toolchains
            .iter()
            .map(|t| self.check_toolchain(t))
            .collect();
        details.push(self.check_repository());
        details.push(self.check_editor_settings());

        CheckResult::all_of(ENVIRONMENT, details)
    }

    /// Version query: passes on exit 0 with some output.
    pub fn check_toolchain(&self, toolchain: &ToolchainConfig) -> CheckResult {
        let spec = CommandSpec::new(&toolchain.command)
            .args(&toolchain.args)
            .cwd(self.workspace);

        let output = match self.runner.run(&spec, self.settings.command_timeout()) {
            Ok(output) => output,
            Err(e) => {
                tracing::debug!(toolchain = %toolchain.name, error = %e, "version query failed");
                return CheckResult::fail(&toolchain.name, "not available");
            }
        };

        // Some tools (older Pythons) print their version on stderr.
        let text = if output.stdout.trim().is_empty() {
            output.stderr.trim()
        } else {
            output.stdout.trim()
        };

        if !output.success() || text.is_empty() {
            return CheckResult::fail(&toolchain.name, "not available");
        }

        CheckResult::pass(&toolchain.name, extract_version(text))
    }

    /// `git status --porcelain` in the workspace.
    pub fn check_repository(&self) -> CheckResult {
        const NAME: &str = "Git repository";

        let spec = CommandSpec::new("git")
            .args(["status", "--porcelain"])
            .cwd(self.workspace);

        match self.runner.run(&spec, self.settings.command_timeout()) {
            Ok(output) if output.success() => {
                let status = if output.stdout.trim().is_empty() {
                    "clean"
                } else {
                    "has changes"
                };
                CheckResult::pass(NAME, status)
            }
            Ok(_) => CheckResult::fail(NAME, "not accessible"),
            Err(e) => CheckResult::fail(NAME, e.to_string()),
        }
    }

    /// The editor settings file must exist, parse, and declare the key.
    pub fn check_editor_settings(&self) -> CheckResult {
        const NAME: &str = "Editor settings";

        let path = self.workspace.join(&self.settings.editor_settings);
        let key = &self.settings.editor_settings_key;

        let count = EditorSettings::load(&path).and_then(|settings| settings.count(key));
        match count {
            Ok(count) => CheckResult::pass(NAME, format!("{} servers configured", count)),
            Err(SvcheckError::ConfigurationMissing { .. }) => CheckResult::fail(NAME, "not found"),
            Err(SvcheckError::ConfigParseError { message, .. }) => {
                CheckResult::fail(NAME, format!("invalid JSON: {}", message))
            }
            Err(SvcheckError::ConfigKeyMissing { key, .. }) => {
                CheckResult::fail(NAME, format!("missing key '{}'", key))
            }
            Err(e) => CheckResult::fail(NAME, e.to_string()),
        }
    }
}

/// The first dotted version number in `text`, or its first line.
pub fn extract_version(text: &str) -> String {
    match VERSION_REGEX.find(text) {
        Some(m) => m.as_str().to_string(),
        None => text.lines().next().unwrap_or_default().trim().to_string(),
    }
}
