//! Suite orchestration.
//!
//! The full suite runs the environment battery, probes every configured
//! backend, then runs the operation battery. The connectivity suite only
//! probes the long-lived connectivity backends. Both run strictly in order
//! on the calling thread and always finish with a report.

use std::path::Path;

use chrono::Local;

use crate::checks::{
    BackendProbe, CheckResult, EnvironmentCheck, OperationCheck, ProbeOutcome, ProbeStatus,
    ENVIRONMENT, OPERATIONS,
};
use crate::config::schema::{BackendSpec, SvcheckConfig};
use crate::report::{CheckResults, RunReport};
use crate::shell::ProcessRunner;
use crate::ui::UserInterface;

/// Header of the full suite.
pub const SUITE_TITLE: &str = "Service Health Check Suite";
/// Title of the full suite summary.
pub const SUITE_SUMMARY: &str = "Test Results Summary";
/// Header of the connectivity suite.
pub const CONNECTIVITY_TITLE: &str = "Backend Connectivity Test";
/// Title of the connectivity summary.
pub const CONNECTIVITY_SUMMARY: &str = "Connectivity Summary";

/// Drives the checks for one workspace.
pub struct SuiteRunner<'a> {
    runner: &'a dyn ProcessRunner,
    config: &'a SvcheckConfig,
    workspace: &'a Path,
}

impl<'a> SuiteRunner<'a> {
    /// `config` must already have its variables resolved.
    pub fn new(
        runner: &'a dyn ProcessRunner,
        config: &'a SvcheckConfig,
        workspace: &'a Path,
    ) -> Self {
        Self {
            runner,
            config,
            workspace,
        }
    }

    /// Environment, backends, operations.
    pub fn run_full(&self, ui: &mut dyn UserInterface) -> RunReport {
        ui.show_header(SUITE_TITLE);
        if ui.output_mode().shows_progress() {
            ui.message(&format!("Workspace: {}", self.workspace.display()));
            ui.message(&format!(
                "Testing at: {}",
                Local::now().format("%Y-%m-%d %H:%M:%S")
            ));
        }

        let mut results = CheckResults::new();
        let settings = &self.config.settings;

        progress(ui, "Testing environment setup...");
        let environment =
            EnvironmentCheck::new(self.runner, self.workspace, settings, &self.config.toolchains)
                .run();
        show_check(ui, &environment);
        results.insert(ENVIRONMENT, environment);

        let probe = BackendProbe::new(self.runner, self.workspace, settings.grace_period());
        for backend in &self.config.backends {
            let outcome = self.probe_backend(ui, &probe, backend);
            results.insert(backend.name.clone(), outcome);
        }

        progress(ui, "Testing actual operations...");
        let operations =
            OperationCheck::new(self.runner, self.workspace, settings.command_timeout()).run();
        show_check(ui, &operations);
        results.insert(OPERATIONS, operations);

        RunReport::new(SUITE_SUMMARY, results, &self.config.rules.suite)
    }

    /// Long-lived probes of the connectivity backends.
    pub fn run_connectivity(&self, ui: &mut dyn UserInterface) -> RunReport {
        ui.show_header(CONNECTIVITY_TITLE);

        let mut results = CheckResults::new();
        let probe = BackendProbe::new(
            self.runner,
            self.workspace,
            self.config.settings.grace_period(),
        );
        for backend in &self.config.connectivity {
            let outcome = self.probe_backend(ui, &probe, backend);
            results.insert(backend.name.clone(), outcome);
        }

        RunReport::new(CONNECTIVITY_SUMMARY, results, &self.config.rules.connectivity)
    }

    fn probe_backend(
        &self,
        ui: &mut dyn UserInterface,
        probe: &BackendProbe<'_>,
        backend: &BackendSpec,
    ) -> ProbeOutcome {
        progress(ui, &format!("Testing {}...", backend.name));
        if ui.output_mode().shows_details() {
            for (index, strategy) in backend.strategies.iter().enumerate() {
                ui.message(&format!(
                    "   strategy {}: {} {}",
                    index + 1,
                    strategy.command,
                    strategy.args.join(" ")
                ));
            }
        }

        let outcome = probe.probe(backend);
        show_outcome(ui, backend, &outcome);
        outcome
    }
}

fn progress(ui: &mut dyn UserInterface, msg: &str) {
    if ui.output_mode().shows_progress() {
        ui.message("");
        ui.message(msg);
    }
}

fn show_check(ui: &mut dyn UserInterface, result: &CheckResult) {
    if !ui.output_mode().shows_progress() {
        return;
    }
    for detail in &result.details {
        let line = match &detail.message {
            Some(message) => format!("{}: {}", detail.name, message),
            None => detail.name.clone(),
        };
        if detail.passed {
            ui.success(&line);
        } else {
            ui.error(&line);
        }
    }
}

fn show_outcome(ui: &mut dyn UserInterface, backend: &BackendSpec, outcome: &ProbeOutcome) {
    if !ui.output_mode().shows_progress() {
        return;
    }
    if let Some(evidence) = outcome.evidence() {
        ui.success(&format!("{}: {}", backend.name, evidence.describe()));
        if let Some(description) = backend.description.as_deref() {
            if ui.output_mode().shows_details() {
                ui.message(&format!("   {}", description));
            }
        }
        return;
    }

    let line = format!("{}: {}", backend.name, outcome.status().label());
    match outcome.status() {
        ProbeStatus::Ambiguous => ui.warning(&line),
        _ => ui.error(&line),
    }
    if let Some(diagnostic) = outcome.diagnostic() {
        ui.message(&format!("   Error: {}", diagnostic));
    }
}
