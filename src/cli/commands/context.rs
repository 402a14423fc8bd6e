//! Shared setup and teardown for the check commands.

use std::path::{Path, PathBuf};

use crate::config::{load_config, resolve_config, InterpolationContext, SvcheckConfig};
use crate::error::{Result, SvcheckError};
use crate::report::RunReport;
use crate::ui::UserInterface;

use super::dispatcher::CommandResult;

/// Exit code when svcheck's own configuration is unusable.
pub const CONFIG_ERROR_EXIT: i32 = 2;

/// Where a command runs and how it reports.
#[derive(Debug, Clone)]
pub struct CheckContext {
    /// Workspace root
    pub project_root: PathBuf,
    /// Explicit config file, if given
    pub config_path: Option<PathBuf>,
    /// Print JSON instead of the text summary
    pub json: bool,
}

impl CheckContext {
    pub fn new(project_root: &Path) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_path: None,
            json: false,
        }
    }

    /// Load, validate, and resolve the configuration.
    pub fn load_config(&self) -> Result<SvcheckConfig> {
        let config = load_config(&self.project_root, self.config_path.as_deref())?;
        let vars = InterpolationContext::for_workspace(&self.project_root);
        resolve_config(&config, &vars)
    }

    /// Report a configuration problem and produce the config exit code.
    pub fn config_failure(&self, ui: &mut dyn UserInterface, err: &SvcheckError) -> CommandResult {
        ui.error(&err.to_string());
        CommandResult::failure(CONFIG_ERROR_EXIT)
    }

    /// Show `report` and turn its verdict into a result.
    pub fn finish(&self, ui: &mut dyn UserInterface, report: &RunReport) -> Result<CommandResult> {
        if self.json {
            println!("{}", report.to_json()?);
        } else {
            ui.show_report(report);
            let verdict = report.verdict();
            if verdict.overall {
                ui.success("All required checks passed");
            } else {
                ui.warning(&format!(
                    "Only {} of {} required checks passed; review the failures above",
                    verdict.passed, verdict.required
                ));
            }
        }

        Ok(if report.verdict().overall {
            CommandResult::success()
        } else {
            CommandResult::failure(1)
        })
    }
}
