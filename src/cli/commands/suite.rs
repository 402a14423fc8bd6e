//! The `suite` command.

use crate::cli::args::SuiteArgs;
use crate::error::{Result, SvcheckError};
use crate::runner::SuiteRunner;
use crate::shell::NativeRunner;
use crate::ui::UserInterface;

use super::context::CheckContext;
use super::dispatcher::{Command, CommandResult};

/// Runs environment, backend, and operation checks.
pub struct SuiteCommand {
    context: CheckContext,
    args: SuiteArgs,
}

impl SuiteCommand {
    pub fn new(context: CheckContext, args: SuiteArgs) -> Self {
        Self { context, args }
    }
}

impl Command for SuiteCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut config = match self.context.load_config() {
            Ok(config) => config,
            Err(e) => return Ok(self.context.config_failure(ui, &e)),
        };

        if !self.args.backends.is_empty() {
            if let Some(unknown) = self
                .args
                .backends
                .iter()
                .find(|name| !config.backends.iter().any(|b| &b.name == *name))
            {
                let err = SvcheckError::ConfigValidationError {
                    message: format!("Unknown backend '{}'", unknown),
                };
                return Ok(self.context.config_failure(ui, &err));
            }
            config
                .backends
                .retain(|b| self.args.backends.contains(&b.name));
        }

        let runner = NativeRunner::new().kill_grace(config.settings.kill_grace());
        let report = SuiteRunner::new(&runner, &config, &self.context.project_root).run_full(ui);
        self.context.finish(ui, &report)
    }
}
