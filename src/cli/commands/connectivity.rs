//! The `connectivity` command.

use crate::cli::args::ConnectivityArgs;
use crate::error::Result;
use crate::runner::SuiteRunner;
use crate::shell::NativeRunner;
use crate::ui::UserInterface;

use super::context::CheckContext;
use super::dispatcher::{Command, CommandResult};

/// Starts each connectivity backend and checks that it stays up.
pub struct ConnectivityCommand {
    context: CheckContext,
    args: ConnectivityArgs,
}

impl ConnectivityCommand {
    pub fn new(context: CheckContext, args: ConnectivityArgs) -> Self {
        Self { context, args }
    }
}

impl Command for ConnectivityCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut config = match self.context.load_config() {
            Ok(config) => config,
            Err(e) => return Ok(self.context.config_failure(ui, &e)),
        };
        if let Some(grace_ms) = self.args.grace_ms {
            config.settings.grace_period_ms = grace_ms;
        }

        let runner = NativeRunner::new().kill_grace(config.settings.kill_grace());
        let report =
            SuiteRunner::new(&runner, &config, &self.context.project_root).run_connectivity(ui);
        self.context.finish(ui, &report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::context::CONFIG_ERROR_EXIT;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(temp: &TempDir, content: &str) {
        let dir = temp.path().join(".svcheck");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.yml"), content).unwrap();
    }

    #[test]
    fn invalid_config_is_config_error() {
        let temp = TempDir::new().unwrap();
        write_config(&temp, "connectivity: [");
        let cmd = ConnectivityCommand::new(CheckContext::new(temp.path()), ConnectivityArgs::default());
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert_eq!(result.exit_code, CONFIG_ERROR_EXIT);
        assert!(ui.has_error("Failed to parse config"));
    }

    #[test]
    fn unreachable_backends_fail() {
        let temp = TempDir::new().unwrap();
        write_config(
            &temp,
            r#"
connectivity:
  - name: Ghost One
    strategies:
      - command: svcheck-test-missing-binary-1
        kind: long_lived
  - name: Ghost Two
    strategies:
      - command: svcheck-test-missing-binary-2
        kind: long_lived
"#,
        );
        let cmd = ConnectivityCommand::new(CheckContext::new(temp.path()), ConnectivityArgs::default());
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert_eq!(result.exit_code, 1);
        assert!(ui.reports()[0].contains("Total: 0/2 passed"));
        assert!(ui.has_error("Ghost One: unavailable"));
    }
}
