//! Run the host packaging command as the wrapped build step

use super::{BuildContext, BuildStep};
use crate::error::BuildError;
use std::process::Command;
use tracing::info;

/// Environment variable exposing the build output root to the command
pub const BUILD_LIB_ENV: &str = "DEPSCAN_BUILD_LIB";

/// External command executed in the project directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandStep {
    program: String,
    args: Vec<String>,
}

impl CommandStep {
    /// Create a step from `argv`; returns None if it is empty
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    /// Program and arguments joined for display
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl BuildStep for CommandStep {
    fn name(&self) -> &str {
        &self.program
    }

    fn run(&self, ctx: &BuildContext) -> Result<(), BuildError> {
        let command_line = self.command_line();

        if ctx.dry_run {
            println!("Would run {}", command_line);
            return Ok(());
        }

        info!(command = %command_line, "running build command");
        let status = Command::new(&self.program)
            .args(&self.args)
            .current_dir(&ctx.project_dir)
            .env(BUILD_LIB_ENV, &ctx.build_lib)
            .status()
            .map_err(|source| BuildError::Spawn {
                command: command_line.clone(),
                source,
            })?;

        if !status.success() {
            return Err(BuildError::CommandFailed {
                command: command_line,
                status: status.to_string(),
            });
        }

        Ok(())
    }
}
