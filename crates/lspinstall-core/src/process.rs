//! External command execution.

use std::process::Command;

use crate::error::BackendError;

/// Captured result of an external command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code, `None` if the process was killed by a signal.
    pub code: Option<i32>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs an argv to completion and captures its output.
pub trait CommandRunner: Send + Sync {
    /// Run `argv` (program first). Only failing to start the process is an
    /// error here; a non-zero exit is reported through [`CommandOutput`].
    fn output(&self, argv: &[String]) -> std::io::Result<CommandOutput>;
}

/// Runs commands as child processes of the current process.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn output(&self, argv: &[String]) -> std::io::Result<CommandOutput> {
        let (program, args) = argv.split_first().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command line")
        })?;

        let output = Command::new(program).args(args).output()?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            code: output.status.code(),
        })
    }
}

/// Run `argv` and treat any non-zero exit as a [`BackendError::BackendCommand`].
pub fn execute(runner: &dyn CommandRunner, argv: &[String]) -> Result<CommandOutput, BackendError> {
    let command = argv.join(" ");
    log::debug!("Executing external process: {}", command);

    let output = runner.output(argv).map_err(|e| BackendError::Spawn {
        command: command.clone(),
        source: e,
    })?;
    log::debug!("Got return code {:?}", output.code);

    if !output.success() {
        return Err(BackendError::BackendCommand {
            command,
            code: output.code,
            stderr: output.stderr,
        });
    }

    Ok(output)
}

/// Build an owned argv from string slices.
pub(crate) fn argv<I, S>(parts: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    parts.into_iter().map(Into::into).collect()
}
