//! Sources installed with `python -m pip`.

use std::fmt;
use std::sync::Arc;

use crate::error::BackendError;
use crate::process::{argv, execute, CommandRunner};
use crate::util::ExecutableLookup;

/// A language server distributed as a Python package.
pub struct PipSource {
    name: String,
    /// Executable the package puts on the search path
    command: String,
    /// Requirement passed to pip, extras included
    package: String,
    runner: Arc<dyn CommandRunner>,
    lookup: ExecutableLookup,
}

impl PipSource {
    pub fn new(
        name: impl Into<String>,
        command: impl Into<String>,
        package: impl Into<String>,
        runner: Arc<dyn CommandRunner>,
        lookup: ExecutableLookup,
    ) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            package: package.into(),
            runner,
            lookup,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// True when the command resolves, whichever package provided it.
    pub fn installed(&self) -> bool {
        self.lookup.has_command(&self.command)
    }

    pub fn install(&self) -> Result<(), BackendError> {
        self.pip(false)
    }

    pub fn update(&self) -> Result<(), BackendError> {
        self.pip(true)
    }

    fn pip(&self, upgrade: bool) -> Result<(), BackendError> {
        let mut cmd = argv(["python", "-m", "pip", "install"]);
        if upgrade {
            cmd.push("--upgrade".to_string());
        }
        cmd.push(self.package.clone());

        execute(self.runner.as_ref(), &cmd)?;
        Ok(())
    }
}

impl fmt::Debug for PipSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipSource")
            .field("name", &self.name)
            .field("command", &self.command)
            .field("package", &self.package)
            .finish()
    }
}
