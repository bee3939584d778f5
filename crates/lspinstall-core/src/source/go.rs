//! Sources installed with `go install`.

use std::fmt;
use std::sync::Arc;

use crate::error::BackendError;
use crate::process::{execute, CommandRunner};
use crate::util::ExecutableLookup;

/// A language server built from a Go module.
pub struct GoModuleSource {
    name: String,
    /// Full module path, e.g. `golang.org/x/tools/gopls`
    module: String,
    runner: Arc<dyn CommandRunner>,
    lookup: ExecutableLookup,
}

impl GoModuleSource {
    pub fn new(
        name: impl Into<String>,
        module: impl Into<String>,
        runner: Arc<dyn CommandRunner>,
        lookup: ExecutableLookup,
    ) -> Self {
        Self {
            name: name.into(),
            module: module.into(),
            runner,
            lookup,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// True when an executable named after the source resolves.
    pub fn installed(&self) -> bool {
        self.lookup.has_command(&self.name)
    }

    pub fn install(&self) -> Result<(), BackendError> {
        let cmd = vec![
            "go".to_string(),
            "install".to_string(),
            format!("{}@latest", self.module),
        ];
        execute(self.runner.as_ref(), &cmd)?;
        Ok(())
    }

    /// `go install ...@latest` always resolves the newest version.
    pub fn update(&self) -> Result<(), BackendError> {
        self.install()
    }
}

impl fmt::Debug for GoModuleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoModuleSource")
            .field("name", &self.name)
            .field("module", &self.module)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{argv, CommandOutput};
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<Vec<String>>>,
    }

    impl CommandRunner for Recorder {
        fn output(&self, argv: &[String]) -> std::io::Result<CommandOutput> {
            self.calls.lock().unwrap().push(argv.to_vec());
            Ok(CommandOutput {
                code: Some(0),
                ..Default::default()
            })
        }
    }

    #[test]
    fn test_install_and_update_are_identical() {
        let runner = Arc::new(Recorder::default());
        let gopls = GoModuleSource::new("gopls", "golang.org/x/tools/gopls", runner.clone(), ExecutableLookup::default());

        gopls.install().unwrap();
        gopls.update().unwrap();

        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls[0], argv(["go", "install", "golang.org/x/tools/gopls@latest"]));
        assert_eq!(calls[0], calls[1]);
    }

    #[cfg(unix)]
    #[test]
    fn test_installed_iff_executable_on_search_path() {
        let temp = TempDir::new().unwrap();
        let lookup = ExecutableLookup::new(Some(temp.path().as_os_str().to_owned()));
        let gopls = GoModuleSource::new("gopls", "golang.org/x/tools/gopls", Arc::new(Recorder::default()), lookup);

        assert!(!gopls.installed());

        let exe = temp.path().join("gopls");
        std::fs::write(&exe, "#!/bin/sh\n").unwrap();
        crate::util::make_executable(&exe).unwrap();

        assert!(gopls.installed());
        assert!(gopls.installed());
    }

    #[test]
    fn test_non_zero_exit_surfaces_stderr() {
        struct FailingGo;
        impl CommandRunner for FailingGo {
            fn output(&self, _argv: &[String]) -> std::io::Result<CommandOutput> {
                Ok(CommandOutput {
                    stdout: String::new(),
                    stderr: "go: module not found".to_string(),
                    code: Some(1),
                })
            }
        }

        let gopls = GoModuleSource::new("gopls", "example.com/missing", Arc::new(FailingGo), ExecutableLookup::default());
        let err = gopls.install().unwrap_err();

        match err {
            BackendError::BackendCommand { command, stderr, .. } => {
                assert_eq!(command, "go install example.com/missing@latest");
                assert_eq!(stderr, "go: module not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
