//! Sources installed as global npm packages.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use serde::Deserialize;

use crate::error::BackendError;
use crate::process::{argv, execute, CommandRunner};

const LIST_COMMAND: [&str; 4] = ["npm", "list", "-g", "--json"];

/// Output of `npm list -g --json`
#[derive(Debug, Deserialize)]
struct NpmListing {
    #[serde(default)]
    dependencies: HashMap<String, NpmPackage>,
}

#[derive(Debug, Deserialize)]
struct NpmPackage {
    #[serde(default)]
    version: Option<String>,
}

/// Lookup of globally installed npm packages.
///
/// The listing is queried once, on the first lookup, and kept for the life
/// of the value. One instance is shared by every [`NpmSource`] built from
/// the same [`Backends`](crate::Backends).
pub struct NpmRegistry {
    runner: Arc<dyn CommandRunner>,
    entries: OnceLock<HashMap<String, String>>,
}

impl NpmRegistry {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            entries: OnceLock::new(),
        }
    }

    /// Installed version of `package`, or `None` if npm does not list it.
    ///
    /// The version is empty when npm lists the package without one.
    pub fn lookup(&self, package: &str) -> Result<Option<&str>, BackendError> {
        Ok(self.entries()?.get(package).map(String::as_str))
    }

    /// Whether the listing has been fetched yet.
    pub fn is_loaded(&self) -> bool {
        self.entries.get().is_some()
    }

    fn entries(&self) -> Result<&HashMap<String, String>, BackendError> {
        if let Some(entries) = self.entries.get() {
            return Ok(entries);
        }

        let output = execute(self.runner.as_ref(), &argv(LIST_COMMAND))?;
        let entries = parse_listing(&output.stdout)?;
        log::debug!("npm reports {} global packages", entries.len());

        Ok(self.entries.get_or_init(|| entries))
    }
}

impl fmt::Debug for NpmRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NpmRegistry")
            .field("entries", &self.entries.get())
            .finish()
    }
}

fn parse_listing(stdout: &str) -> Result<HashMap<String, String>, BackendError> {
    let listing: NpmListing = serde_json::from_str(stdout).map_err(|e| BackendError::CommandOutput {
        command: LIST_COMMAND.join(" "),
        reason: e.to_string(),
    })?;

    Ok(listing
        .dependencies
        .into_iter()
        .map(|(name, pkg)| (name, pkg.version.unwrap_or_default()))
        .collect())
}

/// A language server distributed as a global npm package.
pub struct NpmSource {
    name: String,
    package: String,
    /// Peer packages installed alongside, e.g. `typescript`
    requires: Vec<String>,
    runner: Arc<dyn CommandRunner>,
    registry: Arc<NpmRegistry>,
}

impl NpmSource {
    pub fn new(
        name: impl Into<String>,
        package: impl Into<String>,
        requires: Vec<String>,
        runner: Arc<dyn CommandRunner>,
        registry: Arc<NpmRegistry>,
    ) -> Self {
        Self {
            name: name.into(),
            package: package.into(),
            requires,
            runner,
            registry,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn installed(&self) -> Result<bool, BackendError> {
        Ok(self.registry.lookup(&self.package)?.is_some())
    }

    pub fn install(&self) -> Result<(), BackendError> {
        self.npm("install")
    }

    pub fn update(&self) -> Result<(), BackendError> {
        self.npm("update")
    }

    fn npm(&self, verb: &str) -> Result<(), BackendError> {
        let mut cmd = argv(["npm", verb, "-g", self.package.as_str()]);
        cmd.extend(self.requires.iter().cloned());
        execute(self.runner.as_ref(), &cmd)?;
        Ok(())
    }
}

impl fmt::Debug for NpmSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NpmSource")
            .field("name", &self.name)
            .field("package", &self.package)
            .field("requires", &self.requires)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::CommandOutput;
    use std::sync::Mutex;

    const LISTING: &str = r#"{
        "version": "10.2.4",
        "name": "lib",
        "dependencies": {
            "bash-language-server": { "version": "5.1.2", "overridden": false },
            "typescript": { "version": "5.4.5", "overridden": false },
            "linked-pkg": { "resolved": "file:../linked" }
        }
    }"#;

    /// Answers `npm list` with a canned listing and records every argv.
    struct FakeNpm {
        listing: &'static str,
        calls: Mutex<Vec<Vec<String>>>,
    }

    impl FakeNpm {
        fn new(listing: &'static str) -> Arc<Self> {
            Arc::new(Self {
                listing,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<Vec<String>> {
            self.calls.lock().unwrap().clone()
        }

        fn list_calls(&self) -> usize {
            self.calls().iter().filter(|c| c[1] == "list").count()
        }
    }

    impl CommandRunner for FakeNpm {
        fn output(&self, argv: &[String]) -> std::io::Result<CommandOutput> {
            self.calls.lock().unwrap().push(argv.to_vec());
            let stdout = if argv[1] == "list" { self.listing } else { "" };
            Ok(CommandOutput {
                stdout: stdout.to_string(),
                stderr: String::new(),
                code: Some(0),
            })
        }
    }

    fn source(name: &str, package: &str, requires: &[&str], npm: &Arc<FakeNpm>, registry: &Arc<NpmRegistry>) -> NpmSource {
        NpmSource::new(
            name,
            package,
            requires.iter().map(|r| r.to_string()).collect(),
            npm.clone(),
            registry.clone(),
        )
    }

    #[test]
    fn test_parse_listing() {
        let entries = parse_listing(LISTING).unwrap();
        assert_eq!(entries.get("bash-language-server").map(String::as_str), Some("5.1.2"));
        assert_eq!(entries.get("linked-pkg").map(String::as_str), Some(""));
        assert_eq!(entries.len(), 3);
    }

    #[test]
    fn test_parse_listing_without_dependencies() {
        assert!(parse_listing(r#"{"name": "lib"}"#).unwrap().is_empty());
    }

    #[test]
    fn test_parse_listing_invalid_json() {
        let err = parse_listing("npm ERR! something").unwrap_err();
        assert!(matches!(err, BackendError::CommandOutput { ref command, .. } if command == "npm list -g --json"));
    }

    #[test]
    fn test_registry_is_lazy() {
        let npm = FakeNpm::new(LISTING);
        let registry = NpmRegistry::new(npm.clone());

        assert!(!registry.is_loaded());
        assert_eq!(npm.list_calls(), 0);

        assert_eq!(registry.lookup("typescript").unwrap(), Some("5.4.5"));
        assert!(registry.is_loaded());
    }

    #[test]
    fn test_registry_queried_once_across_sources() {
        let npm = FakeNpm::new(LISTING);
        let registry = Arc::new(NpmRegistry::new(npm.clone()));

        let bashls = source("bashls", "bash-language-server", &[], &npm, &registry);
        let yamlls = source("yamlls", "yaml-language-server", &[], &npm, &registry);

        for _ in 0..3 {
            assert!(bashls.installed().unwrap());
            assert!(!yamlls.installed().unwrap());
        }

        assert_eq!(npm.list_calls(), 1);
        assert_eq!(npm.calls()[0], argv(LIST_COMMAND));
    }

    #[test]
    fn test_install_appends_required_packages() {
        let npm = FakeNpm::new(r#"{"dependencies": {}}"#);
        let registry = Arc::new(NpmRegistry::new(npm.clone()));
        let tsserver = source("tsserver", "typescript-language-server", &["typescript"], &npm, &registry);

        assert!(!tsserver.installed().unwrap());
        tsserver.install().unwrap();

        assert_eq!(
            npm.calls().last().unwrap(),
            &argv(["npm", "install", "-g", "typescript-language-server", "typescript"])
        );
    }

    #[test]
    fn test_update_uses_update_verb() {
        let npm = FakeNpm::new(LISTING);
        let registry = Arc::new(NpmRegistry::new(npm.clone()));
        let bashls = source("bashls", "bash-language-server", &[], &npm, &registry);

        bashls.update().unwrap();

        assert_eq!(npm.calls(), vec![argv(["npm", "update", "-g", "bash-language-server"])]);
    }

    #[test]
    fn test_failed_listing_is_reported_and_not_cached() {
        struct BrokenNpm;
        impl CommandRunner for BrokenNpm {
            fn output(&self, _argv: &[String]) -> std::io::Result<CommandOutput> {
                Ok(CommandOutput {
                    stdout: String::new(),
                    stderr: "npm: command failed".to_string(),
                    code: Some(1),
                })
            }
        }

        let registry = NpmRegistry::new(Arc::new(BrokenNpm));
        let err = registry.lookup("typescript").unwrap_err();

        assert!(matches!(err, BackendError::BackendCommand { code: Some(1), .. }));
        assert!(!registry.is_loaded());
    }
}
