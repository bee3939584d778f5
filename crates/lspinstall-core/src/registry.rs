//! Name-keyed, ordered collection of every configured source.

use indexmap::IndexMap;

use crate::backends::Backends;
use crate::catalog::builtin_sources;
use crate::config::UserConfig;
use crate::error::{Error, Result};
use crate::source::Source;

/// All configured sources, in display order.
#[derive(Debug, Default)]
pub struct SourceRegistry {
    sources: IndexMap<String, Source>,
}

impl SourceRegistry {
    /// Build the registry from a static list.
    ///
    /// # Panics
    ///
    /// Panics if two sources share a name. The list is fixed at build time,
    /// so a duplicate is a programming error rather than a runtime one.
    pub fn new(sources: Vec<Source>) -> Self {
        let mut map = IndexMap::with_capacity(sources.len());
        for source in sources {
            let name = source.name().to_string();
            if map.insert(name.clone(), source).is_some() {
                panic!("duplicate source name: {}", name);
            }
        }
        Self { sources: map }
    }

    /// Built-in sources followed by the ones declared in `config`.
    pub fn load(backends: &Backends, config: &UserConfig) -> Result<Self> {
        let mut sources = builtin_sources(backends);
        let extra = config.build_sources(backends, sources.iter().map(Source::name))?;
        if !extra.is_empty() {
            log::debug!("Adding {} configured sources", extra.len());
        }
        sources.extend(extra);
        Ok(Self::new(sources))
    }

    /// Resolve a source by its name.
    pub fn lookup(&self, name: &str) -> Result<&Source> {
        self.sources.get(name).ok_or_else(|| Error::UnknownSource {
            name: name.to_string(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sources.contains_key(name)
    }

    /// Sources in insertion order.
    pub fn all(&self) -> impl Iterator<Item = &Source> {
        self.sources.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{CommandOutput, CommandRunner};
    use crate::source::GoModuleSource;
    use crate::util::ExecutableLookup;
    use std::sync::Arc;

    struct NeverRun;

    impl CommandRunner for NeverRun {
        fn output(&self, argv: &[String]) -> std::io::Result<CommandOutput> {
            panic!("unexpected command: {:?}", argv);
        }
    }

    fn go(name: &str) -> Source {
        GoModuleSource::new(name, format!("example.com/{}", name), Arc::new(NeverRun), ExecutableLookup::default()).into()
    }

    #[test]
    fn test_lookup_known_name() {
        let registry = SourceRegistry::new(vec![go("gopls"), go("templ")]);
        assert_eq!(registry.lookup("templ").unwrap().name(), "templ");
        assert!(registry.contains("gopls"));
    }

    #[test]
    fn test_lookup_unknown_name() {
        let registry = SourceRegistry::new(vec![go("gopls")]);
        let err = registry.lookup("jdtls").unwrap_err();
        assert!(matches!(err, Error::UnknownSource { ref name } if name == "jdtls"));
    }

    #[test]
    fn test_all_preserves_insertion_order() {
        let registry = SourceRegistry::new(vec![go("zls"), go("gopls"), go("buf")]);
        let names: Vec<&str> = registry.all().map(Source::name).collect();
        assert_eq!(names, vec!["zls", "gopls", "buf"]);
        assert_eq!(registry.names().collect::<Vec<_>>(), names);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_load_appends_configured_sources() {
        let backends = Backends::new(
            crate::config::Environment::new("/c", "/b"),
            Arc::new(crate::downloader::HttpDownloader::new().unwrap()),
            Arc::new(NeverRun),
        );
        let config = UserConfig::parse(
            "[[source]]\nkind = \"go\"\nname = \"templ\"\nmodule = \"github.com/a-h/templ/cmd/templ\"\n",
            std::path::Path::new("config.toml"),
        )
        .unwrap();

        let registry = SourceRegistry::load(&backends, &config).unwrap();
        assert_eq!(registry.names().last(), Some("templ"));
        assert_eq!(registry.names().next(), Some("sumneko"));
    }

    #[test]
    #[should_panic(expected = "duplicate source name: gopls")]
    fn test_duplicate_names_panic() {
        SourceRegistry::new(vec![go("gopls"), go("gopls")]);
    }
}
