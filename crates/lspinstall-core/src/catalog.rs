//! Built-in language servers.

use crate::backends::Backends;
use crate::downloader::ArchiveType;
use crate::finalize::{chain, exec_launcher, interpreter_launcher, mark_executable, mark_executable_at};
use crate::source::{ArchiveSpec, Source};

const SUMNEKO_URL: &str = "https://github.com/sumneko/lua-language-server/releases/download/3.5.5/lua-language-server-3.5.5-linux-x64.tar.gz";
const BICEP_URL: &str = "https://github.com/Azure/bicep/releases/download/v0.8.9/bicep-langserver.zip";
const RUST_ANALYZER_URL: &str = "https://github.com/rust-analyzer/rust-analyzer/releases/latest/download/rust-analyzer-x86_64-unknown-linux-gnu.gz";
const OMNISHARP_URL: &str = "https://github.com/OmniSharp/omnisharp-roslyn/releases/download/v1.38.2/omnisharp-linux-x64.zip";
const ELIXIRLS_URL: &str = "https://github.com/elixir-lsp/elixir-ls/releases/latest/download/elixir-ls.zip";
const CLOJURE_LSP_URL: &str = "https://github.com/clojure-lsp/clojure-lsp/releases/download/2022.11.03-00.14.57/clojure-lsp-native-static-linux-amd64.zip";

/// Every built-in source, in the order `list` shows them.
pub fn builtin_sources(backends: &Backends) -> Vec<Source> {
    let bin_dir = backends.env.bin_dir.clone();

    vec![
        backends.archive(
            "sumneko",
            ArchiveSpec::new(SUMNEKO_URL, ArchiveType::TarGz, backends.cache_path("sumneko-lua"))
                .with_finalize(exec_launcher(&bin_dir, "lua-language-server", "bin/lua-language-server")),
        ),
        backends.archive(
            "bicep",
            ArchiveSpec::new(BICEP_URL, ArchiveType::Zip, backends.cache_path("bicep-langserver"))
                .with_finalize(interpreter_launcher(&bin_dir, "bicep-langserver", "dotnet", "Bicep.LangServer.dll")),
        ),
        backends.archive(
            "rust-analyzer",
            ArchiveSpec::new(RUST_ANALYZER_URL, ArchiveType::Gz, backends.bin_path("rust-analyzer"))
                .with_finalize(mark_executable()),
        ),
        backends.archive(
            "omnisharp",
            ArchiveSpec::new(OMNISHARP_URL, ArchiveType::Zip, backends.cache_path("omnisharp")).with_finalize(chain(vec![
                mark_executable_at("run"),
                exec_launcher(&bin_dir, "OmniSharp", "run"),
            ])),
        ),
        backends.archive(
            "elixirls",
            ArchiveSpec::new(ELIXIRLS_URL, ArchiveType::Zip, backends.cache_path("elixirls")).with_finalize(chain(vec![
                mark_executable_at("language_server.sh"),
                mark_executable_at("launch.sh"),
                exec_launcher(&bin_dir, "elixir-ls", "language_server.sh"),
            ])),
        ),
        backends.archive(
            "clojure_lsp",
            ArchiveSpec::new(CLOJURE_LSP_URL, ArchiveType::Zip, backends.cache_path("clojure-lsp")).with_finalize(chain(vec![
                mark_executable_at("clojure-lsp"),
                exec_launcher(&bin_dir, "clojure-lsp", "clojure-lsp"),
            ])),
        ),
        backends.pip("pylsp", "pylsp", "python-lsp-server[all]"),
        backends.go("gopls", "golang.org/x/tools/gopls"),
        backends.npm("tsserver", "typescript-language-server", &["typescript"]),
        backends.npm("vscode-langservers-extracted", "vscode-langservers-extracted", &[]),
        backends.npm("bashls", "bash-language-server", &[]),
        backends.npm("yamlls", "yaml-language-server", &[]),
        backends.npm("awk_ls", "awk-language-server", &[]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;
    use crate::downloader::Download;
    use crate::error::BackendError;
    use crate::process::{CommandOutput, CommandRunner};
    use crate::registry::SourceRegistry;
    use crate::source::SourceKind;
    use std::path::Path;
    use std::sync::Arc;

    struct Offline;

    impl Download for Offline {
        fn download(&self, url: &str, _dest: &Path) -> Result<u64, BackendError> {
            panic!("unexpected download of {}", url);
        }
    }

    impl CommandRunner for Offline {
        fn output(&self, argv: &[String]) -> std::io::Result<CommandOutput> {
            panic!("unexpected command: {:?}", argv);
        }
    }

    fn backends() -> Backends {
        Backends::new(Environment::new("/home/u/.cache", "/home/u/.local/bin"), Arc::new(Offline), Arc::new(Offline))
    }

    #[test]
    fn test_builtin_names_are_unique_and_ordered() {
        let registry = SourceRegistry::new(builtin_sources(&backends()));
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(
            names,
            vec![
                "sumneko",
                "bicep",
                "rust-analyzer",
                "omnisharp",
                "elixirls",
                "clojure_lsp",
                "pylsp",
                "gopls",
                "tsserver",
                "vscode-langservers-extracted",
                "bashls",
                "yamlls",
                "awk_ls",
            ]
        );
    }

    #[test]
    fn test_builtin_kinds() {
        let registry = SourceRegistry::new(builtin_sources(&backends()));
        assert_eq!(registry.lookup("sumneko").unwrap().kind(), SourceKind::Archive);
        assert_eq!(registry.lookup("pylsp").unwrap().kind(), SourceKind::Pip);
        assert_eq!(registry.lookup("gopls").unwrap().kind(), SourceKind::Go);
        assert_eq!(registry.lookup("tsserver").unwrap().kind(), SourceKind::Npm);
    }

    #[test]
    fn test_archive_destinations_follow_environment() {
        let sources = builtin_sources(&backends());
        let destination = |name: &str| match sources.iter().find(|s| s.name() == name) {
            Some(Source::Archive(a)) => a.spec().destination.clone(),
            other => panic!("{} is not an archive source: {:?}", name, other),
        };

        assert_eq!(destination("sumneko"), Path::new("/home/u/.cache/sumneko-lua"));
        assert_eq!(destination("rust-analyzer"), Path::new("/home/u/.local/bin/rust-analyzer"));
        assert_eq!(destination("clojure_lsp"), Path::new("/home/u/.cache/clojure-lsp"));
    }
}
