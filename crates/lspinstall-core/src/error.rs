use std::path::PathBuf;

use thiserror::Error;

/// The underlying reason an install, update or presence check failed.
#[derive(Error, Debug)]
pub enum BackendError {
    // Network errors
    #[error("Request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status}: {url}")]
    HttpStatus { status: u16, url: String },

    // Archive errors
    #[error("Unsupported archive type: {0}")]
    UnsupportedArchiveType(String),

    #[error("Failed to extract {path}: {reason}")]
    Extraction { path: PathBuf, reason: String },

    // External command errors
    #[error("'{command}' failed with exit status {}:\n{stderr}", display_code(.code))]
    BackendCommand {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Failed to execute '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unexpected output from '{command}': {reason}")]
    CommandOutput { command: String, reason: String },

    // Post-extraction errors
    #[error("Finalize step failed for {path}: {source}")]
    Finalize {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "unknown (terminated by signal)".to_string(),
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to install {name}")]
    Install {
        name: String,
        #[source]
        source: BackendError,
    },

    #[error("Failed to update {name}")]
    Update {
        name: String,
        #[source]
        source: BackendError,
    },

    #[error("Could not determine whether {name} is installed")]
    PresenceCheck {
        name: String,
        #[source]
        source: BackendError,
    },

    #[error("Unknown server name: {name}")]
    UnknownSource { name: String },

    // Config errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// The backend cause, if this error came from a source operation.
    pub fn backend(&self) -> Option<&BackendError> {
        match self {
            Error::Install { source, .. }
            | Error::Update { source, .. }
            | Error::PresenceCheck { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_command_message() {
        let err = BackendError::BackendCommand {
            command: "npm install -g bash-language-server".to_string(),
            code: Some(1),
            stderr: "npm ERR! 404".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "'npm install -g bash-language-server' failed with exit status 1:\nnpm ERR! 404"
        );
    }

    #[test]
    fn test_install_message_leaves_cause_to_source_chain() {
        let err = Error::Install {
            name: "bashls".to_string(),
            source: BackendError::BackendCommand {
                command: "npm install -g bash-language-server".to_string(),
                code: Some(1),
                stderr: "npm ERR! 404".to_string(),
            },
        };
        assert_eq!(err.to_string(), "Failed to install bashls");

        let mut chain = Vec::new();
        let mut current: Option<&dyn std::error::Error> = Some(&err);
        while let Some(e) = current {
            chain.push(e.to_string());
            current = e.source();
        }
        assert_eq!(chain.iter().filter(|line| line.contains("npm ERR! 404")).count(), 1);
    }

    #[test]
    fn test_backend_accessor() {
        let err = Error::Update {
            name: "gopls".to_string(),
            source: BackendError::HttpStatus { status: 404, url: "https://x".to_string() },
        };
        assert!(matches!(err.backend(), Some(BackendError::HttpStatus { status: 404, .. })));
        assert!(Error::UnknownSource { name: "x".to_string() }.backend().is_none());
    }
}
