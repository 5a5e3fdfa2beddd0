//! Typed error variants for termprof.
//!
//! [`ProfileError`] covers the reader/writer contract: a failed read or write
//! is reported once and the caller abandons that single operation.
//! [`ConfigError`] covers loading and saving the application config and the
//! state file. Application glue wraps both in `anyhow` with added context.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while reading or writing a profile location.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// The location could not be read or written.
    #[error("I/O error on profile {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The location held a document that could not be parsed.
    #[error("Failed to parse profile {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },

    /// The profile could not be turned into a document for writing.
    #[error("Failed to serialize profile for {}: {source}", path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },

    /// A native profile without a name is rejected.
    #[error("Profile {} has no name", path.display())]
    MissingName { path: PathBuf },

    /// A command line could not be split into words.
    #[error("Invalid command line {command:?}: {source}")]
    InvalidCommand {
        command: String,
        #[source]
        source: shell_words::ParseError,
    },
}

/// Errors that can occur when loading or saving configuration or state.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An I/O error occurred reading or writing the file.
    #[error("I/O error reading config: {0}")]
    Io(#[from] std::io::Error),

    /// The file contained invalid YAML.
    #[error("YAML parse error in config: {0}")]
    Parse(#[from] serde_yaml_ng::Error),
}
