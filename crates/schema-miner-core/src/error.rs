//! Error types for the Schema Miner core.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for template loading.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Coarse failure class of a template load. Callers that only care about
/// "missing vs. broken vs. something else" match on this instead of the variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateErrorKind {
    NotFound,
    Parse,
    Other,
}

/// Errors that can occur while reading a JSON template from disk.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("File Not Found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Cannot parse JSON file: {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cannot decode {} as {encoding}", path.display())]
    Decode { path: PathBuf, encoding: &'static str },

    #[error("Failed to read JSON file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TemplateError {
    pub fn kind(&self) -> TemplateErrorKind {
        match self {
            TemplateError::NotFound { .. } => TemplateErrorKind::NotFound,
            TemplateError::Parse { .. } => TemplateErrorKind::Parse,
            TemplateError::Decode { .. } | TemplateError::Io { .. } => TemplateErrorKind::Other,
        }
    }

    pub fn path(&self) -> &std::path::Path {
        match self {
            TemplateError::NotFound { path }
            | TemplateError::Parse { path, .. }
            | TemplateError::Decode { path, .. }
            | TemplateError::Io { path, .. } => path,
        }
    }
}

/// Errors returned by a [`crate::SchemaSession`] or by input validation in front of it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The control exists in the interface but nothing is connected behind it.
    #[error("{operation} is not wired to any backend")]
    NotWired { operation: &'static str },

    #[error("API key must not be empty")]
    EmptyApiKey,

    #[error("Chat message must not be empty")]
    EmptyMessage,

    #[error("Document {file_name:?} is empty")]
    EmptyDocument { file_name: String },

    #[error("Document {file_name:?} is not one of the accepted types ({accepted})")]
    UnsupportedDocument { file_name: String, accepted: String },

    #[error("Unknown stage: {0}")]
    UnknownStage(String),
}

/// Configuration errors: either from the `config` crate or from a value it accepted
/// but this crate cannot use.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Load(#[from] config::ConfigError),

    #[error("Unsupported text encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("Cannot resolve bind address {host}:{port}: {source}")]
    BindAddr {
        host: String,
        port: u16,
        #[source]
        source: std::io::Error,
    },
}
