//! Error types for opensearch-mcp-rs.
//!
//! Each layer has its own error enum; [`Error`] is the crate-level umbrella
//! used by the CLI.

use std::path::PathBuf;

use thiserror::Error;

/// Crate-level result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration could not be resolved.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// An OpenSearch operation failed.
    #[error(transparent)]
    Search(#[from] SearchError),

    /// A CLI command failed.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while resolving the connection descriptor.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The cookie file could not be read.
    #[error("failed to read cookie file {}: {source}", path.display())]
    CookieFile {
        /// Cookie file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The client certificate could not be read.
    #[error("failed to read client certificate {}: {source}", path.display())]
    ClientCert {
        /// Certificate path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A header name or value is not valid HTTP.
    #[error("invalid auth header '{0}'")]
    InvalidHeader(String),

    /// The base URL could not be parsed.
    #[error("invalid OpenSearch URL '{0}'")]
    InvalidUrl(String),
}

/// Errors raised by search operations and transports.
#[derive(Error, Debug)]
pub enum SearchError {
    /// Caller-supplied parameters were rejected before any request was made.
    #[error("{0}")]
    Validation(String),

    /// The requested document does not exist.
    #[error("Document not found: {index}/{id}")]
    DocumentNotFound {
        /// Index name.
        index: String,
        /// Document ID.
        id: String,
    },

    /// OpenSearch answered with a non-success status.
    #[error("OpenSearch returned {status}: {reason}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Reason extracted from the error body.
        reason: String,
    },

    /// The transport could not be built.
    #[error("transport setup failed: {0}")]
    Transport(String),

    /// Error from the `opensearch` client.
    #[error("OpenSearch client error: {0}")]
    Client(#[from] opensearch::Error),

    /// Error from the HTTP session.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SearchError {
    /// Shorthand for a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Returns `true` if the error was caused by caller input.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns `true` if the error denotes a missing resource.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::DocumentNotFound { .. } | Self::Status { status: 404, .. }
        )
    }
}

/// Errors raised by CLI commands.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Invalid command-line argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Command execution failed.
    #[error("{0}")]
    ExecutionFailed(String),
}
