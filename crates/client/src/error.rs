//! Error types for the search client.
//!
//! Query execution errors are distinct from an empty result: a search that
//! matched nothing returns `Ok` with a count of zero.

use thiserror::Error;

/// Errors raised while talking to the search backend.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport failure (connection refused, timeout, ...).
    #[error("request to {url} failed: {source}")]
    Http {
        /// The requested URL.
        url: String,
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a non-success status.
    #[error("{url} returned {status}: {body}")]
    Status {
        /// The requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Response body, as text.
        body: String,
    },

    /// The response body was not the expected JSON.
    #[error("invalid response from {url}: {message}")]
    Decode {
        /// The requested URL.
        url: String,
        /// Parse error description.
        message: String,
    },

    /// Reading a local field configuration document failed.
    #[error("cannot read {path}: {source}")]
    Io {
        /// The file path.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A configured URL could not be parsed or extended.
    #[error("invalid URL '{0}'")]
    InvalidUrl(String),
}

impl ClientError {
    /// Returns the HTTP status if the backend answered with an error status.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
