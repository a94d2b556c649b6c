//! Error types for the Postscript connector
//!
//! All public APIs return `Result<T, Error>` where Error is defined here.
//! Failures fall into three classes: invalid input caught before any network
//! I/O, an error response from the Postscript API, and transport-level faults
//! with no interpretable HTTP response.

use thiserror::Error;

/// The main error type for the Postscript connector
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Input Errors (raised before any network call)
    // ============================================================================
    #[error("{message}")]
    InvalidArgument { message: String },

    #[error("Missing required parameter: {name}")]
    MissingParameter { name: String },

    #[error("Message exceeds maximum length of {limit} characters. Current length: {length}")]
    MessageTooLong { limit: usize, length: usize },

    // ============================================================================
    // Remote Errors
    // ============================================================================
    /// The API answered with a non-2xx status. `code` is the machine code from
    /// the response body when present, the HTTP status as a string otherwise.
    #[error("Postscript API error: {message} (code {code})")]
    Api {
        code: String,
        message: String,
        status: u16,
    },

    /// No interpretable HTTP response: connection faults, timeouts, or a 2xx
    /// body that failed to parse. Wraps the underlying fault unreinterpreted.
    #[error(transparent)]
    Operation(#[from] OperationError),

    // ============================================================================
    // Local Errors
    // ============================================================================
    /// Local I/O failure, e.g. binding the webhook receiver's listener
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Transport-level faults carried by [`Error::Operation`]
#[derive(Error, Debug)]
pub enum OperationError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Operation(OperationError::Transport(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Operation(OperationError::Decode(err))
    }
}

impl Error {
    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a missing parameter error
    pub fn missing_parameter(name: impl Into<String>) -> Self {
        Self::MissingParameter { name: name.into() }
    }

    /// Create an API error
    pub fn api(code: impl Into<String>, message: impl Into<String>, status: u16) -> Self {
        Self::Api {
            code: code.into(),
            message: message.into(),
            status,
        }
    }

    /// True for input faults caught before any network I/O
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Error::InvalidArgument { .. }
                | Error::MissingParameter { .. }
                | Error::MessageTooLong { .. }
        )
    }

    /// HTTP status of the failure, when the remote answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for the Postscript connector
pub type Result<T> = std::result::Result<T, Error>;
