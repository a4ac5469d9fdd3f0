//! Error types for the backend contract.

use thiserror::Error;

/// Number of characters of a non-JSON body kept in a protocol error.
pub const RAW_BODY_EXCERPT_CHARS: usize = 120;

/// Backend call error.
///
/// `Display` renders the user-facing detail; handlers prefix it with the
/// action-specific message ("Failed to setup database: ...").
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never completed (connection refused, reset, timeout).
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with something other than JSON.
    #[error("Expected JSON, got: {excerpt}...")]
    ProtocolMismatch {
        /// HTTP status code of the response.
        status: u16,
        /// First characters of the raw body.
        excerpt: String,
    },

    /// The backend reported a failure via an `error` field or a non-ok status.
    #[error("{message}")]
    Application {
        /// HTTP status code of the response.
        status: u16,
        /// Error detail from the backend, verbatim.
        message: String,
    },

    /// The body claimed to be JSON but did not decode.
    #[error("{0}")]
    Decode(#[from] serde_json::Error),

    /// Invalid backend URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ApiError {
    /// Build a protocol error from a raw body, keeping only the excerpt.
    pub fn protocol_mismatch(status: u16, body: &str) -> Self {
        Self::ProtocolMismatch {
            status,
            excerpt: body.chars().take(RAW_BODY_EXCERPT_CHARS).collect(),
        }
    }

    /// `true` when the backend answered with an application-level error.
    pub fn is_application(&self) -> bool {
        matches!(self, Self::Application { .. })
    }
}

/// Result type alias for backend operations.
pub type Result<T> = std::result::Result<T, ApiError>;
