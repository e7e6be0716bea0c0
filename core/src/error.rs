//! Error types shared by the HTTP adapter and the workflows.

use thiserror::Error;

/// Message shown when a request exceeds the configured timeout.
pub const TIMEOUT_MESSAGE: &str = "Request timed out. Please check your connection and try again.";

/// Errors produced by a call to the reservation API.
///
/// Validation problems never reach this type; they are reported locally
/// before any request is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server could not be reached (DNS failure, refused connection, reset).
    #[error("Network error: {0}")]
    Network(String),

    /// The request did not complete within the configured timeout and was cancelled.
    #[error("Request timed out. Please check your connection and try again.")]
    Timeout,

    /// The server answered with a non-success status.
    ///
    /// `message` is the response body when the server sent one, otherwise
    /// `HTTP <status>: <reason>`.
    #[error("{message}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Server-supplied or synthesized message
        message: String,
    },

    /// A success response carried a body that could not be decoded.
    #[error("Unexpected response from server: {0}")]
    Decode(String),
}

impl ApiError {
    /// Builds an [`ApiError::Http`], falling back to `HTTP <status>: <reason>`
    /// when the body is blank.
    #[must_use]
    pub fn http(status: u16, reason: &str, body: &str) -> Self {
        let body = body.trim();
        let message = if body.is_empty() {
            format!("HTTP {status}: {reason}")
        } else {
            body.to_string()
        };
        Self::Http { status, message }
    }

    /// HTTP status for [`ApiError::Http`], `None` otherwise.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Short label used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::Timeout => "timeout",
            Self::Http { .. } => "http",
            Self::Decode(_) => "decode",
        }
    }
}
