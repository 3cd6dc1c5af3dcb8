//! Error types for JSON-RPC transport operations.
//!
//! Errors are categorized so front ends can give appropriate feedback.
//! Nothing in this crate retries on its own; the category only describes
//! what went wrong.

use std::fmt;

/// Result type alias for transport operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of transport errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Network-related errors (connection refused, timeout, 5xx).
    Network,
    /// Authentication or authorization rejected by the device.
    Auth,
    /// Malformed request or response body.
    Format,
    /// Other/unknown errors.
    Other,
}

impl ErrorCategory {
    /// Whether this error category is typically transient.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network)
    }

    /// Get a user-friendly description of this error category.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Network => "Network connectivity issue",
            Self::Auth => "Authentication failed",
            Self::Format => "Invalid JSON-RPC payload",
            Self::Other => "Unexpected error",
        }
    }

    /// Get actionable advice for resolving this error category.
    #[must_use]
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Network => "Check that the device is reachable and the JSON-RPC server is enabled",
            Self::Auth => "Verify the username and password for the device",
            Self::Format => "The device returned an unexpected response, check its software version",
            Self::Other => "Check the error details for more information",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Errors that can occur while talking to a device.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP request failed: {message}")]
    Http {
        /// Error message.
        message: String,
        /// HTTP status code if available.
        status: Option<u16>,
    },

    /// The device rejected the credentials.
    #[error("authentication rejected by device (HTTP {status})")]
    Unauthorized {
        /// HTTP status code (401 or 403).
        status: u16,
    },

    /// Request could not be encoded.
    #[error("failed to encode request: {0}")]
    Encode(String),

    /// Invalid response from the device.
    #[error("invalid JSON-RPC response: {0}")]
    InvalidResponse(String),

    /// Transport was configured with unusable settings.
    #[error("invalid transport configuration: {0}")]
    Config(String),

    /// Generic error.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an HTTP error.
    pub fn http(message: impl Into<String>, status: Option<u16>) -> Self {
        Self::Http {
            message: message.into(),
            status,
        }
    }

    /// Get the error category.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Http { .. } => ErrorCategory::Network,
            Error::Unauthorized { .. } => ErrorCategory::Auth,
            Error::Encode(_) => ErrorCategory::Format,
            Error::InvalidResponse(_) => ErrorCategory::Format,
            Error::Config(_) => ErrorCategory::Other,
            Error::Other(_) => ErrorCategory::Other,
        }
    }

    /// Whether this error is typically transient.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.category().is_retryable()
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code @ (401 | 403)) => Self::Unauthorized { status: code },
            ureq::Error::StatusCode(code) => Self::Http {
                message: format!("HTTP {}", code),
                status: Some(code),
            },
            other => Self::Http {
                message: other.to_string(),
                status: None,
            },
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}
