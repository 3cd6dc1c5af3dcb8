//! Error types for reconciliation.
//!
//! Every error is fatal for the reconciliation call that produced it.
//! Nothing is retried.

use jsonrpc::Method;
use serde_json::Value;

/// Result type alias for reconciliation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The RPC call could not be completed (network, auth, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] jsonrpc::Error),

    /// The device answered with a non-null `error` field.
    #[error("device rejected {method} request {request_id}: {error}")]
    DeviceRejected {
        /// Method of the rejected request.
        method: Method,
        /// Identifier of the rejected request.
        request_id: u64,
        /// Raw device error payload.
        error: Value,
    },

    /// Desired state violates a precondition that schema validation does
    /// not catch. Raised before any RPC is issued.
    #[error("invalid desired state for {item}: {message}")]
    ValidationGap {
        /// Item the problem was found in.
        item: String,
        /// What is wrong.
        message: String,
    },

    /// A resource path string could not be parsed.
    #[error("invalid resource path '{path}': {reason}")]
    InvalidPath {
        /// The offending input.
        path: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A mode name other than `merged` or `deleted`.
    #[error("invalid mode '{0}' (expected merged or deleted)")]
    InvalidMode(String),

    /// A value document could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a validation gap error.
    pub fn validation(item: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationGap {
            item: item.into(),
            message: message.into(),
        }
    }

    /// Whether the device itself refused the request.
    #[must_use]
    pub fn is_device_rejection(&self) -> bool {
        matches!(self, Self::DeviceRejected { .. })
    }

    /// Whether the error was raised before any device traffic.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationGap { .. } | Self::InvalidPath { .. } | Self::InvalidMode(_)
        )
    }
}
