//! Error types for Era.
//!
//! A single error hierarchy using `thiserror`. The lookup service never hands
//! these to HTTP callers except for address validation; everything else is
//! logged and degraded to a zero-value record.

use thiserror::Error;

/// Result type alias using `AirdropError`.
pub type Result<T> = std::result::Result<T, AirdropError>;

/// Main error type for all Era operations.
#[derive(Debug, Error)]
pub enum AirdropError {
    // ═══════════════════════════════════════════════════════════════════════════
    // VALIDATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Wallet address is not a valid Ethereum address.
    #[error("Invalid wallet address '{address}': {reason}")]
    InvalidAddress {
        /// The rejected input
        address: String,
        /// What was wrong with it
        reason: String,
    },

    // ═══════════════════════════════════════════════════════════════════════════
    // UPSTREAM (DUNE) ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// No API credential configured for the upstream.
    #[error("Dune API key not configured")]
    MissingCredentials,

    /// Transport-level HTTP failure.
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Upstream answered with a non-success status.
    #[error("Dune returned HTTP {status}: {body}")]
    UpstreamStatus {
        /// HTTP status code
        status: u16,
        /// Response body text
        body: String,
    },

    /// Query execution ended in a non-completed terminal state.
    #[error("Dune execution {execution_id} ended in state {state}")]
    QueryFailed {
        /// Dune execution id
        execution_id: String,
        /// Terminal state reported by Dune
        state: String,
    },

    /// Query execution did not finish before the deadline.
    #[error("Dune execution {execution_id} did not finish within {seconds}s")]
    QueryTimeout {
        /// Dune execution id
        execution_id: String,
        /// Deadline that was exceeded
        seconds: u64,
    },

    /// Upstream payload did not have the expected shape.
    #[error("Invalid upstream response: {0}")]
    InvalidResponse(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // SERIALIZATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ═══════════════════════════════════════════════════════════════════════════
    // CONFIGURATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Internal error (should not happen in normal operation).
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AirdropError {
    /// Creates an [`AirdropError::InvalidAddress`].
    pub fn invalid_address(address: impl Into<String>, reason: impl Into<String>) -> Self {
        AirdropError::InvalidAddress {
            address: address.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if a later attempt could succeed (transient upstream trouble).
    pub fn is_recoverable(&self) -> bool {
        match self {
            AirdropError::HttpError(_)
            | AirdropError::QueryTimeout { .. } => true,
            AirdropError::UpstreamStatus { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Returns true if this is a validation error.
    pub fn is_validation_error(&self) -> bool {
        matches!(self, AirdropError::InvalidAddress { .. })
    }
}
