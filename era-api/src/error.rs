//! API error handling.
//!
//! Lookup failures are still HTTP 200: the frontend reads `success` and
//! `message` from the same envelope as a successful lookup.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, error};

use era_core::constants::INVALID_ADDRESS_MESSAGE;
use era_core::error::AirdropError;

use crate::dto::AirdropResponse;

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    message: String,
    code: &'static str,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(message: impl Into<String>, code: &'static str) -> Self {
        Self {
            message: message.into(),
            code,
        }
    }

    /// Malformed wallet address.
    pub fn invalid_address() -> Self {
        Self::new(INVALID_ADDRESS_MESSAGE, "INVALID_ADDRESS")
    }

    /// Unexpected failure while looking up a wallet.
    pub fn lookup_failed(reason: impl std::fmt::Display) -> Self {
        Self::new(
            format!("Failed to retrieve airdrop data: {}", reason),
            "LOOKUP_FAILED",
        )
    }

    /// Message placed in the response envelope.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Machine-readable code, used in logs.
    pub fn code(&self) -> &'static str {
        self.code
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        debug!(code = self.code, message = %self.message, "Lookup rejected");
        (StatusCode::OK, Json(AirdropResponse::failed(self.message))).into_response()
    }
}

impl From<AirdropError> for ApiError {
    fn from(err: AirdropError) -> Self {
        if err.is_validation_error() {
            return ApiError::invalid_address();
        }

        error!(error = %err, "Lookup failed");
        ApiError::lookup_failed(err)
    }
}
