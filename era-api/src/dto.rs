//! Response bodies.

use serde::Serialize;

use era_core::constants::{CACHED_MESSAGE, FRESH_MESSAGE, SERVICE_NAME, STATUS_OPERATIONAL};
use era_core::types::AirdropRecord;

/// Envelope returned by the lookup endpoint, success or not.
#[derive(Debug, Serialize)]
pub struct AirdropResponse {
    /// False for invalid input or an internal failure
    pub success: bool,
    /// The record; `null` when `success` is false
    pub data: Option<AirdropRecord>,
    /// Human-readable outcome
    pub message: String,
}

impl AirdropResponse {
    /// Successful lookup; the message says whether the cache answered.
    pub fn found(record: AirdropRecord, was_cached: bool) -> Self {
        let message = if was_cached { CACHED_MESSAGE } else { FRESH_MESSAGE };
        Self {
            success: true,
            data: Some(record),
            message: message.into(),
        }
    }

    /// Failed lookup.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: message.into(),
        }
    }
}

/// Liveness response.
#[derive(Debug, Serialize)]
pub struct RootResponse {
    /// Service name
    pub message: &'static str,
    /// Always "operational"
    pub status: &'static str,
}

impl Default for RootResponse {
    fn default() -> Self {
        Self {
            message: SERVICE_NAME,
            status: STATUS_OPERATIONAL,
        }
    }
}

/// Usage statistics.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    /// Valid lookup requests since start
    pub total_queries: u64,
    /// Distinct addresses in the cache
    pub cached_addresses: usize,
    /// Cache TTL in hours
    pub cache_hours: u64,
    /// Always "operational"
    pub status: &'static str,
}
