//! Airdrop record types.
//!
//! - [`AirdropRecord`]: the normalized claim status returned to callers
//! - [`AirdropRow`]: one raw row from the upstream query result

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::WalletAddress;

/// One raw result row as returned by the upstream query platform.
pub type AirdropRow = serde_json::Map<String, serde_json::Value>;

/// Normalized airdrop claim status for a wallet.
///
/// `vested_amount` is part of the public contract but nothing computes it yet;
/// it is always `0.0`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AirdropRecord {
    /// Lowercase wallet address
    pub wallet_address: String,
    /// Whether the allocation has been claimed
    pub is_claimed: bool,
    /// Amount already claimed
    pub claimed_amount: f64,
    /// Amount vested so far (always zero)
    pub vested_amount: f64,
    /// Total tokens allocated to the wallet
    pub total_allocation: f64,
    /// Eligibility flag from before the claim window opened
    pub pre_claim_status: bool,
    /// End of the vesting schedule, if known
    pub vesting_end_date: Option<DateTime<Utc>>,
    /// Whole days until vesting ends, never negative
    pub days_left_vesting: Option<u32>,
    /// Hash of the claim transaction, if claimed
    pub claim_transaction_hash: Option<String>,
}

impl AirdropRecord {
    /// The placeholder returned when there is nothing to report: all numbers
    /// zero, all flags false, no vesting date, no transaction hash.
    pub fn zero(wallet: &WalletAddress) -> Self {
        Self {
            wallet_address: wallet.as_str().to_string(),
            is_claimed: false,
            claimed_amount: 0.0,
            vested_amount: 0.0,
            total_allocation: 0.0,
            pre_claim_status: false,
            vesting_end_date: None,
            days_left_vesting: Some(0),
            claim_transaction_hash: None,
        }
    }

    /// Returns true if this record carries no information beyond the address.
    pub fn is_zero(&self) -> bool {
        !self.is_claimed
            && !self.pre_claim_status
            && self.claimed_amount == 0.0
            && self.total_allocation == 0.0
            && self.vesting_end_date.is_none()
            && self.claim_transaction_hash.is_none()
    }

    /// Allocation not yet claimed, floored at zero.
    pub fn unclaimed_amount(&self) -> f64 {
        (self.total_allocation - self.claimed_amount).max(0.0)
    }
}
