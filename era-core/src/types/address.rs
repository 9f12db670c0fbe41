//! Wallet address type.
//!
//! [`WalletAddress`] can only be obtained through validation, so anything that
//! holds one is allowed onto the cache/fetch path.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};

use crate::constants::ETH_ADDRESS_HEX_LEN;
use crate::error::{AirdropError, Result};

/// A validated Ethereum wallet address, stored in lowercase `0x` form.
///
/// Accepted input is `0x` (or `0X`) followed by 40 hex characters. Mixed-case
/// input must carry a correct EIP-55 checksum; all-lowercase and all-uppercase
/// input is accepted as is.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Validates and normalizes an address.
    pub fn parse(input: &str) -> Result<Self> {
        let hex_part = input
            .strip_prefix("0x")
            .or_else(|| input.strip_prefix("0X"))
            .ok_or_else(|| AirdropError::invalid_address(input, "missing 0x prefix"))?;

        if hex_part.len() != ETH_ADDRESS_HEX_LEN {
            return Err(AirdropError::invalid_address(
                input,
                format!("expected {} hex characters, got {}", ETH_ADDRESS_HEX_LEN, hex_part.len()),
            ));
        }

        if !hex_part.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(AirdropError::invalid_address(input, "contains non-hex characters"));
        }

        let lower = hex_part.to_ascii_lowercase();
        let has_lower = hex_part.bytes().any(|b| b.is_ascii_lowercase());
        let has_upper = hex_part.bytes().any(|b| b.is_ascii_uppercase());

        if has_lower && has_upper && checksum_hex(&lower) != hex_part {
            return Err(AirdropError::invalid_address(input, "EIP-55 checksum mismatch"));
        }

        Ok(Self(format!("0x{}", lower)))
    }

    /// Returns true if `input` is a valid address.
    pub fn is_valid(input: &str) -> bool {
        Self::parse(input).is_ok()
    }

    /// Returns the normalized (lowercase) address, also used as the cache key.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the EIP-55 checksummed form.
    pub fn to_checksum_string(&self) -> String {
        format!("0x{}", checksum_hex(&self.0[2..]))
    }
}

/// Applies EIP-55 casing to 40 lowercase hex characters.
fn checksum_hex(lower: &str) -> String {
    let hash = Keccak256::digest(lower.as_bytes());

    lower
        .chars()
        .enumerate()
        .map(|(i, c)| {
            let byte = hash[i / 2];
            let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
            if c.is_ascii_alphabetic() && nibble >= 8 {
                c.to_ascii_uppercase()
            } else {
                c
            }
        })
        .collect()
}

impl FromStr for WalletAddress {
    type Err = AirdropError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for WalletAddress {
    type Error = AirdropError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<WalletAddress> for String {
    fn from(address: WalletAddress) -> Self {
        address.0
    }
}

impl AsRef<str> for WalletAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WalletAddress({})", self.0)
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
