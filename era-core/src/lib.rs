//! # Era Core
//!
//! Core types, errors, and traits for the Era airdrop lookup service.
//!
//! This crate provides the foundational building blocks used by all other Era crates:
//!
//! - **Types**: Validated wallet addresses, airdrop records, upstream rows
//! - **Errors**: A single error enum with classification helpers
//! - **Constants**: Cache TTL, upstream defaults, user-facing messages
//! - **Traits**: The [`AirdropSource`] seam between the lookup service and the upstream
//!
//! ## Example
//!
//! ```rust
//! use era_core::{AirdropRecord, WalletAddress};
//!
//! let wallet = WalletAddress::parse("0x000000000000000000000000000000000000dEaD").unwrap();
//! let record = AirdropRecord::zero(&wallet);
//! assert_eq!(record.wallet_address, "0x000000000000000000000000000000000000dead");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{AirdropError, Result};
pub use traits::*;
pub use types::*;
