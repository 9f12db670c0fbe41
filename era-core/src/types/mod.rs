//! Domain types for Era.
//!
//! - [`WalletAddress`]: Validated, lowercase Ethereum address
//! - [`AirdropRecord`]: Normalized claim status for a wallet
//! - [`AirdropRow`]: Raw upstream result row

mod address;
mod record;

pub use address::*;
pub use record::*;
