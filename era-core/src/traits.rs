//! Common traits for Era.
//!
//! These traits define the interfaces that different implementations can satisfy,
//! enabling modularity and testing.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{AirdropRow, WalletAddress};

// ═══════════════════════════════════════════════════════════════════════════════
// AIRDROP SOURCE TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Interface for the external query platform that knows airdrop allocations.
///
/// Implementations might use:
/// - The Dune REST API (production)
/// - A fixed set of rows (testing)
#[async_trait]
pub trait AirdropSource: Send + Sync {
    /// Runs the airdrop query for one wallet and returns the result rows.
    ///
    /// Execution can take tens of seconds; implementations must not block
    /// the runtime while waiting.
    async fn fetch_rows(&self, wallet: &WalletAddress) -> Result<Vec<AirdropRow>>;

    /// Short name used in logs.
    fn name(&self) -> &str;
}
