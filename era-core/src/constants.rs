//! Service constants for Era.
//!
//! Defaults for the cache, the Dune query, and the strings the HTTP layer
//! returns verbatim to the frontend.

// ═══════════════════════════════════════════════════════════════════════════════
// ADDRESS FORMAT
// ═══════════════════════════════════════════════════════════════════════════════

/// Size of an Ethereum address in bytes.
pub const ETH_ADDRESS_SIZE: usize = 20;

/// Number of hex characters in an Ethereum address (without `0x`).
pub const ETH_ADDRESS_HEX_LEN: usize = ETH_ADDRESS_SIZE * 2;

// ═══════════════════════════════════════════════════════════════════════════════
// CACHE
// ═══════════════════════════════════════════════════════════════════════════════

/// How long a fetched record stays fresh, in hours.
pub const DEFAULT_CACHE_HOURS: u64 = 24;

// ═══════════════════════════════════════════════════════════════════════════════
// DUNE
// ═══════════════════════════════════════════════════════════════════════════════

/// Dune query that returns the Era airdrop row for a wallet.
pub const DEFAULT_DUNE_QUERY_ID: u64 = 5_515_686;

/// Dune REST API base URL.
pub const DEFAULT_DUNE_API_URL: &str = "https://api.dune.com";

/// Name of the text parameter the Dune query expects.
pub const DUNE_WALLET_PARAMETER: &str = "wallet_address";

/// Interval between execution status polls, in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1_000;

/// Overall deadline for a single Dune execution, in seconds.
pub const DEFAULT_QUERY_TIMEOUT_SECONDS: u64 = 300;

/// Per-request HTTP timeout against Dune, in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;

// ═══════════════════════════════════════════════════════════════════════════════
// HTTP LAYER
// ═══════════════════════════════════════════════════════════════════════════════

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8000;

/// Default path of the static frontend served at `/`.
pub const DEFAULT_FRONTEND_PATH: &str = "static/index.html";

/// Human-readable service name.
pub const SERVICE_NAME: &str = "Era Airdrop Dashboard API";

/// Status string reported by liveness and stats endpoints.
pub const STATUS_OPERATIONAL: &str = "operational";

/// Message returned when the wallet address fails validation.
pub const INVALID_ADDRESS_MESSAGE: &str = "Invalid Ethereum wallet address format";

/// Message returned for a cache hit.
pub const CACHED_MESSAGE: &str = "Data retrieved successfully (cached - instant!)";

/// Message returned for a fresh fetch.
pub const FRESH_MESSAGE: &str = "Data retrieved successfully (fresh from blockchain)";

const _: () = assert!(ETH_ADDRESS_HEX_LEN == 40);
