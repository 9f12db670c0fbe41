//! TTL cache for Era airdrop records.
//!
//! Process-local map from lowercase wallet address to the last fetched record.
//! Staleness is judged by the reader; nothing is evicted.

mod cache;

pub use cache::{AirdropCache, CacheEntry, CacheStats};
