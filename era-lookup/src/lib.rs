//! # Era Lookup
//!
//! The cache-or-fetch core of the service:
//!
//! 1. Serve the cached record while it is younger than the TTL (24h by default)
//! 2. Otherwise run the upstream query for the wallet
//! 3. Normalize the first row, or fall back to the zero-value record
//! 4. Cache the result, stamped with the time the fetch began
//!
//! ## Example
//!
//! ```rust,ignore
//! use era_lookup::{LookupConfig, LookupService};
//!
//! let service = LookupService::new(Arc::new(dune_client), LookupConfig::default());
//! let outcome = service.lookup(&wallet).await;
//! println!("{} (cached: {})", outcome.record.total_allocation, outcome.was_cached);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod normalize;
mod service;

pub use service::{LookupConfig, LookupOutcome, LookupService, RecordOrigin};
