//! Cache-or-fetch airdrop lookup.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

use era_cache::{AirdropCache, CacheEntry};
use era_core::constants::DEFAULT_CACHE_HOURS;
use era_core::error::AirdropError;
use era_core::traits::AirdropSource;
use era_core::types::{AirdropRecord, WalletAddress};

use crate::normalize::normalize_rows;

const MAX_CACHE_HOURS: u64 = 24 * 365 * 100;

/// Lookup configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LookupConfig {
    /// How long a fetched record is served from cache, in hours
    pub cache_hours: u64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            cache_hours: DEFAULT_CACHE_HOURS,
        }
    }
}

impl LookupConfig {
    /// Cache TTL as a duration.
    pub fn ttl(&self) -> Duration {
        Duration::hours(self.cache_hours.min(MAX_CACHE_HOURS) as i64)
    }
}

/// Where a returned record came from.
///
/// Callers of the HTTP API cannot tell these apart; logs and the CLI can.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordOrigin {
    /// Served from a fresh cache entry
    Cache,
    /// Built from an upstream row
    Upstream,
    /// Upstream answered with no rows
    NoRows,
    /// No upstream configured
    Unavailable,
    /// Upstream failed; record is the zero-value placeholder
    UpstreamError,
}

impl fmt::Display for RecordOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RecordOrigin::Cache => "cache",
            RecordOrigin::Upstream => "upstream",
            RecordOrigin::NoRows => "no rows",
            RecordOrigin::Unavailable => "upstream unavailable",
            RecordOrigin::UpstreamError => "upstream error",
        };
        f.write_str(s)
    }
}

/// Result of one lookup.
#[derive(Clone, Debug, PartialEq)]
pub struct LookupOutcome {
    /// The record to return
    pub record: AirdropRecord,
    /// True if served from cache
    pub was_cached: bool,
    /// Provenance of the record
    pub origin: RecordOrigin,
}

/// Airdrop lookup service: owns the cache and the upstream source.
///
/// Never fails: when the upstream is missing, empty or broken the caller gets
/// the zero-value record, which is cached like any other.
pub struct LookupService {
    source: Option<Arc<dyn AirdropSource>>,
    cache: AirdropCache,
    config: LookupConfig,
}

impl LookupService {
    /// Creates a service backed by `source`.
    pub fn new(source: Arc<dyn AirdropSource>, config: LookupConfig) -> Self {
        Self::with_source(Some(source), config)
    }

    /// Creates a service with no upstream; every fetch yields the zero-value record.
    pub fn unavailable(config: LookupConfig) -> Self {
        Self::with_source(None, config)
    }

    /// Creates a service with an optional upstream.
    pub fn with_source(source: Option<Arc<dyn AirdropSource>>, config: LookupConfig) -> Self {
        Self {
            source,
            cache: AirdropCache::new(),
            config,
        }
    }

    /// Looks up a wallet, serving from cache while fresh.
    pub async fn lookup(&self, wallet: &WalletAddress) -> LookupOutcome {
        self.lookup_at(wallet, Utc::now()).await
    }

    /// Looks up a wallet as of `now`.
    #[instrument(skip(self, wallet), fields(wallet = %wallet))]
    pub async fn lookup_at(&self, wallet: &WalletAddress, now: DateTime<Utc>) -> LookupOutcome {
        let key = wallet.as_str();

        if let Some(entry) = self.cache.get_fresh(key, self.config.ttl(), now) {
            info!(fetched_at = %entry.fetched_at, "Cached data");
            return LookupOutcome {
                record: entry.record,
                was_cached: true,
                origin: RecordOrigin::Cache,
            };
        }

        info!("Fresh query");
        let (record, origin) = self.fetch(wallet, now).await;

        self.cache.put(key, CacheEntry::new(now, record.clone()));
        debug!(%origin, cached = self.cache.len(), "Stored lookup result");

        LookupOutcome {
            record,
            was_cached: false,
            origin,
        }
    }

    async fn fetch(&self, wallet: &WalletAddress, now: DateTime<Utc>) -> (AirdropRecord, RecordOrigin) {
        let Some(source) = &self.source else {
            warn!("No upstream configured, returning zero-value record");
            return (AirdropRecord::zero(wallet), RecordOrigin::Unavailable);
        };

        match source.fetch_rows(wallet).await {
            Ok(rows) if rows.is_empty() => {
                debug!(source = source.name(), "Upstream returned no rows");
                (AirdropRecord::zero(wallet), RecordOrigin::NoRows)
            }
            Ok(rows) => {
                if rows.len() > 1 {
                    debug!(rows = rows.len(), "Multiple rows, using the first");
                }
                (normalize_rows(wallet, &rows, now), RecordOrigin::Upstream)
            }
            Err(AirdropError::MissingCredentials) => {
                warn!(source = source.name(), "Upstream has no credentials");
                (AirdropRecord::zero(wallet), RecordOrigin::Unavailable)
            }
            Err(e) => {
                error!(source = source.name(), error = %e, recoverable = e.is_recoverable(), "Query error");
                (AirdropRecord::zero(wallet), RecordOrigin::UpstreamError)
            }
        }
    }

    /// True if an upstream source is configured.
    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    /// The underlying cache.
    pub fn cache(&self) -> &AirdropCache {
        &self.cache
    }

    /// Number of distinct addresses cached.
    pub fn cached_addresses(&self) -> usize {
        self.cache.len()
    }

    /// Cache TTL in hours.
    pub fn cache_hours(&self) -> u64 {
        self.config.cache_hours
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use era_core::error::Result;
    use era_core::types::AirdropRow;
    use serde_json::json;

    const DEAD: &str = "0x000000000000000000000000000000000000dEaD";

    enum Reply {
        Rows(Vec<AirdropRow>),
        Fail,
        NoCredentials,
    }

    struct MockSource {
        reply: Reply,
        calls: AtomicUsize,
    }

    impl MockSource {
        fn new(reply: Reply) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AirdropSource for MockSource {
        async fn fetch_rows(&self, _wallet: &WalletAddress) -> Result<Vec<AirdropRow>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Reply::Rows(rows) => Ok(rows.clone()),
                Reply::Fail => Err(AirdropError::HttpError("connection reset".into())),
                Reply::NoCredentials => Err(AirdropError::MissingCredentials),
            }
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    fn wallet() -> WalletAddress {
        WalletAddress::parse(DEAD).unwrap()
    }

    fn claimed_row() -> AirdropRow {
        json!({
            "is_claimed": true,
            "claimed_amount": 420.0,
            "total_allocation": 1000.0,
            "pre_claim_status": true,
            "vesting_end_date": "2020-01-01T00:00:00Z",
            "claim_transaction_hash": "0xfeed"
        })
        .as_object()
        .cloned()
        .unwrap()
    }

    #[tokio::test]
    async fn test_no_source_returns_zero_record() {
        let service = LookupService::unavailable(LookupConfig::default());
        let outcome = service.lookup(&wallet()).await;

        assert!(!outcome.was_cached);
        assert_eq!(outcome.origin, RecordOrigin::Unavailable);
        assert!(!outcome.record.is_claimed);
        assert_eq!(outcome.record.claimed_amount, 0.0);
        assert_eq!(outcome.record.total_allocation, 0.0);
        assert!(outcome.record.vesting_end_date.is_none());
        assert_eq!(service.cached_addresses(), 1);
    }

    #[tokio::test]
    async fn test_second_lookup_is_cached() {
        let source = MockSource::new(Reply::Rows(vec![claimed_row()]));
        let service = LookupService::new(source.clone(), LookupConfig::default());

        let first = service.lookup(&wallet()).await;
        let second = service.lookup(&wallet()).await;

        assert!(!first.was_cached);
        assert!(second.was_cached);
        assert_eq!(second.origin, RecordOrigin::Cache);
        assert_eq!(first.record, second.record);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_cache_key_ignores_case() {
        let source = MockSource::new(Reply::Rows(vec![claimed_row()]));
        let service = LookupService::new(source.clone(), LookupConfig::default());

        service.lookup(&wallet()).await;
        let upper = WalletAddress::parse(&DEAD.to_uppercase()).unwrap();
        assert!(service.lookup(&upper).await.was_cached);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_stale_entry_is_refetched() {
        let source = MockSource::new(Reply::Rows(vec![claimed_row()]));
        let service = LookupService::new(source.clone(), LookupConfig::default());
        let t0 = Utc::now();

        service.lookup_at(&wallet(), t0).await;

        let later = t0 + Duration::hours(24) + Duration::seconds(1);
        let outcome = service.lookup_at(&wallet(), later).await;

        assert!(!outcome.was_cached);
        assert_eq!(source.calls(), 2);
        assert_eq!(service.cache().get(DEAD).unwrap().fetched_at, later);
        assert_eq!(service.cached_addresses(), 1);
    }

    #[tokio::test]
    async fn test_just_before_ttl_is_cached() {
        let source = MockSource::new(Reply::Rows(vec![claimed_row()]));
        let service = LookupService::new(source.clone(), LookupConfig::default());
        let t0 = Utc::now();

        service.lookup_at(&wallet(), t0).await;
        let outcome = service
            .lookup_at(&wallet(), t0 + Duration::hours(24) - Duration::seconds(1))
            .await;

        assert!(outcome.was_cached);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_upstream_row_is_normalized() {
        let source = MockSource::new(Reply::Rows(vec![claimed_row()]));
        let service = LookupService::new(source, LookupConfig::default());

        let outcome = service.lookup(&wallet()).await;
        assert_eq!(outcome.origin, RecordOrigin::Upstream);
        assert!(outcome.record.is_claimed);
        assert_eq!(outcome.record.claimed_amount, 420.0);
        assert_eq!(outcome.record.vested_amount, 0.0);
        assert_eq!(outcome.record.days_left_vesting, Some(0));
        assert_eq!(outcome.record.claim_transaction_hash.as_deref(), Some("0xfeed"));
    }

    #[tokio::test]
    async fn test_upstream_error_degrades_and_caches() {
        let source = MockSource::new(Reply::Fail);
        let service = LookupService::new(source.clone(), LookupConfig::default());

        let outcome = service.lookup(&wallet()).await;
        assert_eq!(outcome.origin, RecordOrigin::UpstreamError);
        assert_eq!(outcome.record, AirdropRecord::zero(&wallet()));

        // The placeholder is cached like a real answer.
        assert!(service.lookup(&wallet()).await.was_cached);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_rows_and_missing_credentials() {
        let empty = LookupService::new(MockSource::new(Reply::Rows(vec![])), LookupConfig::default());
        assert_eq!(empty.lookup(&wallet()).await.origin, RecordOrigin::NoRows);

        let no_key = LookupService::new(MockSource::new(Reply::NoCredentials), LookupConfig::default());
        let outcome = no_key.lookup(&wallet()).await;
        assert_eq!(outcome.origin, RecordOrigin::Unavailable);
        assert!(outcome.record.is_zero());
    }

    #[tokio::test]
    async fn test_zero_ttl_never_caches_hits() {
        let source = MockSource::new(Reply::Rows(vec![claimed_row()]));
        let service = LookupService::new(source.clone(), LookupConfig { cache_hours: 0 });

        service.lookup(&wallet()).await;
        assert!(!service.lookup(&wallet()).await.was_cached);
        assert_eq!(source.calls(), 2);
    }

    #[test]
    fn test_config_ttl() {
        assert_eq!(LookupConfig::default().ttl(), Duration::hours(24));
        assert_eq!(LookupConfig::default().cache_hours, 24);
    }
}
