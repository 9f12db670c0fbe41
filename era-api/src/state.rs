//! App state: configuration, lookup service, query counter.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use era_core::constants::{
    DEFAULT_CACHE_HOURS, DEFAULT_DUNE_API_URL, DEFAULT_DUNE_QUERY_ID, DEFAULT_FRONTEND_PATH,
    DEFAULT_POLL_INTERVAL_MS, DEFAULT_PORT, DEFAULT_QUERY_TIMEOUT_SECONDS,
};
use era_dune::{DuneClient, DuneConfig};
use era_lookup::{LookupConfig, LookupService};

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Dune API key; `None` runs without an upstream
    pub dune_api_key: Option<String>,
    /// Dune base URL
    pub dune_api_url: String,
    /// Dune query to execute per lookup
    pub dune_query_id: u64,
    /// Delay between execution status polls, in milliseconds
    pub poll_interval_ms: u64,
    /// Overall deadline for one execution, in seconds
    pub timeout_seconds: u64,
    /// Cache TTL in hours
    pub cache_hours: u64,
    /// File served at `/`
    pub frontend_path: PathBuf,
    /// Listen port
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            dune_api_key: None,
            dune_api_url: DEFAULT_DUNE_API_URL.into(),
            dune_query_id: DEFAULT_DUNE_QUERY_ID,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            timeout_seconds: DEFAULT_QUERY_TIMEOUT_SECONDS,
            cache_hours: DEFAULT_CACHE_HOURS,
            frontend_path: PathBuf::from(DEFAULT_FRONTEND_PATH),
            port: DEFAULT_PORT,
        }
    }
}

impl ApiConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source. Unparseable numbers
    /// fall back to their defaults.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            dune_api_key: get("DUNE_API_KEY").filter(|k| !k.trim().is_empty()),
            dune_api_url: get("DUNE_API_URL").unwrap_or(defaults.dune_api_url),
            dune_query_id: parse_or(&get, "DUNE_QUERY_ID", defaults.dune_query_id),
            poll_interval_ms: parse_or(&get, "DUNE_POLL_INTERVAL_MS", defaults.poll_interval_ms),
            timeout_seconds: parse_or(&get, "DUNE_TIMEOUT_SECONDS", defaults.timeout_seconds),
            cache_hours: parse_or(&get, "CACHE_HOURS", defaults.cache_hours),
            frontend_path: get("FRONTEND_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.frontend_path),
            port: parse_or(&get, "PORT", defaults.port),
        }
    }

    /// Dune client settings, if a key is configured.
    pub fn dune_config(&self) -> Option<DuneConfig> {
        let key = self.dune_api_key.as_deref()?;

        Some(
            DuneConfig::new(key)
                .with_api_url(&self.dune_api_url)
                .with_query_id(self.dune_query_id)
                .with_poll_interval(Duration::from_millis(self.poll_interval_ms))
                .with_timeout(Duration::from_secs(self.timeout_seconds)),
        )
    }

    /// Builds the lookup service. Without a usable Dune client every lookup
    /// yields the zero-value record.
    pub fn lookup_service(&self) -> LookupService {
        let lookup_config = LookupConfig {
            cache_hours: self.cache_hours,
        };

        let Some(dune_config) = self.dune_config() else {
            warn!("DUNE_API_KEY not set; lookups will return zero-value records");
            return LookupService::unavailable(lookup_config);
        };

        match DuneClient::with_config(dune_config) {
            Ok(client) => LookupService::new(Arc::new(client), lookup_config),
            Err(e) => {
                warn!(error = %e, "Dune client unavailable; lookups will return zero-value records");
                LookupService::unavailable(lookup_config)
            }
        }
    }
}

fn parse_or<T: FromStr>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match get(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "Invalid number in environment, using default");
            default
        }),
        None => default,
    }
}

/// State shared by all handlers.
pub struct AppState {
    /// Server configuration
    pub config: ApiConfig,
    /// Cache-or-fetch lookup service
    pub lookup: LookupService,
    query_count: AtomicU64,
}

impl AppState {
    /// Creates state with a lookup service built from `config`.
    pub fn new(config: ApiConfig) -> Self {
        let lookup = config.lookup_service();
        Self::with_lookup(config, lookup)
    }

    /// Creates state around an existing lookup service.
    pub fn with_lookup(config: ApiConfig, lookup: LookupService) -> Self {
        Self {
            config,
            lookup,
            query_count: AtomicU64::new(0),
        }
    }

    /// Counts one valid lookup request.
    pub fn record_query(&self) -> u64 {
        self.query_count.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Valid lookup requests served since start.
    pub fn query_count(&self) -> u64 {
        self.query_count.load(Ordering::Relaxed)
    }
}
