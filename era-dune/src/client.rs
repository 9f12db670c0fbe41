//! Dune REST client implementation.
//!
//! A query run is three kinds of call: start an execution, poll its status
//! until it reaches a terminal state, then fetch the result rows.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use era_core::constants::{
    DEFAULT_DUNE_API_URL, DEFAULT_DUNE_QUERY_ID, DEFAULT_HTTP_TIMEOUT_SECONDS,
    DEFAULT_POLL_INTERVAL_MS, DEFAULT_QUERY_TIMEOUT_SECONDS, DUNE_WALLET_PARAMETER,
};
use era_core::error::{AirdropError, Result};
use era_core::traits::AirdropSource;
use era_core::types::{AirdropRow, WalletAddress};

const API_KEY_HEADER: &str = "X-Dune-API-Key";

/// Dune client configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DuneConfig {
    /// Base URL of the Dune API (e.g. "https://api.dune.com")
    pub api_url: String,
    /// API key sent as `X-Dune-API-Key`
    pub api_key: String,
    /// Saved query to execute
    pub query_id: u64,
    /// Execution tier requested from Dune ("medium" or "large")
    pub performance: String,
    /// Delay between status polls in milliseconds
    pub poll_interval_ms: u64,
    /// Overall deadline for one execution in seconds
    pub timeout_seconds: u64,
    /// Per-request HTTP timeout in seconds
    pub http_timeout_seconds: u64,
}

impl DuneConfig {
    /// Creates config for the default Era query with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_DUNE_API_URL.into(),
            api_key: api_key.into(),
            query_id: DEFAULT_DUNE_QUERY_ID,
            performance: "medium".into(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            timeout_seconds: DEFAULT_QUERY_TIMEOUT_SECONDS,
            http_timeout_seconds: DEFAULT_HTTP_TIMEOUT_SECONDS,
        }
    }

    /// Points the client at a different base URL.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Executes a different saved query.
    pub fn with_query_id(mut self, query_id: u64) -> Self {
        self.query_id = query_id;
        self
    }

    /// Sets the status poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_ms = interval.as_millis() as u64;
        self
    }

    /// Sets the overall execution deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_seconds = timeout.as_secs();
        self
    }

    fn base(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }
}

/// Lifecycle state of a Dune execution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExecutionState {
    /// Queued, not started
    Pending,
    /// Running
    Executing,
    /// Finished with full results
    Completed,
    /// Finished but results were truncated
    CompletedPartial,
    /// Execution failed
    Failed,
    /// Execution was cancelled
    Cancelled,
    /// Results expired before they were fetched
    Expired,
    /// A state this client does not know about
    Unknown(String),
}

impl ExecutionState {
    /// Parses Dune's `QUERY_STATE_*` strings.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "QUERY_STATE_PENDING" => Self::Pending,
            "QUERY_STATE_EXECUTING" => Self::Executing,
            "QUERY_STATE_COMPLETED" => Self::Completed,
            "QUERY_STATE_COMPLETED_PARTIAL" => Self::CompletedPartial,
            "QUERY_STATE_FAILED" => Self::Failed,
            "QUERY_STATE_CANCELLED" | "QUERY_STATE_CANCELED" => Self::Cancelled,
            "QUERY_STATE_EXPIRED" => Self::Expired,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// True once results can be fetched.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed | Self::CompletedPartial)
    }

    /// True if the execution will never produce results.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed | Self::Cancelled | Self::Expired)
    }
}

/// Dune API client that runs the airdrop query for one wallet at a time.
pub struct DuneClient {
    config: DuneConfig,
    http_client: reqwest::Client,
}

impl DuneClient {
    /// Creates a client. Fails if the API key is empty.
    pub fn with_config(config: DuneConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(AirdropError::MissingCredentials);
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_seconds))
            .build()
            .map_err(|e| AirdropError::ConfigError(format!("HTTP client: {}", e)))?;

        Ok(Self { config, http_client })
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &DuneConfig {
        &self.config
    }

    /// Starts an execution of the configured query and returns its id.
    #[instrument(skip(self, wallet), fields(wallet = %wallet, query_id = self.config.query_id))]
    pub async fn execute(&self, wallet: &WalletAddress) -> Result<String> {
        let url = format!("{}/api/v1/query/{}/execute", self.config.base(), self.config.query_id);

        let mut params = serde_json::Map::new();
        params.insert(DUNE_WALLET_PARAMETER.into(), wallet.as_str().into());
        let body = ExecuteRequest {
            query_parameters: params,
            performance: &self.config.performance,
        };

        let request = self.http_client.post(&url).json(&body);
        let response: ExecuteResponse = self.send(request).await?;

        debug!(execution_id = %response.execution_id, state = %response.state, "Execution started");
        Ok(response.execution_id)
    }

    /// Fetches the current state of an execution.
    pub async fn status(&self, execution_id: &str) -> Result<ExecutionState> {
        let url = format!("{}/api/v1/execution/{}/status", self.config.base(), execution_id);
        let response: StatusResponse = self.send(self.http_client.get(&url)).await?;
        Ok(ExecutionState::parse(&response.state))
    }

    /// Fetches the result rows of a completed execution.
    pub async fn results(&self, execution_id: &str) -> Result<Vec<AirdropRow>> {
        let url = format!("{}/api/v1/execution/{}/results", self.config.base(), execution_id);
        let response: ResultsResponse = self.send(self.http_client.get(&url)).await?;

        let state = ExecutionState::parse(&response.state);
        if state == ExecutionState::CompletedPartial {
            warn!(execution_id, "Dune returned partial results");
        }

        Ok(response.result.map(|r| r.rows).unwrap_or_default())
    }

    /// Executes the query, waits for it to finish, and returns its rows.
    #[instrument(skip(self, wallet), fields(wallet = %wallet))]
    pub async fn run_query(&self, wallet: &WalletAddress) -> Result<Vec<AirdropRow>> {
        let execution_id = self.execute(wallet).await?;

        let poll_interval = Duration::from_millis(self.config.poll_interval_ms);
        let deadline = tokio::time::Instant::now() + Duration::from_secs(self.config.timeout_seconds);

        loop {
            let state = self.status(&execution_id).await?;

            if state.is_success() {
                break;
            }
            if state.is_failure() {
                return Err(AirdropError::QueryFailed {
                    execution_id,
                    state: format!("{:?}", state),
                });
            }
            if tokio::time::Instant::now() + poll_interval > deadline {
                return Err(AirdropError::QueryTimeout {
                    execution_id,
                    seconds: self.config.timeout_seconds,
                });
            }

            debug!(execution_id = %execution_id, ?state, "Waiting for execution");
            tokio::time::sleep(poll_interval).await;
        }

        let rows = self.results(&execution_id).await?;
        info!(execution_id = %execution_id, rows = rows.len(), "Dune query finished");
        Ok(rows)
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        let response = request
            .header(API_KEY_HEADER, &self.config.api_key)
            .send()
            .await
            .map_err(|e| AirdropError::HttpError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AirdropError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| AirdropError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl AirdropSource for DuneClient {
    async fn fetch_rows(&self, wallet: &WalletAddress) -> Result<Vec<AirdropRow>> {
        self.run_query(wallet).await
    }

    fn name(&self) -> &str {
        "dune"
    }
}

#[derive(Serialize)]
struct ExecuteRequest<'a> {
    query_parameters: serde_json::Map<String, serde_json::Value>,
    performance: &'a str,
}

#[derive(Debug, Deserialize)]
struct ExecuteResponse {
    execution_id: String,
    #[serde(default)]
    state: String,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    state: String,
}

#[derive(Debug, Deserialize)]
struct ResultsResponse {
    #[serde(default)]
    state: String,
    #[serde(default)]
    result: Option<ResultBody>,
}

#[derive(Debug, Deserialize)]
struct ResultBody {
    #[serde(default)]
    rows: Vec<AirdropRow>,
}
