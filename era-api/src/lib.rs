//! # Era API Server
//!
//! HTTP API behind the airdrop dashboard frontend.
//!
//! ## Endpoints
//!
//! - `GET /` - Static dashboard page
//! - `GET /api` - Liveness
//! - `GET /api/airdrop/:wallet_address` - Claim/vesting status for a wallet
//! - `GET /api/stats` - Query counter and cache size
//!
//! ## Example
//!
//! ```rust,ignore
//! use era_api::{ApiConfig, ApiServer};
//!
//! let server = ApiServer::new(ApiConfig::from_env());
//! server.run(([0, 0, 0, 0], 8000)).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod dto;
mod error;
mod handlers;
mod routes;
mod state;

pub use dto::{AirdropResponse, RootResponse, StatsResponse};
pub use error::ApiError;
pub use routes::create_router;
pub use state::{ApiConfig, AppState};

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// API server for the airdrop dashboard.
pub struct ApiServer {
    state: Arc<AppState>,
}

impl ApiServer {
    /// Creates a server from configuration, building the Dune-backed lookup service.
    pub fn new(config: ApiConfig) -> Self {
        Self::with_state(AppState::new(config))
    }

    /// Creates a server around an existing state.
    pub fn with_state(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    /// Shared application state.
    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Creates the router with CORS and request tracing.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        create_router(self.state.clone())
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Runs the server on the given address.
    pub async fn run(self, addr: impl Into<SocketAddr>) -> std::io::Result<()> {
        let addr = addr.into();
        let listener = tokio::net::TcpListener::bind(addr).await?;

        info!(
            %addr,
            upstream = self.state.lookup.has_source(),
            cache_hours = self.state.lookup.cache_hours(),
            "Era Airdrop API listening"
        );

        axum::serve(listener, self.router()).await
    }
}
