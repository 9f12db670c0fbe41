//! API route handlers.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use tracing::{debug, info};

use era_core::constants::STATUS_OPERATIONAL;
use era_core::error::AirdropError;
use era_core::types::WalletAddress;

use crate::dto::*;
use crate::error::ApiError;
use crate::state::AppState;

type Result<T> = std::result::Result<T, ApiError>;

/// GET /api
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse::default())
}

/// GET /api/airdrop/:wallet_address
pub async fn get_airdrop(
    State(state): State<Arc<AppState>>,
    wallet_address: std::result::Result<Path<String>, PathRejection>,
) -> Result<Json<AirdropResponse>> {
    // A segment that is not valid UTF-8 is just another malformed address.
    let Path(wallet_address) = wallet_address.map_err(|rejection| {
        debug!(%rejection, "Undecodable wallet path segment");
        ApiError::invalid_address()
    })?;

    let wallet = WalletAddress::parse(&wallet_address)?;
    let started = Instant::now();

    // The lookup runs in its own task so a slow Dune execution finishes and
    // gets cached even if the client disconnects.
    let task_state = state.clone();
    let task_wallet = wallet.clone();
    let outcome = tokio::spawn(async move { task_state.lookup.lookup(&task_wallet).await })
        .await
        .map_err(|e| AirdropError::InternalError(e.to_string()))?;
    let query = state.record_query();

    info!(
        wallet = %wallet,
        query,
        cached = outcome.was_cached,
        origin = %outcome.origin,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Airdrop lookup"
    );

    Ok(Json(AirdropResponse::found(outcome.record, outcome.was_cached)))
}

/// GET /api/stats
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    Json(StatsResponse {
        total_queries: state.query_count(),
        cached_addresses: state.lookup.cached_addresses(),
        cache_hours: state.lookup.cache_hours(),
        status: STATUS_OPERATIONAL,
    })
}
