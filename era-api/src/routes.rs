//! API route configuration.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::services::ServeFile;

use crate::handlers;
use crate::state::AppState;

/// Creates the API router with all routes configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    let frontend = ServeFile::new(&state.config.frontend_path);

    Router::new()
        // Dashboard page
        .route_service("/", frontend)

        // Liveness
        .route("/api", get(handlers::root))
        .route("/api/", get(handlers::root))

        // Lookup
        .route("/api/airdrop/:wallet_address", get(handlers::get_airdrop))
        .route("/api/stats", get(handlers::get_stats))

        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use era_core::error::Result;
    use era_core::traits::AirdropSource;
    use era_core::types::{AirdropRow, WalletAddress};
    use era_lookup::{LookupConfig, LookupService};

    use crate::state::ApiConfig;

    const DEAD: &str = "0x000000000000000000000000000000000000dEaD";

    struct FixedRows(Vec<AirdropRow>);

    #[async_trait]
    impl AirdropSource for FixedRows {
        async fn fetch_rows(&self, _wallet: &WalletAddress) -> Result<Vec<AirdropRow>> {
            Ok(self.0.clone())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct Panicking;

    #[async_trait]
    impl AirdropSource for Panicking {
        async fn fetch_rows(&self, _wallet: &WalletAddress) -> Result<Vec<AirdropRow>> {
            panic!("row decoder blew up")
        }

        fn name(&self) -> &str {
            "panicking"
        }
    }

    fn test_state() -> Arc<AppState> {
        Arc::new(AppState::new(ApiConfig::default()))
    }

    fn state_with_row(row: Value) -> Arc<AppState> {
        let row = row.as_object().cloned().unwrap();
        let lookup = LookupService::new(Arc::new(FixedRows(vec![row])), LookupConfig::default());
        Arc::new(AppState::with_lookup(ApiConfig::default(), lookup))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_root() {
        for uri in ["/api", "/api/"] {
            let (status, body) = get_json(create_router(test_state()), uri).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["message"], "Era Airdrop Dashboard API");
            assert_eq!(body["status"], "operational");
        }
    }

    #[tokio::test]
    async fn test_invalid_address_rejected() {
        let state = test_state();

        for bad in ["not-an-address", "0x0000000000000000000000000000000000dEaD", "0x12"] {
            let (status, body) =
                get_json(create_router(state.clone()), &format!("/api/airdrop/{}", bad)).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["success"], false);
            assert_eq!(body["data"], Value::Null);
            assert_eq!(body["message"], "Invalid Ethereum wallet address format");
        }

        assert_eq!(state.query_count(), 0);
        assert_eq!(state.lookup.cached_addresses(), 0);
    }

    #[tokio::test]
    async fn test_undecodable_address_gets_envelope() {
        let state = test_state();

        let (status, body) = get_json(create_router(state.clone()), "/api/airdrop/%FF%FE").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], false);
        assert_eq!(body["data"], Value::Null);
        assert_eq!(body["message"], "Invalid Ethereum wallet address format");
        assert_eq!(state.query_count(), 0);
    }

    #[tokio::test]
    async fn test_lookup_without_credentials_returns_zero_record() {
        let state = test_state();

        let (status, body) =
            get_json(create_router(state.clone()), &format!("/api/airdrop/{}", DEAD)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Data retrieved successfully (fresh from blockchain)");

        let data = &body["data"];
        assert_eq!(data["wallet_address"], DEAD.to_lowercase());
        assert_eq!(data["is_claimed"], false);
        assert_eq!(data["claimed_amount"], 0.0);
        assert_eq!(data["vested_amount"], 0.0);
        assert_eq!(data["total_allocation"], 0.0);
        assert_eq!(data["vesting_end_date"], Value::Null);
        assert_eq!(data["days_left_vesting"], 0);

        assert_eq!(state.query_count(), 1);
    }

    #[tokio::test]
    async fn test_second_lookup_is_cached() {
        let state = test_state();
        let uri = format!("/api/airdrop/{}", DEAD);

        let (_, first) = get_json(create_router(state.clone()), &uri).await;
        // Different case, same wallet.
        let (_, second) = get_json(create_router(state.clone()), &uri.to_lowercase()).await;

        assert_eq!(second["message"], "Data retrieved successfully (cached - instant!)");
        assert_eq!(first["data"], second["data"]);
        assert_eq!(state.query_count(), 2);
        assert_eq!(state.lookup.cached_addresses(), 1);
    }

    #[tokio::test]
    async fn test_lookup_normalizes_upstream_row() {
        let state = state_with_row(json!({
            "is_claimed": true,
            "claimed_amount": "1500.5",
            "total_allocation": 3000,
            "pre_claim_status": true,
            "vesting_end_date": "2020-01-01T00:00:00Z",
            "claim_transaction_hash": "0xabc"
        }));

        let (_, body) = get_json(create_router(state), &format!("/api/airdrop/{}", DEAD)).await;

        let data = &body["data"];
        assert_eq!(body["success"], true);
        assert_eq!(data["is_claimed"], true);
        assert_eq!(data["claimed_amount"], 1500.5);
        assert_eq!(data["total_allocation"], 3000.0);
        assert_eq!(data["vested_amount"], 0.0);
        assert_eq!(data["days_left_vesting"], 0);
        assert_eq!(data["pre_claim_status"], true);
        assert_eq!(data["claim_transaction_hash"], "0xabc");
    }

    #[tokio::test]
    async fn test_failed_lookup_is_not_counted() {
        let lookup = LookupService::new(Arc::new(Panicking), LookupConfig::default());
        let state = Arc::new(AppState::with_lookup(ApiConfig::default(), lookup));

        let (status, body) =
            get_json(create_router(state.clone()), &format!("/api/airdrop/{}", DEAD)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], false);
        assert_eq!(body["data"], Value::Null);
        assert!(body["message"]
            .as_str()
            .unwrap()
            .starts_with("Failed to retrieve airdrop data: "));
        assert_eq!(state.query_count(), 0);
    }

    #[tokio::test]
    async fn test_stats() {
        let state = test_state();
        get_json(create_router(state.clone()), &format!("/api/airdrop/{}", DEAD)).await;
        get_json(create_router(state.clone()), "/api/airdrop/nope").await;

        let (status, body) = get_json(create_router(state), "/api/stats").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_queries"], 1);
        assert_eq!(body["cached_addresses"], 1);
        assert_eq!(body["cache_hours"], 24);
        assert_eq!(body["status"], "operational");
    }

    #[tokio::test]
    async fn test_frontend_served_at_root() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "<html><body>Era Airdrop</body></html>").unwrap();

        let config = ApiConfig {
            frontend_path: file.path().to_path_buf(),
            ..ApiConfig::default()
        };
        let app = create_router(Arc::new(AppState::new(config)));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("Era Airdrop"));
    }

    #[tokio::test]
    async fn test_bundled_dashboard_renders_text_only() {
        let config = ApiConfig {
            frontend_path: concat!(env!("CARGO_MANIFEST_DIR"), "/../static/index.html").into(),
            ..ApiConfig::default()
        };
        let app = create_router(Arc::new(AppState::new(config)));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let page = String::from_utf8_lossy(&bytes);
        assert!(page.contains("/api/airdrop/"));
        // Upstream strings (tx hash, messages) must never be parsed as markup.
        assert!(page.contains("textContent"));
        assert!(!page.contains("innerHTML"));
    }

    #[tokio::test]
    async fn test_missing_frontend_is_not_found() {
        let config = ApiConfig {
            frontend_path: "/nonexistent/index.html".into(),
            ..ApiConfig::default()
        };
        let app = create_router(Arc::new(AppState::new(config)));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
