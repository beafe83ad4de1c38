use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analytics::Analytics;
use crate::domain::{AccountNumber, TransactionId};
use crate::engine::{RiskEngine, ScoreError};
use crate::observability::MetricsRegistry;
use crate::storage::{FraudLogStore, TransactionStore};

use super::request::ScoreRequest;
use super::response::{
    ErrorResponse, ExportResponse, HealthResponse, ReadyResponse, ScoreResponse,
};

/// Shared application state.
pub struct AppState {
    pub engine: Arc<RiskEngine>,
    pub store: Arc<dyn TransactionStore>,
    pub audit: Arc<dyn FraudLogStore>,
    pub analytics: Analytics,
    pub metrics: Arc<MetricsRegistry>,
    pub start_time: Instant,
    pub version: String,
    pub export_path: PathBuf,
}

/// Create the application router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/v1/transactions", post(handle_score))
        .route("/v1/transactions/:id", get(handle_get_transaction))
        .route("/v1/transactions/:id/fraud-logs", get(handle_fraud_logs))
        .route(
            "/v1/accounts/:account/transactions",
            get(handle_account_transactions),
        )
        .route("/v1/analytics/summary", get(handle_summary))
        .route(
            "/v1/analytics/fraud-by-location",
            get(handle_fraud_by_location),
        )
        .route("/v1/analytics/export", get(handle_export))
        .route("/health", get(handle_health))
        .route("/ready", get(handle_ready))
        .route("/metrics", get(handle_metrics))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Submit a transaction: persist, score, persist the result back.
async fn handle_score(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ScoreRequest>,
) -> axum::response::Response {
    let start = Instant::now();

    if req.amount < 0.0 {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("amount must be non-negative")),
        )
            .into_response();
    }

    let Some(new_tx) = req.to_new_transaction() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(
                "amount is not a representable number",
            )),
        )
            .into_response();
    };
    let account = new_tx.account_number.clone();

    // The transaction is persisted before scoring so the audit entries
    // have an identifier to reference and the rapid window sees it.
    let tx = match state.store.insert(&new_tx).await {
        Ok(tx) => tx,
        Err(e) => {
            warn!(account = account.as_str(), error = %e, "Failed to persist transaction");
            state.metrics.record_data_access_failure();
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse::data_access("transaction store unavailable")),
            )
                .into_response();
        }
    };

    let assessment = match state.engine.score_transaction(&tx).await {
        Ok(a) => a,
        Err(ScoreError::DataAccess(e)) => {
            warn!(
                transaction_id = %tx.id,
                error = %e,
                "Evaluation aborted, transaction left unscored"
            );
            state.metrics.record_data_access_failure();
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse::data_access("evaluation aborted, retry")),
            )
                .into_response();
        }
    };

    if let Err(e) = state
        .store
        .update_assessment(tx.id, assessment.final_score, assessment.status)
        .await
    {
        warn!(transaction_id = %tx.id, error = %e, "Failed to persist assessment");
        state.metrics.record_data_access_failure();
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse::data_access("failed to persist assessment")),
        )
            .into_response();
    }

    state.metrics.record_status(assessment.status);
    state.metrics.record_latency(start);

    info!(
        transaction_id = %tx.id,
        account = account.as_str(),
        risk_score = assessment.final_score,
        status = %assessment.status,
        fired = assessment.fired.len(),
        "Transaction scored"
    );

    (
        StatusCode::OK,
        Json(ScoreResponse::new(tx.id, assessment)),
    )
        .into_response()
}

/// Point lookup of a transaction.
async fn handle_get_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> axum::response::Response {
    match state.store.find(TransactionId(id)).await {
        Ok(Some(tx)) => (StatusCode::OK, Json(tx)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found("transaction not found")),
        )
            .into_response(),
        Err(e) => {
            warn!(transaction_id = %id, error = %e, "Transaction lookup failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse::data_access("transaction store unavailable")),
            )
                .into_response()
        }
    }
}

/// Audit entries for a transaction.
async fn handle_fraud_logs(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> axum::response::Response {
    match state.audit.find_by_transaction(TransactionId(id)).await {
        Ok(entries) => (StatusCode::OK, Json(entries)).into_response(),
        Err(e) => {
            warn!(transaction_id = %id, error = %e, "Fraud log lookup failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse::data_access("audit log unavailable")),
            )
                .into_response()
        }
    }
}

/// All transactions for an account, in insertion order.
async fn handle_account_transactions(
    State(state): State<Arc<AppState>>,
    Path(account): Path<String>,
) -> axum::response::Response {
    match state
        .store
        .find_by_account(&AccountNumber::new(account))
        .await
    {
        Ok(transactions) => (StatusCode::OK, Json(transactions)).into_response(),
        Err(e) => {
            warn!(error = %e, "Account lookup failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse::data_access("transaction store unavailable")),
            )
                .into_response()
        }
    }
}

/// Aggregate fraud summary.
async fn handle_summary(State(state): State<Arc<AppState>>) -> axum::response::Response {
    match state.analytics.fraud_summary().await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => {
            warn!(error = %e, "Fraud summary failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse::data_access("transaction store unavailable")),
            )
                .into_response()
        }
    }
}

/// Fraud counts per location.
async fn handle_fraud_by_location(State(state): State<Arc<AppState>>) -> axum::response::Response {
    match state.analytics.fraud_by_location().await {
        Ok(map) => (StatusCode::OK, Json(map)).into_response(),
        Err(e) => {
            warn!(error = %e, "Fraud-by-location failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse::data_access("transaction store unavailable")),
            )
                .into_response()
        }
    }
}

/// Export training data as CSV and return the written path.
async fn handle_export(State(state): State<Arc<AppState>>) -> axum::response::Response {
    match state
        .analytics
        .export_training_data(&state.export_path)
        .await
    {
        Ok(path) => (
            StatusCode::OK,
            Json(ExportResponse {
                path: path.display().to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            warn!(error = %e, "CSV export failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("CSV export failed", "EXPORT_FAILED")),
            )
                .into_response()
        }
    }
}

/// Health check endpoint.
async fn handle_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// Readiness check endpoint.
async fn handle_ready(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    // The battery is fixed at startup
    Json(ReadyResponse {
        ready: true,
        rules_loaded: state.engine.rules_loaded(),
    })
}

/// Metrics endpoint (Prometheus format).
async fn handle_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; charset=utf-8",
        )],
        state.metrics.to_prometheus(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn test_app_state() -> (Arc<AppState>, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let metrics = Arc::new(MetricsRegistry::new());
        let engine = Arc::new(RiskEngine::new(
            store.clone(),
            store.clone(),
            metrics.clone(),
        ));

        let state = Arc::new(AppState {
            engine,
            store: store.clone(),
            audit: store.clone(),
            analytics: Analytics::new(store.clone()),
            metrics,
            start_time: Instant::now(),
            version: "0.1.0-test".to_string(),
            export_path: std::env::temp_dir().join("frisk-test-export.csv"),
        });

        (state, store)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (state, _) = test_app_state();
        let app = create_router(state);

        let request = axum::http::Request::builder()
            .uri("/health")
            .body(axum::body::Body::empty())
            .unwrap();

        let response = tower::ServiceExt::oneshot(app, request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_score_endpoint_end_to_end() {
        let (state, store) = test_app_state();
        let app = create_router(state);

        let body = r#"{
            "account_number": "A1",
            "amount": 60000.0,
            "location": "NY",
            "transaction_time": "2026-05-01T02:00:00Z"
        }"#;

        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/v1/transactions")
            .header("content-type", "application/json")
            .body(axum::body::Body::from(body))
            .unwrap();

        let response = tower::ServiceExt::oneshot(app, request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["risk_score"], 65);
        assert_eq!(json["status"], "SUSPICIOUS");
        assert_eq!(json["fired_rules"].as_array().unwrap().len(), 2);

        // Assessment persisted back onto the record
        assert_eq!(store.transaction_count(), 1);
        let stored = &store.find_all().await.unwrap()[0];
        assert_eq!(stored.risk_score, Some(65));
    }

    #[tokio::test]
    async fn test_score_endpoint_rejects_negative_amount() {
        let (state, store) = test_app_state();
        let app = create_router(state);

        let body = r#"{"account_number": "A1", "amount": -5.0, "location": "NY"}"#;

        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/v1/transactions")
            .header("content-type", "application/json")
            .body(axum::body::Body::from(body))
            .unwrap();

        let response = tower::ServiceExt::oneshot(app, request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(store.transaction_count(), 0);
    }

    #[tokio::test]
    async fn test_score_endpoint_rejects_unrepresentable_amount() {
        let (state, store) = test_app_state();
        let app = create_router(state);

        // Finite JSON number beyond the Decimal range; must not be
        // coerced to zero and persisted.
        let body = r#"{"account_number": "A1", "amount": 1e30, "location": "NY"}"#;

        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/v1/transactions")
            .header("content-type", "application/json")
            .body(axum::body::Body::from(body))
            .unwrap();

        let response = tower::ServiceExt::oneshot(app, request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(store.transaction_count(), 0);
    }

    #[tokio::test]
    async fn test_get_unknown_transaction_is_404() {
        let (state, _) = test_app_state();
        let app = create_router(state);

        let request = axum::http::Request::builder()
            .uri(format!("/v1/transactions/{}", Uuid::new_v4()))
            .body(axum::body::Body::empty())
            .unwrap();

        let response = tower::ServiceExt::oneshot(app, request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_metrics_endpoint() {
        let (state, _) = test_app_state();
        let app = create_router(state);

        let request = axum::http::Request::builder()
            .uri("/metrics")
            .body(axum::body::Body::empty())
            .unwrap();

        let response = tower::ServiceExt::oneshot(app, request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
