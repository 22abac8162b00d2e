use axum::routing::get;
use axum::Router;

use backend_application::AppState;

use crate::handlers::{
    anomaly_handlers, metrics_handlers, ops_handlers, profile_handlers, stream_handlers,
};
use crate::middleware::count_requests;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/anomalies/export",
            get(anomaly_handlers::export_anomalies),
        )
        .route(
            "/api/metrics/anomaly-trends",
            get(metrics_handlers::anomaly_trends),
        )
        .route(
            "/api/metrics/score-distribution",
            get(metrics_handlers::score_distribution),
        )
        .route(
            "/api/metrics/hourly-activity",
            get(metrics_handlers::hourly_activity),
        )
        .route(
            "/api/metrics/total-transactions",
            get(metrics_handlers::total_transactions),
        )
        .route(
            "/api/user-profiles",
            get(profile_handlers::list_user_profiles),
        )
        .route("/api/stream", get(stream_handlers::stream_transaction))
        .route("/api/ops/health/live", get(ops_handlers::health_live))
        .route("/api/ops/health/ready", get(ops_handlers::health_ready))
        .route(
            "/api/ops/metrics/prometheus",
            get(ops_handlers::metrics_prometheus),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            count_requests,
        ))
        .with_state(state)
}
