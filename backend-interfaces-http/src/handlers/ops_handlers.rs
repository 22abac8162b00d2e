use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use backend_application::queries::ops_queries;
use backend_application::AppState;

use crate::error::HttpError;

#[derive(Debug, Serialize)]
pub struct ReadyStatus {
    status: &'static str,
    database: &'static str,
}

pub async fn health_live() -> StatusCode {
    StatusCode::OK
}

pub async fn health_ready(State(state): State<AppState>) -> Result<Json<ReadyStatus>, HttpError> {
    ops_queries::readiness(&state).await?;
    Ok(Json(ReadyStatus {
        status: "ready",
        database: "up",
    }))
}

pub async fn metrics_prometheus(State(state): State<AppState>) -> impl IntoResponse {
    let payload = state.metrics.render_prometheus();
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; version=0.0.4; charset=utf-8"),
    );
    (headers, payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::*;

    #[tokio::test]
    async fn readiness_follows_the_ping() {
        assert!(health_ready(State(state(true, false, Vec::new()))).await.is_ok());
        let response = health_ready(State(state(false, false, Vec::new())))
            .await
            .expect_err("not ready")
            .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn prometheus_text_lists_counters() {
        let state = state(true, false, Vec::new());
        state.metrics.record_request();
        let response = metrics_prometheus(State(state)).await.into_response();
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4; charset=utf-8"
        );
        assert!(body_text(response).await.contains("dashboard_requests_total 1"));
    }
}
