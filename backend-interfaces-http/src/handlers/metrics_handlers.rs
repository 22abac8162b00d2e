use axum::extract::{Query, State};
use axum::Json;

use backend_application::queries::metrics_queries;
use backend_application::AppState;
use backend_domain::{
    AnalyticsParams, Histogram, HourlyActivity, HourlyParams, TotalsSnapshot, TrendSeries,
};

use crate::error::HttpError;

pub async fn anomaly_trends(
    State(state): State<AppState>,
    Query(params): Query<AnalyticsParams>,
) -> Result<Json<TrendSeries>, HttpError> {
    let series = metrics_queries::anomaly_trends(&state, &params).await?;
    Ok(Json(series))
}

pub async fn score_distribution(
    State(state): State<AppState>,
    Query(params): Query<AnalyticsParams>,
) -> Result<Json<Histogram>, HttpError> {
    let histogram = metrics_queries::score_distribution(&state, &params).await?;
    Ok(Json(histogram))
}

pub async fn hourly_activity(
    State(state): State<AppState>,
    Query(params): Query<HourlyParams>,
) -> Result<Json<HourlyActivity>, HttpError> {
    let activity = metrics_queries::hourly_activity(&state, &params).await?;
    Ok(Json(activity))
}

pub async fn total_transactions(
    State(state): State<AppState>,
) -> Result<Json<TotalsSnapshot>, HttpError> {
    let totals = metrics_queries::total_transactions(&state).await?;
    Ok(Json(totals))
}
