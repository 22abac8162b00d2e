use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;

use backend_application::export_codec::encode_csv;
use backend_application::queries::export_queries;
use backend_application::AppState;
use backend_domain::{ExportFormat, ExportParams};

use crate::error::HttpError;

pub const DATA_SOURCE_HEADER: &str = "x-data-source";

/// `GET /api/anomalies/export`. JSON by default, CSV with `format=csv`.
pub async fn export_anomalies(
    State(state): State<AppState>,
    Query(params): Query<ExportParams>,
) -> Result<Response, HttpError> {
    let format = params.export_format();
    let export = export_queries::export_anomalies(&state, &params).await;

    let mut headers = HeaderMap::new();
    headers.insert(
        DATA_SOURCE_HEADER,
        HeaderValue::from_static(export.source.as_str()),
    );

    match format {
        ExportFormat::Json => Ok((headers, Json(export)).into_response()),
        ExportFormat::Csv => {
            let body = encode_csv(&export.data).map_err(HttpError::internal)?;
            headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static(format.content_type()),
            );
            let disposition = format!(
                "attachment; filename=\"anomalies-{}.{}\"",
                Utc::now().format("%Y-%m-%d"),
                format.extension()
            );
            if let Ok(value) = HeaderValue::from_str(&disposition) {
                headers.insert(header::CONTENT_DISPOSITION, value);
            }
            Ok((headers, body).into_response())
        }
    }
}
