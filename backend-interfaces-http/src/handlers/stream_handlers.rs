use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::IntoResponse;

use backend_application::queries::stream_queries;

use crate::error::HttpError;

/// One event per request; clients poll this endpoint on a fixed interval.
pub async fn stream_transaction() -> Result<impl IntoResponse, HttpError> {
    let body = stream_queries::next_transaction_event().map_err(HttpError::internal)?;
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/event-stream"),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
    Ok((headers, body))
}
