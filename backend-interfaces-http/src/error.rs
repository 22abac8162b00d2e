use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use backend_application::AppError;

#[derive(Debug)]
pub enum HttpError {
    BadRequest(String),
    ServiceUnavailable(String),
    Internal {
        error: String,
        details: Option<String>,
    },
}

impl HttpError {
    pub fn internal(err: anyhow::Error) -> Self {
        let root = err.root_cause().to_string();
        let error = err.to_string();
        HttpError::Internal {
            details: (root != error).then_some(root),
            error,
        }
    }
}

impl From<AppError> for HttpError {
    fn from(value: AppError) -> Self {
        let details = value.details();
        match value {
            AppError::BadRequest(msg) => HttpError::BadRequest(msg),
            AppError::Unavailable(msg) => HttpError::ServiceUnavailable(msg),
            AppError::Internal(err) => HttpError::Internal {
                error: err.to_string(),
                details,
            },
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, error, details) = match self {
            HttpError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, format!("bad request: {}", msg), None)
            }
            HttpError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("service unavailable: {}", msg),
                None,
            ),
            HttpError::Internal { error, details } => {
                error!(error = %error, details = details.as_deref(), "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, error, details)
            }
        };
        (status, Json(ErrorBody { error, details })).into_response()
    }
}
