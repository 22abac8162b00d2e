use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use backend_application::AppState;

pub async fn count_requests(State(state): State<AppState>, request: Request, next: Next) -> Response {
    state.metrics.record_request();
    next.run(request).await
}
