use axum::extract::{Query, State};
use axum::Json;

use backend_application::queries::profile_queries;
use backend_application::AppState;
use backend_domain::{ProfileParams, UserProfileList};

use crate::error::HttpError;

pub async fn list_user_profiles(
    State(state): State<AppState>,
    Query(params): Query<ProfileParams>,
) -> Result<Json<UserProfileList>, HttpError> {
    let profiles = profile_queries::list_user_profiles(&state, &params).await?;
    Ok(Json(profiles))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::*;

    #[tokio::test]
    async fn unreachable_store_serves_synthetic_profiles() {
        let state = state(false, false, Vec::new());
        let params = ProfileParams {
            user_id: Some("acct_1234567".to_string()),
        };
        let Json(list) = list_user_profiles(State(state), Query(params))
            .await
            .expect("profiles");
        let body = serde_json::to_value(&list).expect("json");
        assert_eq!(body["source"], "mock");
        assert_eq!(body["profiles"][0]["userId"], "acct_1234567");
        assert!(body["profiles"][0]["usualLocations"].is_array());
    }
}
