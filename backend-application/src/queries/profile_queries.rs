use chrono::Utc;
use tracing::info;

use backend_domain::{DataSourceKind, ProfileParams, UserProfileList, PROFILE_LIST_LIMIT};

use crate::datasource::{synthetic_generator, DataSource};
use crate::queries::metrics_queries::query_failed;
use crate::{AppError, AppState};

/// One profile by exact user id, or the 50 most recently updated.
pub async fn list_user_profiles(
    state: &AppState,
    params: &ProfileParams,
) -> Result<UserProfileList, AppError> {
    let user_id = params.user_id();

    let (profiles, source) = match DataSource::resolve(state).await {
        DataSource::Available(repo) => {
            let profiles = repo
                .fetch_user_profiles(user_id.as_deref())
                .await
                .map_err(|err| {
                    query_failed(state, "user_profiles", err, "Failed to fetch user profiles")
                })?;
            (profiles, DataSourceKind::Database)
        }
        DataSource::Unavailable(_) => {
            let profiles = synthetic_generator(&state.config).user_profiles(
                user_id.as_deref(),
                PROFILE_LIST_LIMIT as usize,
                Utc::now(),
            );
            (profiles, DataSourceKind::Mock)
        }
    };

    info!(
        profiles = profiles.len(),
        source = source.as_str(),
        "user profiles served"
    );
    Ok(UserProfileList { profiles, source })
}
