use tokio::time::{timeout, Duration};
use tracing::error;

use crate::{AppError, AppState};

/// Store ping bounded by the request timeout.
pub async fn readiness(state: &AppState) -> Result<(), AppError> {
    let timeout_secs = state.config.request_timeout_seconds.max(1);
    match timeout(Duration::from_secs(timeout_secs), state.repo.ping()).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => {
            error!("ready check failed: {}", err);
            Err(AppError::Unavailable(err.to_string()))
        }
        Err(_) => {
            error!("ready check timeout after {}s", timeout_secs);
            Err(AppError::Unavailable(format!(
                "ping timed out after {}s",
                timeout_secs
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasource::test_support::*;

    #[tokio::test]
    async fn ready_only_when_ping_succeeds() {
        let (healthy, _) = state_with(FakeRepository::new(Mode::QueryFails));
        assert!(readiness(&healthy).await.is_ok());

        let (offline, _) = state_with(FakeRepository::new(Mode::Offline));
        match readiness(&offline).await {
            Err(AppError::Unavailable(reason)) => assert!(reason.contains("refused")),
            other => panic!("unexpected readiness result: {:?}", other),
        }
    }
}
