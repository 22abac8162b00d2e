use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::time::timeout;
use tracing::warn;

use backend_domain::ports::DashboardRepository;
use backend_domain::{AnomalyRecord, DataSourceKind, RuntimeConfig, SyntheticGenerator};

use crate::AppState;

/// Where one request reads from, decided once by pinging the store.
pub enum DataSource {
    Available(Arc<dyn DashboardRepository>),
    Unavailable(String),
}

impl DataSource {
    /// The ping gets `ping_timeout_ms`; a store that neither answers nor
    /// refuses within it counts as unavailable.
    pub async fn resolve(state: &AppState) -> Self {
        let budget = state.config.ping_timeout();
        let reason = match timeout(budget, state.repo.ping()).await {
            Ok(Ok(())) => return DataSource::Available(Arc::clone(&state.repo)),
            Ok(Err(err)) => err.to_string(),
            Err(_) => format!("ping timed out after {}ms", budget.as_millis()),
        };
        warn!(reason = %reason, "data source ping failed, using synthetic data");
        state.metrics.record_fallback();
        DataSource::Unavailable(reason)
    }

    pub fn kind(&self) -> DataSourceKind {
        match self {
            DataSource::Available(_) => DataSourceKind::Database,
            DataSource::Unavailable(_) => DataSourceKind::Mock,
        }
    }
}

pub fn synthetic_generator(config: &RuntimeConfig) -> SyntheticGenerator {
    SyntheticGenerator::new(config.mock_seed)
}

/// The configured synthetic dataset: `mock_record_count` records spread over
/// the `mock_window_days` ending at `now`.
pub fn synthetic_anomalies(config: &RuntimeConfig, now: DateTime<Utc>) -> Vec<AnomalyRecord> {
    let start = now - Duration::days(config.mock_window_days.max(1));
    synthetic_generator(config).anomalies(config.mock_record_count, start, now)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use anyhow::anyhow;
    use async_trait::async_trait;
    use chrono::TimeZone;

    use backend_domain::{
        BucketRow, DailyRow, HourRow, Predicate, TimeRange, TotalsRow, UserProfile,
    };

    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Mode {
        Healthy,
        QueryFails,
        Offline,
        Hanging,
    }

    /// In-memory store. `Offline` fails the ping, `Hanging` never answers
    /// it, `QueryFails` passes the ping and fails every query.
    pub struct FakeRepository {
        pub mode: Mode,
        pub records: Vec<AnomalyRecord>,
        pub daily: Vec<DailyRow>,
        pub buckets: Vec<BucketRow>,
        pub hours: Vec<HourRow>,
        pub totals: TotalsRow,
        pub profiles: Vec<UserProfile>,
        pub queries: AtomicUsize,
    }

    impl FakeRepository {
        pub fn new(mode: Mode) -> Self {
            Self {
                mode,
                records: Vec::new(),
                daily: Vec::new(),
                buckets: Vec::new(),
                hours: Vec::new(),
                totals: TotalsRow::default(),
                profiles: Vec::new(),
                queries: AtomicUsize::new(0),
            }
        }

        fn answer<T: Clone>(&self, value: &T) -> anyhow::Result<T> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            match self.mode {
                Mode::Healthy => Ok(value.clone()),
                Mode::QueryFails => Err(anyhow!("relation \"frauds\" does not exist")),
                Mode::Offline | Mode::Hanging => Err(anyhow!("connection refused")),
            }
        }
    }

    #[async_trait]
    impl DashboardRepository for FakeRepository {
        async fn ping(&self) -> anyhow::Result<()> {
            match self.mode {
                Mode::Offline => Err(anyhow!("connection refused")),
                Mode::Hanging => std::future::pending().await,
                _ => Ok(()),
            }
        }

        async fn fetch_export(&self, _predicate: &Predicate) -> anyhow::Result<Vec<AnomalyRecord>> {
            self.answer(&self.records)
        }

        async fn fetch_daily_trend(&self, _predicate: &Predicate) -> anyhow::Result<Vec<DailyRow>> {
            self.answer(&self.daily)
        }

        async fn fetch_histogram(&self, _predicate: &Predicate) -> anyhow::Result<Vec<BucketRow>> {
            self.answer(&self.buckets)
        }

        async fn fetch_hourly(&self, _range: TimeRange) -> anyhow::Result<Vec<HourRow>> {
            self.answer(&self.hours)
        }

        async fn fetch_totals(&self) -> anyhow::Result<TotalsRow> {
            self.answer(&self.totals)
        }

        async fn fetch_user_profiles(
            &self,
            user_id: Option<&str>,
        ) -> anyhow::Result<Vec<UserProfile>> {
            let profiles = self.answer(&self.profiles)?;
            Ok(profiles
                .into_iter()
                .filter(|profile| user_id.map_or(true, |id| profile.user_id == id))
                .collect())
        }
    }

    pub fn seeded_config() -> RuntimeConfig {
        RuntimeConfig {
            mock_seed: Some(42),
            ..RuntimeConfig::default()
        }
    }

    pub fn state_with(repo: FakeRepository) -> (AppState, Arc<FakeRepository>) {
        let repo = Arc::new(repo);
        let state = AppState::new(seeded_config(), repo.clone());
        (state, repo)
    }

    pub fn record(id: &str, user_id: &str, amount: f64) -> AnomalyRecord {
        AnomalyRecord::from_store(
            id.to_string(),
            user_id.to_string(),
            amount,
            Utc.with_ymd_and_hms(2026, 10, 17, 9, 30, 0).unwrap(),
            None,
            None,
            None,
        )
    }
}
