use async_trait::async_trait;

use crate::entities::{
    AnomalyRecord, BucketRow, DailyRow, HourRow, TotalsRow, UserProfile,
};
use crate::services::Predicate;
use crate::value_objects::TimeRange;

/// Maximum number of rows one export request may return.
pub const EXPORT_ROW_LIMIT: i64 = 1000;
/// Maximum number of profiles in a list response.
pub const PROFILE_LIST_LIMIT: i64 = 50;

#[async_trait]
pub trait DashboardRepository: Send + Sync {
    /// Trivial round trip; `Ok` means the store is reachable right now.
    async fn ping(&self) -> anyhow::Result<()>;

    async fn is_available(&self) -> bool {
        self.ping().await.is_ok()
    }

    /// Newest first, at most [`EXPORT_ROW_LIMIT`] rows.
    async fn fetch_export(&self, predicate: &Predicate) -> anyhow::Result<Vec<AnomalyRecord>>;

    /// Sparse rows, one per day that has anomalies.
    async fn fetch_daily_trend(&self, predicate: &Predicate) -> anyhow::Result<Vec<DailyRow>>;

    /// Sparse rows keyed by 1-based `width_bucket` index.
    async fn fetch_histogram(&self, predicate: &Predicate) -> anyhow::Result<Vec<BucketRow>>;

    async fn fetch_hourly(&self, range: TimeRange) -> anyhow::Result<Vec<HourRow>>;

    async fn fetch_totals(&self) -> anyhow::Result<TotalsRow>;

    async fn fetch_user_profiles(&self, user_id: Option<&str>)
        -> anyhow::Result<Vec<UserProfile>>;
}
