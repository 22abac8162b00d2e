// Chart-ready analytics shapes and the sparse grouped rows they are built from

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{DataSourceKind, TimeRange};

/// One grouped row of the daily trend query.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRow {
    pub day: NaiveDate,
    pub count: i64,
    pub avg_score: Option<f64>,
}

/// One grouped row of the histogram query. `bucket` is 1-based, as returned
/// by `width_bucket`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketRow {
    pub bucket: i32,
    pub count: i64,
}

/// One grouped row of the hourly activity query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourRow {
    pub hour: Option<f64>,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub label: String,
    pub count: i64,
    pub avg_score: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendSeries {
    pub points: Vec<TrendPoint>,
    pub source: DataSourceKind,
    pub queried_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBucket {
    pub label: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Histogram {
    pub buckets: Vec<HistogramBucket>,
    pub source: DataSourceKind,
    pub queried_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyBucket {
    pub hour: String,
    pub anomalies: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyActivity {
    pub hourly_data: Vec<HourlyBucket>,
    pub time_range: TimeRange,
    pub source: DataSourceKind,
    pub queried_at: DateTime<Utc>,
}

/// Raw counters as read from the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TotalsRow {
    pub total_transactions: i64,
    pub last_updated: Option<DateTime<Utc>>,
    pub total_anomalies: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalsSnapshot {
    pub total_transactions: i64,
    pub last_updated_timestamp: Option<DateTime<Utc>>,
    pub total_anomalies: i64,
    pub source: DataSourceKind,
}

impl TotalsSnapshot {
    pub fn from_row(row: TotalsRow, source: DataSourceKind) -> Self {
        Self {
            total_transactions: row.total_transactions,
            last_updated_timestamp: row.last_updated,
            total_anomalies: row.total_anomalies,
            source,
        }
    }
}
