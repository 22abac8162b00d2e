// Row shapes as selected from Postgres, before they become domain types.
// Every column is optional: the store is shared with the detector and its
// rows are not guaranteed complete.

use chrono::{DateTime, NaiveDate, Utc};

use backend_domain::{
    AnomalyRecord, ArrayColumn, BucketRow, DailyRow, HourRow, TotalsRow, UserProfile,
    UserProfileRow,
};

use crate::utils::epoch_seconds_to_utc;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ExportRow {
    pub id: Option<String>,
    pub user_id: Option<String>,
    pub amount: Option<f64>,
    pub timestamp: Option<f64>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub anomaly_score: Option<f64>,
}

impl ExportRow {
    /// `None` when the stored timestamp cannot be read as epoch seconds.
    pub fn into_record(self) -> Option<AnomalyRecord> {
        let timestamp = self.timestamp.and_then(epoch_seconds_to_utc)?;
        Some(AnomalyRecord::from_store(
            self.id.unwrap_or_default(),
            self.user_id.unwrap_or_default(),
            self.amount.unwrap_or(0.0),
            timestamp,
            self.location,
            self.description,
            self.anomaly_score,
        ))
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DailyTrendRow {
    pub day: Option<NaiveDate>,
    pub count: i64,
    pub avg_score: Option<f64>,
}

impl DailyTrendRow {
    pub fn into_domain(self) -> Option<DailyRow> {
        Some(DailyRow {
            day: self.day?,
            count: self.count,
            avg_score: self.avg_score,
        })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BucketCountRow {
    pub bucket: Option<i32>,
    pub count: i64,
}

impl From<BucketCountRow> for BucketRow {
    fn from(row: BucketCountRow) -> Self {
        BucketRow {
            bucket: row.bucket.unwrap_or(0),
            count: row.count,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct HourCountRow {
    pub hour: Option<f64>,
    pub count: i64,
}

impl From<HourCountRow> for HourRow {
    fn from(row: HourCountRow) -> Self {
        HourRow {
            hour: row.hour,
            count: row.count,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProcessingStatsRow {
    pub count_value: Option<i64>,
    pub last_updated_timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CountRow {
    pub total: i64,
}

pub fn totals_from(stats: Option<ProcessingStatsRow>, anomalies: Option<CountRow>) -> TotalsRow {
    let (total_transactions, last_updated) = stats
        .map(|row| (row.count_value.unwrap_or(0), row.last_updated_timestamp))
        .unwrap_or((0, None));
    TotalsRow {
        total_transactions,
        last_updated,
        total_anomalies: anomalies.map(|row| row.total).unwrap_or(0),
    }
}

/// Array columns are selected as `::text`, so JSONB lists and native
/// Postgres arrays both arrive here as strings.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserProfileRecord {
    pub user_id: Option<String>,
    pub usual_locations: Option<String>,
    pub merchant_categories: Option<String>,
    pub device_types: Option<String>,
    pub avg_transaction_amount: Option<f64>,
    pub model_score: Option<f64>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl From<UserProfileRecord> for UserProfile {
    fn from(row: UserProfileRecord) -> Self {
        let column = |value: Option<String>| value.as_deref().map(ArrayColumn::from_text);
        UserProfile::from(UserProfileRow {
            user_id: row.user_id.unwrap_or_default(),
            usual_locations: column(row.usual_locations),
            merchant_categories: column(row.merchant_categories),
            device_types: column(row.device_types),
            avg_transaction_amount: row.avg_transaction_amount,
            model_score: row.model_score,
            last_updated: row.last_updated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn export_row() -> ExportRow {
        ExportRow {
            id: Some("tx-9".to_string()),
            user_id: Some("42".to_string()),
            amount: Some(6000.0),
            timestamp: Some(1_760_000_000.0),
            location: None,
            description: Some("  ".to_string()),
            anomaly_score: None,
        }
    }

    #[test]
    fn export_row_fills_display_defaults() {
        let record = export_row().into_record().expect("record");
        assert_eq!(record.location, "Unknown");
        assert_eq!(record.description, "No description available");
        assert_eq!(record.anomaly_score, 1.0);
        assert_eq!(record.timestamp.timestamp(), 1_760_000_000);
    }

    #[test]
    fn export_row_without_timestamp_is_skipped() {
        let row = ExportRow {
            timestamp: None,
            ..export_row()
        };
        assert!(row.into_record().is_none());
    }

    #[test]
    fn missing_stats_row_means_zero_and_null() {
        let totals = totals_from(None, Some(CountRow { total: 12 }));
        assert_eq!(totals.total_transactions, 0);
        assert!(totals.last_updated.is_none());
        assert_eq!(totals.total_anomalies, 12);
    }

    #[test]
    fn profile_text_columns_normalize_both_shapes() {
        let profile = UserProfile::from(UserProfileRecord {
            user_id: Some("7".to_string()),
            usual_locations: Some(r#"["London", "Paris"]"#.to_string()),
            merchant_categories: Some("{grocery,fuel}".to_string()),
            device_types: None,
            avg_transaction_amount: None,
            model_score: Some(0.8),
            last_updated: None,
        });
        assert_eq!(profile.usual_locations, vec!["London", "Paris"]);
        assert_eq!(profile.merchant_categories, vec!["grocery", "fuel"]);
        assert!(profile.device_types.is_empty());
        assert_eq!(profile.avg_transaction_amount, 0.0);
    }
}
