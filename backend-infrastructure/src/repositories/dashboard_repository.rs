use async_trait::async_trait;
use tracing::warn;

use backend_domain::{
    AnomalyRecord, BucketRow, DailyRow, DashboardRepository, HourRow, Predicate, SqlParam,
    TimeRange, TotalsRow, UserProfile, EXPORT_ROW_LIMIT, PROFILE_LIST_LIMIT, TREND_WINDOW_DAYS,
};

use crate::repositories::postgres::PgDataSource;
use crate::repositories::rows::{
    totals_from, BucketCountRow, CountRow, DailyTrendRow, ExportRow, HourCountRow,
    ProcessingStatsRow, UserProfileRecord,
};

const TOTAL_TRANSACTIONS_COUNTER: &str = "total_transactions_processed";
const HAS_TIMESTAMP: &str = "timestamp IS NOT NULL";

pub fn export_sql(predicate: &Predicate) -> String {
    format!(
        "SELECT transaction_id::text AS id, user_id::text AS user_id, \
         amount::float8 AS amount, timestamp::float8 AS timestamp, location, \
         notes AS description, LEAST(amount / 5000, 1.0)::float8 AS anomaly_score \
         FROM frauds {} ORDER BY timestamp DESC LIMIT {}",
        predicate.where_clause(),
        EXPORT_ROW_LIMIT
    )
}

/// Calendar days `today - 9 ..= today` in the session time zone (UTC).
fn trend_window() -> String {
    format!(
        "DATE(to_timestamp(timestamp)) > CURRENT_DATE - {}",
        TREND_WINDOW_DAYS
    )
}

pub fn daily_trend_sql(predicate: &Predicate) -> String {
    let window = trend_window();
    format!(
        "SELECT DATE(to_timestamp(timestamp)) AS day, COUNT(*) AS count, \
         LEAST(AVG(amount) / 5000, 1.0)::float8 AS avg_score \
         FROM frauds {} GROUP BY day ORDER BY day ASC",
        predicate.where_clause_with(&[HAS_TIMESTAMP, window.as_str()])
    )
}

pub fn histogram_sql(predicate: &Predicate) -> String {
    format!(
        "SELECT width_bucket(amount, 0, 5000, 10) AS bucket, COUNT(*) AS count \
         FROM frauds {} GROUP BY bucket ORDER BY bucket ASC",
        predicate.where_clause()
    )
}

/// Look-back is bound as seconds (`$1`).
pub fn hourly_predicate(range: TimeRange) -> Predicate {
    let mut predicate = Predicate::new();
    predicate.push(
        |n| format!("timestamp >= EXTRACT(EPOCH FROM NOW())::float8 - ${}", n),
        SqlParam::Float(range.lookback().num_seconds() as f64),
    );
    predicate
}

pub fn hourly_sql(predicate: &Predicate) -> String {
    format!(
        "SELECT EXTRACT(HOUR FROM to_timestamp(timestamp))::float8 AS hour, COUNT(*) AS count \
         FROM frauds {} GROUP BY hour ORDER BY hour ASC",
        predicate.where_clause_with(&[HAS_TIMESTAMP])
    )
}

pub fn profile_predicate(user_id: Option<&str>) -> Predicate {
    let mut predicate = Predicate::new();
    if let Some(user_id) = user_id {
        predicate.push(
            |n| format!("user_id::text = ${}", n),
            SqlParam::Text(user_id.to_string()),
        );
    }
    predicate
}

/// Exact user lookup, or the most recently updated profiles that have a
/// location history.
pub fn profile_sql(predicate: &Predicate) -> String {
    let select = "SELECT user_id::text AS user_id, usual_locations::text AS usual_locations, \
         merchant_categories::text AS merchant_categories, device_types::text AS device_types, \
         avg_transaction_amount::float8 AS avg_transaction_amount, \
         model_score::float8 AS model_score, last_updated::timestamptz AS last_updated \
         FROM user_profiles";
    if predicate.is_empty() {
        format!(
            "{} WHERE usual_locations IS NOT NULL ORDER BY last_updated DESC LIMIT {}",
            select, PROFILE_LIST_LIMIT
        )
    } else {
        format!("{} {}", select, predicate.where_clause())
    }
}

const STATS_SQL: &str = "SELECT count_value::int8 AS count_value, \
     last_updated_timestamp::timestamptz AS last_updated_timestamp \
     FROM processing_stats WHERE counter_name = $1";
const ANOMALY_COUNT_SQL: &str = "SELECT COUNT(*) AS total FROM frauds";

#[async_trait]
impl DashboardRepository for PgDataSource {
    async fn ping(&self) -> anyhow::Result<()> {
        PgDataSource::ping(self).await
    }

    async fn fetch_export(&self, predicate: &Predicate) -> anyhow::Result<Vec<AnomalyRecord>> {
        let rows: Vec<ExportRow> = self.query(&export_sql(predicate), predicate.params()).await?;
        let total = rows.len();
        let records: Vec<AnomalyRecord> =
            rows.into_iter().filter_map(ExportRow::into_record).collect();
        if records.len() < total {
            warn!(
                skipped = total - records.len(),
                "export rows without a readable timestamp were skipped"
            );
        }
        Ok(records)
    }

    async fn fetch_daily_trend(&self, predicate: &Predicate) -> anyhow::Result<Vec<DailyRow>> {
        let rows: Vec<DailyTrendRow> = self
            .query(&daily_trend_sql(predicate), predicate.params())
            .await?;
        Ok(rows
            .into_iter()
            .filter_map(DailyTrendRow::into_domain)
            .collect())
    }

    async fn fetch_histogram(&self, predicate: &Predicate) -> anyhow::Result<Vec<BucketRow>> {
        let rows: Vec<BucketCountRow> = self
            .query(&histogram_sql(predicate), predicate.params())
            .await?;
        Ok(rows.into_iter().map(BucketRow::from).collect())
    }

    async fn fetch_hourly(&self, range: TimeRange) -> anyhow::Result<Vec<HourRow>> {
        let predicate = hourly_predicate(range);
        let rows: Vec<HourCountRow> = self
            .query(&hourly_sql(&predicate), predicate.params())
            .await?;
        Ok(rows.into_iter().map(HourRow::from).collect())
    }

    async fn fetch_totals(&self) -> anyhow::Result<TotalsRow> {
        let stats: Vec<ProcessingStatsRow> = self
            .query(
                STATS_SQL,
                &[SqlParam::Text(TOTAL_TRANSACTIONS_COUNTER.to_string())],
            )
            .await?;
        let anomalies: Vec<CountRow> = self.query(ANOMALY_COUNT_SQL, &[]).await?;
        Ok(totals_from(
            stats.into_iter().next(),
            anomalies.into_iter().next(),
        ))
    }

    async fn fetch_user_profiles(
        &self,
        user_id: Option<&str>,
    ) -> anyhow::Result<Vec<UserProfile>> {
        let predicate = profile_predicate(user_id);
        let rows: Vec<UserProfileRecord> = self
            .query(&profile_sql(&predicate), predicate.params())
            .await?;
        Ok(rows.into_iter().map(UserProfile::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend_domain::{analytics_predicate, export_predicate, FilterCriteria};

    #[test]
    fn unfiltered_export_has_no_where_clause() {
        let sql = export_sql(&export_predicate(&FilterCriteria::default()));
        assert!(!sql.contains("WHERE"));
        assert!(sql.ends_with("ORDER BY timestamp DESC LIMIT 1000"));
    }

    #[test]
    fn trend_keeps_fixed_window_ahead_of_filters() {
        let criteria = FilterCriteria {
            user_id: Some("7".to_string()),
            ..FilterCriteria::default()
        };
        let sql = daily_trend_sql(&analytics_predicate(&criteria));
        assert!(sql.contains(
            "WHERE timestamp IS NOT NULL AND DATE(to_timestamp(timestamp)) > CURRENT_DATE - 10 AND user_id::text = $1"
        ));
    }

    #[test]
    fn trend_window_is_bounded_by_date_not_row_count() {
        let sql = daily_trend_sql(&Predicate::new());
        assert!(sql.ends_with("GROUP BY day ORDER BY day ASC"));
        assert!(!sql.contains("LIMIT"));
        assert!(!sql.contains("INTERVAL"));
    }

    #[test]
    fn hourly_lookback_is_a_bound_parameter() {
        let predicate = hourly_predicate(TimeRange::Week);
        let sql = hourly_sql(&predicate);
        assert!(sql.contains("EXTRACT(EPOCH FROM NOW())::float8 - $1"));
        assert!(!sql.contains("604800"));
        assert_eq!(predicate.params(), &[SqlParam::Float(604_800.0)]);
    }

    #[test]
    fn profile_sql_switches_on_user_filter() {
        let list = profile_sql(&profile_predicate(None));
        assert!(list.contains("usual_locations IS NOT NULL ORDER BY last_updated DESC LIMIT 50"));
        let single_predicate = profile_predicate(Some("7"));
        let single = profile_sql(&single_predicate);
        assert!(single.ends_with("WHERE user_id::text = $1"));
        assert_eq!(single_predicate.params().len(), 1);
    }

    #[test]
    fn histogram_groups_by_width_bucket() {
        let sql = histogram_sql(&Predicate::new());
        assert!(sql.contains("width_bucket(amount, 0, 5000, 10)"));
        assert!(!sql.contains("WHERE"));
    }
}
