use chrono::Utc;
use tracing::{error, info, warn};

use backend_domain::{
    analytics_predicate, bucket_histogram, daily_rows, fill_daily_series, fill_hourly_series,
    filter_records, group_amounts, hour_rows, AnalyticsParams, DataSourceKind, Histogram,
    HourRow, HourlyActivity, HourlyParams, TotalsSnapshot, TrendSeries, UserIdMatch,
    TREND_WINDOW_DAYS,
};

use crate::datasource::{synthetic_anomalies, synthetic_generator, DataSource};
use crate::{AppError, AppState};

pub async fn anomaly_trends(
    state: &AppState,
    params: &AnalyticsParams,
) -> Result<TrendSeries, AppError> {
    let criteria = params.to_criteria();
    let now = Utc::now();
    let today = now.date_naive();

    let (rows, source) = match DataSource::resolve(state).await {
        DataSource::Available(repo) => {
            let rows = repo
                .fetch_daily_trend(&analytics_predicate(&criteria))
                .await
                .map_err(|err| {
                    query_failed(state, "trend", err, "Failed to fetch trend data from server.")
                })?;
            (rows, DataSourceKind::Database)
        }
        DataSource::Unavailable(_) => {
            let records = synthetic_anomalies(&state.config, now);
            let filtered = filter_records(&records, &criteria, UserIdMatch::Exact);
            (daily_rows(&filtered), DataSourceKind::Mock)
        }
    };

    let points = fill_daily_series(&rows, today, TREND_WINDOW_DAYS);
    info!(
        days = points.len(),
        anomalies = points.iter().map(|p| p.count).sum::<i64>(),
        source = source.as_str(),
        "trend series served"
    );
    Ok(TrendSeries {
        points,
        source,
        queried_at: now,
    })
}

pub async fn score_distribution(
    state: &AppState,
    params: &AnalyticsParams,
) -> Result<Histogram, AppError> {
    let criteria = params.to_criteria();
    let now = Utc::now();

    let (rows, source) = match DataSource::resolve(state).await {
        DataSource::Available(repo) => {
            let rows = repo
                .fetch_histogram(&analytics_predicate(&criteria))
                .await
                .map_err(|err| {
                    query_failed(state, "histogram", err, "Failed to fetch score distribution data.")
                })?;
            (rows, DataSourceKind::Database)
        }
        DataSource::Unavailable(_) => {
            let records = synthetic_anomalies(&state.config, now);
            let filtered = filter_records(&records, &criteria, UserIdMatch::Exact);
            (
                group_amounts(filtered.iter().map(|record| record.amount)),
                DataSourceKind::Mock,
            )
        }
    };

    let buckets = bucket_histogram(&rows);
    info!(
        rows = buckets.iter().map(|b| b.count).sum::<i64>(),
        source = source.as_str(),
        "score distribution served"
    );
    Ok(Histogram {
        buckets,
        source,
        queried_at: now,
    })
}

pub async fn hourly_activity(
    state: &AppState,
    params: &HourlyParams,
) -> Result<HourlyActivity, AppError> {
    let time_range = params.time_range();
    let now = Utc::now();

    let (rows, source): (Vec<HourRow>, _) = match DataSource::resolve(state).await {
        DataSource::Available(repo) => {
            let rows = repo.fetch_hourly(time_range).await.map_err(|err| {
                query_failed(state, "hourly", err, "Failed to fetch hourly activity data.")
            })?;
            (rows, DataSourceKind::Database)
        }
        DataSource::Unavailable(_) => {
            let records = synthetic_anomalies(&state.config, now);
            (
                hour_rows(&records, now - time_range.lookback()),
                DataSourceKind::Mock,
            )
        }
    };

    let (hourly_data, skipped) = fill_hourly_series(&rows);
    if skipped > 0 {
        warn!(skipped, "hourly rows without a valid hour were ignored");
    }
    info!(
        time_range = time_range.as_str(),
        source = source.as_str(),
        "hourly activity served"
    );
    Ok(HourlyActivity {
        hourly_data,
        time_range,
        source,
        queried_at: now,
    })
}

pub async fn total_transactions(state: &AppState) -> Result<TotalsSnapshot, AppError> {
    match DataSource::resolve(state).await {
        DataSource::Available(repo) => {
            let row = repo.fetch_totals().await.map_err(|err| {
                query_failed(state, "totals", err, "Failed to fetch total transactions.")
            })?;
            Ok(TotalsSnapshot::from_row(row, DataSourceKind::Database))
        }
        DataSource::Unavailable(_) => {
            let now = Utc::now();
            let anomalies = synthetic_anomalies(&state.config, now).len();
            let row = synthetic_generator(&state.config).totals(anomalies, now);
            Ok(TotalsSnapshot::from_row(row, DataSourceKind::Mock))
        }
    }
}

pub(crate) fn query_failed(
    state: &AppState,
    query: &'static str,
    err: anyhow::Error,
    message: &'static str,
) -> AppError {
    error!(query, error = %err, "query failed");
    state.metrics.record_query_error();
    AppError::Internal(err.context(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasource::test_support::*;
    use backend_domain::{BucketRow, DailyRow, HOURS_PER_DAY};

    #[tokio::test]
    async fn trend_from_store_is_dense_and_tagged() {
        let today = Utc::now().date_naive();
        let mut repo = FakeRepository::new(Mode::Healthy);
        repo.daily = vec![DailyRow {
            day: today,
            count: 3,
            avg_score: Some(0.4),
        }];
        let (state, _) = state_with(repo);
        let series = anomaly_trends(&state, &AnalyticsParams::default())
            .await
            .expect("trend");
        assert_eq!(series.source, DataSourceKind::Database);
        assert_eq!(series.points.len(), TREND_WINDOW_DAYS);
        assert_eq!(series.points[9].count, 3);
        assert_eq!(series.points[9].avg_score, 0.4);
    }

    #[tokio::test]
    async fn trend_query_error_surfaces_with_message_and_cause() {
        let (state, _) = state_with(FakeRepository::new(Mode::QueryFails));
        let err = anomaly_trends(&state, &AnalyticsParams::default())
            .await
            .expect_err("query should fail");
        assert_eq!(err.to_string(), "Failed to fetch trend data from server.");
        assert!(err.details().is_some_and(|d| d.contains("frauds")));
        assert_eq!(state.metrics.query_errors(), 1);
    }

    #[tokio::test]
    async fn offline_trend_aggregates_synthetic_records() {
        let (state, _) = state_with(FakeRepository::new(Mode::Offline));
        let series = anomaly_trends(&state, &AnalyticsParams::default())
            .await
            .expect("trend");
        assert_eq!(series.source, DataSourceKind::Mock);
        assert_eq!(series.points.len(), TREND_WINDOW_DAYS);
        assert!(series
            .points
            .iter()
            .all(|p| (0.0..=1.0).contains(&p.avg_score)));
        assert!(series.points.iter().map(|p| p.count).sum::<i64>() > 0);
    }

    #[tokio::test]
    async fn histogram_places_store_rows() {
        let mut repo = FakeRepository::new(Mode::Healthy);
        repo.buckets = vec![
            BucketRow { bucket: 6, count: 4 },
            BucketRow { bucket: 11, count: 9 },
        ];
        let (state, _) = state_with(repo);
        let histogram = score_distribution(&state, &AnalyticsParams::default())
            .await
            .expect("histogram");
        assert_eq!(histogram.buckets.len(), 10);
        assert_eq!(histogram.buckets[5].count, 4);
        assert_eq!(histogram.buckets.iter().map(|b| b.count).sum::<i64>(), 4);
    }

    #[tokio::test]
    async fn offline_histogram_counts_every_synthetic_record() {
        let (state, _) = state_with(FakeRepository::new(Mode::Offline));
        let histogram = score_distribution(&state, &AnalyticsParams::default())
            .await
            .expect("histogram");
        assert_eq!(histogram.source, DataSourceKind::Mock);
        let total: i64 = histogram.buckets.iter().map(|b| b.count).sum();
        assert_eq!(total, state.config.mock_record_count as i64);
    }

    #[tokio::test]
    async fn hourly_defaults_to_a_day_and_is_dense() {
        let mut repo = FakeRepository::new(Mode::Healthy);
        repo.hours = vec![HourRow {
            hour: Some(13.0),
            count: 2,
        }];
        let (state, _) = state_with(repo);
        let activity = hourly_activity(&state, &HourlyParams::default())
            .await
            .expect("hourly");
        assert_eq!(activity.time_range.as_str(), "24h");
        assert_eq!(activity.hourly_data.len(), HOURS_PER_DAY);
        assert_eq!(activity.hourly_data[13].anomalies, 2);
    }

    #[tokio::test]
    async fn hourly_error_is_not_masked() {
        let (state, _) = state_with(FakeRepository::new(Mode::QueryFails));
        let params = HourlyParams {
            time_range: Some("7d".to_string()),
        };
        assert!(hourly_activity(&state, &params).await.is_err());
    }

    #[tokio::test]
    async fn totals_come_from_store_or_generator() {
        let mut repo = FakeRepository::new(Mode::Healthy);
        repo.totals.total_transactions = 1200;
        repo.totals.total_anomalies = 14;
        let (state, _) = state_with(repo);
        let totals = total_transactions(&state).await.expect("totals");
        assert_eq!(totals.total_transactions, 1200);
        assert_eq!(totals.source, DataSourceKind::Database);

        let (offline, _) = state_with(FakeRepository::new(Mode::Offline));
        let totals = total_transactions(&offline).await.expect("totals");
        assert_eq!(totals.source, DataSourceKind::Mock);
        assert_eq!(totals.total_anomalies, offline.config.mock_record_count as i64);
        assert!(totals.total_transactions >= totals.total_anomalies);
    }
}
