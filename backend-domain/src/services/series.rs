use std::collections::HashMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone};

use crate::entities::{clamp_score, DailyRow, HourRow, HourlyBucket, TrendPoint};

pub const TREND_WINDOW_DAYS: usize = 10;
pub const HOURS_PER_DAY: usize = 24;

/// Calendar day of an instant as written in its own offset, so that
/// `2026-10-18T00:00:00-05:00` stays on the 18th instead of sliding to the
/// 17th or 19th through a UTC conversion.
pub fn calendar_day<Tz: TimeZone>(instant: &DateTime<Tz>) -> NaiveDate {
    instant.date_naive()
}

/// `M/D` without leading zeros.
pub fn day_label(day: NaiveDate) -> String {
    format!("{}/{}", day.month(), day.day())
}

/// `HH:00`, zero padded.
pub fn hour_label(hour: usize) -> String {
    format!("{:02}:00", hour)
}

/// The `days` consecutive calendar days ending on `today`, oldest first.
pub fn window_days(today: NaiveDate, days: usize) -> Vec<NaiveDate> {
    (0..days)
        .rev()
        .map(|offset| today - Duration::days(offset as i64))
        .collect()
}

/// Dense daily series over the window ending on `today`. Days without a row
/// get a zero count and a zero score; rows outside the window are ignored.
pub fn fill_daily_series(rows: &[DailyRow], today: NaiveDate, days: usize) -> Vec<TrendPoint> {
    let by_day: HashMap<NaiveDate, &DailyRow> = rows.iter().map(|row| (row.day, row)).collect();
    window_days(today, days)
        .into_iter()
        .map(|day| {
            let (count, avg_score) = by_day
                .get(&day)
                .map(|row| (row.count, clamp_score(row.avg_score.unwrap_or(0.0))))
                .unwrap_or((0, 0.0));
            TrendPoint {
                label: day_label(day),
                count,
                avg_score,
            }
        })
        .collect()
}

/// Dense 24-slot series `00:00`..`23:00`. Rows with a missing or out-of-range
/// hour are skipped and reported back so the caller can log them.
pub fn fill_hourly_series(rows: &[HourRow]) -> (Vec<HourlyBucket>, usize) {
    let mut buckets: Vec<HourlyBucket> = (0..HOURS_PER_DAY)
        .map(|hour| HourlyBucket {
            hour: hour_label(hour),
            anomalies: 0,
        })
        .collect();
    let mut skipped = 0;
    for row in rows {
        match row.hour.and_then(hour_index) {
            Some(index) => buckets[index].anomalies = row.count,
            None => skipped += 1,
        }
    }
    (buckets, skipped)
}

fn hour_index(hour: f64) -> Option<usize> {
    if !hour.is_finite() {
        return None;
    }
    let truncated = hour.trunc();
    if (0.0..HOURS_PER_DAY as f64).contains(&truncated) {
        Some(truncated as usize)
    } else {
        None
    }
}
