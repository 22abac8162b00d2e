// Filter criteria
// Dashboard filters arrive as loose query strings; anything that does not
// parse is treated as "no filter" for that dimension.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;

use crate::value_objects::{ExportFormat, TimeRange};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    /// Single calendar day (UTC).
    pub date: Option<NaiveDate>,
    /// Minimum anomaly score in [0, 1].
    pub score_threshold: Option<f64>,
    pub user_id: Option<String>,
    /// Inclusive lower bound of the export window.
    pub start: Option<DateTime<Utc>>,
    /// Inclusive upper bound of the export window.
    pub end: Option<DateTime<Utc>>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.score_threshold.is_none()
            && self.user_id.is_none()
            && self.start.is_none()
            && self.end.is_none()
    }

    /// Threshold only counts when strictly positive.
    pub fn effective_score_threshold(&self) -> Option<f64> {
        self.score_threshold.filter(|value| *value > 0.0)
    }
}

/// Query parameters of the trend and histogram endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsParams {
    pub date: Option<String>,
    pub score_threshold: Option<String>,
    pub user_id: Option<String>,
}

impl AnalyticsParams {
    pub fn to_criteria(&self) -> FilterCriteria {
        FilterCriteria {
            date: self.date.as_deref().and_then(parse_day),
            score_threshold: self.score_threshold.as_deref().and_then(parse_score),
            user_id: self.user_id.as_deref().and_then(parse_user_id),
            start: None,
            end: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub user_id: Option<String>,
    pub min_score: Option<String>,
    pub format: Option<String>,
}

impl ExportParams {
    pub fn to_criteria(&self) -> FilterCriteria {
        FilterCriteria {
            date: None,
            score_threshold: self.min_score.as_deref().and_then(parse_score),
            user_id: self.user_id.as_deref().and_then(parse_user_id),
            start: self
                .start_date
                .as_deref()
                .and_then(|raw| parse_bound(raw, BoundKind::Start)),
            end: self
                .end_date
                .as_deref()
                .and_then(|raw| parse_bound(raw, BoundKind::End)),
        }
    }

    pub fn export_format(&self) -> ExportFormat {
        self.format
            .as_deref()
            .map(ExportFormat::from)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyParams {
    pub time_range: Option<String>,
}

impl HourlyParams {
    pub fn time_range(&self) -> TimeRange {
        self.time_range
            .as_deref()
            .map(TimeRange::from)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileParams {
    pub user_id: Option<String>,
}

impl ProfileParams {
    pub fn user_id(&self) -> Option<String> {
        self.user_id.as_deref().and_then(parse_user_id)
    }
}

#[derive(Debug, Clone, Copy)]
enum BoundKind {
    Start,
    End,
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 instant (reduced to its UTC day).
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(day) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(day);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|instant| instant.with_timezone(&Utc).date_naive())
}

pub fn parse_score(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(value.clamp(0.0, 1.0))
}

pub fn parse_user_id(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// A bare end date covers the whole day, so it is widened to the next midnight.
fn parse_bound(raw: &str, kind: BoundKind) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(instant.with_timezone(&Utc));
    }
    let day = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()?;
    let midnight = day.and_time(NaiveTime::MIN).and_utc();
    match kind {
        BoundKind::Start => Some(midnight),
        BoundKind::End => Some(midnight + Duration::days(1)),
    }
}
