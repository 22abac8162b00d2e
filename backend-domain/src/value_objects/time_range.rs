// Look-back window of the hourly activity chart

use chrono::Duration;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "6h")]
    SixHours,
    #[serde(rename = "12h")]
    TwelveHours,
    #[default]
    #[serde(rename = "24h")]
    Day,
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
}

impl TimeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::OneHour => "1h",
            TimeRange::SixHours => "6h",
            TimeRange::TwelveHours => "12h",
            TimeRange::Day => "24h",
            TimeRange::Week => "7d",
            TimeRange::Month => "30d",
        }
    }

    pub fn lookback(&self) -> Duration {
        match self {
            TimeRange::OneHour => Duration::hours(1),
            TimeRange::SixHours => Duration::hours(6),
            TimeRange::TwelveHours => Duration::hours(12),
            TimeRange::Day => Duration::hours(24),
            TimeRange::Week => Duration::days(7),
            TimeRange::Month => Duration::days(30),
        }
    }
}

/// Unknown values fall back to the 24h window.
impl From<&str> for TimeRange {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "1h" => TimeRange::OneHour,
            "6h" => TimeRange::SixHours,
            "12h" => TimeRange::TwelveHours,
            "7d" => TimeRange::Week,
            "30d" => TimeRange::Month,
            _ => TimeRange::Day,
        }
    }
}
