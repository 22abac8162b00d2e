// Anomaly entity
// A flagged transaction as shown on the dashboard and in exports

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Amount that maps to a score of 1.0. The score is a linear proxy of the
/// amount, not a model output.
pub const SCORE_AMOUNT_SCALE: f64 = 5000.0;

pub const UNKNOWN_LOCATION: &str = "Unknown";
pub const MISSING_DESCRIPTION: &str = "No description available";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyRecord {
    pub id: String,
    pub user_id: String,
    pub amount: f64,
    pub timestamp: DateTime<Utc>,
    pub location: String,
    pub description: String,
    pub anomaly_score: f64,
}

impl AnomalyRecord {
    /// Builds a record from possibly-incomplete store columns. Missing text
    /// falls back to the display defaults and a missing score is derived from
    /// the amount.
    pub fn from_store(
        id: String,
        user_id: String,
        amount: f64,
        timestamp: DateTime<Utc>,
        location: Option<String>,
        description: Option<String>,
        stored_score: Option<f64>,
    ) -> Self {
        let location = location
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_LOCATION.to_string());
        let description = description
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| MISSING_DESCRIPTION.to_string());
        let anomaly_score = stored_score
            .map(clamp_score)
            .unwrap_or_else(|| score_from_amount(amount));
        Self {
            id,
            user_id,
            amount,
            timestamp,
            location,
            description,
            anomaly_score,
        }
    }
}

/// `min(amount / 5000, 1)`, clamped into [0, 1].
pub fn score_from_amount(amount: f64) -> f64 {
    clamp_score((amount / SCORE_AMOUNT_SCALE).min(1.0))
}

pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, 1.0)
}

/// Inverse of the proxy: the amount a score threshold stands for.
pub fn amount_threshold(score: f64) -> f64 {
    score * SCORE_AMOUNT_SCALE
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn score_is_linear_below_scale() {
        assert_eq!(score_from_amount(2500.0), 0.5);
        assert_eq!(score_from_amount(0.0), 0.0);
    }

    #[test]
    fn score_clamps_above_scale_and_below_zero() {
        assert_eq!(score_from_amount(6000.0), 1.0);
        assert_eq!(score_from_amount(-10.0), 0.0);
        assert_eq!(clamp_score(f64::NAN), 0.0);
    }

    #[test]
    fn score_stays_in_unit_interval_for_sampled_amounts() {
        let mut amount = -1000.0;
        while amount < 20_000.0 {
            let score = score_from_amount(amount);
            assert!((0.0..=1.0).contains(&score), "amount {amount} gave {score}");
            amount += 137.25;
        }
    }

    #[test]
    fn store_defaults_fill_missing_columns() {
        let ts = Utc.with_ymd_and_hms(2026, 10, 18, 9, 24, 0).unwrap();
        let record = AnomalyRecord::from_store(
            "t1".to_string(),
            "42".to_string(),
            1000.0,
            ts,
            None,
            Some("   ".to_string()),
            None,
        );
        assert_eq!(record.location, UNKNOWN_LOCATION);
        assert_eq!(record.description, MISSING_DESCRIPTION);
        assert_eq!(record.anomaly_score, 0.2);
    }

    #[test]
    fn stored_score_is_clamped() {
        let ts = Utc.with_ymd_and_hms(2026, 10, 18, 9, 24, 0).unwrap();
        let record = AnomalyRecord::from_store(
            "t1".to_string(),
            "42".to_string(),
            100.0,
            ts,
            Some("Berlin".to_string()),
            Some("x".to_string()),
            Some(1.7),
        );
        assert_eq!(record.anomaly_score, 1.0);
        assert_eq!(record.location, "Berlin");
    }
}
