// User profile entity
// Behavioural summary maintained by the detector, read-only here

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{ArrayColumn, DataSourceKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: String,
    pub usual_locations: Vec<String>,
    pub merchant_categories: Vec<String>,
    pub device_types: Vec<String>,
    pub avg_transaction_amount: f64,
    pub model_score: f64,
    pub last_update: Option<DateTime<Utc>>,
}

/// Profile columns before array normalization.
#[derive(Debug, Clone, Default)]
pub struct UserProfileRow {
    pub user_id: String,
    pub usual_locations: Option<ArrayColumn>,
    pub merchant_categories: Option<ArrayColumn>,
    pub device_types: Option<ArrayColumn>,
    pub avg_transaction_amount: Option<f64>,
    pub model_score: Option<f64>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl From<UserProfileRow> for UserProfile {
    fn from(row: UserProfileRow) -> Self {
        Self {
            user_id: row.user_id,
            usual_locations: ArrayColumn::normalize(row.usual_locations),
            merchant_categories: ArrayColumn::normalize(row.merchant_categories),
            device_types: ArrayColumn::normalize(row.device_types),
            avg_transaction_amount: row.avg_transaction_amount.unwrap_or(0.0),
            model_score: row.model_score.unwrap_or(0.0),
            last_update: row.last_updated,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileList {
    pub profiles: Vec<UserProfile>,
    pub source: DataSourceKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_with_mixed_array_shapes_normalizes() {
        let row = UserProfileRow {
            user_id: "7".to_string(),
            usual_locations: Some(ArrayColumn::Literal("{London,Paris}".to_string())),
            merchant_categories: Some(ArrayColumn::List(vec!["grocery".to_string()])),
            device_types: None,
            avg_transaction_amount: None,
            model_score: Some(0.65),
            last_updated: None,
        };
        let profile = UserProfile::from(row);
        assert_eq!(profile.usual_locations, vec!["London", "Paris"]);
        assert_eq!(profile.merchant_categories, vec!["grocery"]);
        assert!(profile.device_types.is_empty());
        assert_eq!(profile.avg_transaction_amount, 0.0);
        assert_eq!(profile.model_score, 0.65);
    }
}
