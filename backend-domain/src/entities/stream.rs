// Live transaction, one per poll of the stream endpoint

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveTransaction {
    pub id: String,
    pub user_id: String,
    pub amount: f64,
    pub timestamp: DateTime<Utc>,
    pub location: String,
    pub is_anomaly: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anomaly_score: Option<f64>,
}
