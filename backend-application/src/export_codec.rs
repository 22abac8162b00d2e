// Export encodings for anomaly records, and the matching readers

use anyhow::Context;
use serde::{Deserialize, Serialize};

use backend_domain::{AnomalyRecord, DataSourceKind};

pub const EXPORT_FALLBACK_ERROR: &str = "Database error, using mock data instead";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportResponse {
    pub data: Vec<AnomalyRecord>,
    pub source: DataSourceKind,
    pub count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ExportResponse {
    pub fn new(data: Vec<AnomalyRecord>, source: DataSourceKind) -> Self {
        Self {
            count: data.len(),
            data,
            source,
            error: None,
            details: None,
        }
    }
}

/// Header `id,userId,amount,timestamp,location,description,anomalyScore`,
/// one row per record.
pub fn encode_csv(records: &[AnomalyRecord]) -> anyhow::Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if records.is_empty() {
        writer.write_record([
            "id",
            "userId",
            "amount",
            "timestamp",
            "location",
            "description",
            "anomalyScore",
        ])?;
    }
    for record in records {
        writer.serialize(record)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| anyhow::anyhow!("flush csv export: {}", err.error()))?;
    String::from_utf8(bytes).context("csv export is not utf-8")
}

pub fn decode_csv(text: &str) -> anyhow::Result<Vec<AnomalyRecord>> {
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    reader
        .deserialize::<AnomalyRecord>()
        .map(|row| row.context("malformed csv export row"))
        .collect()
}

pub fn encode_json(response: &ExportResponse) -> anyhow::Result<String> {
    serde_json::to_string(response).context("encode json export")
}

pub fn decode_json(text: &str) -> anyhow::Result<ExportResponse> {
    serde_json::from_str(text).context("malformed json export")
}
