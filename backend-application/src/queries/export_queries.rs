use chrono::Utc;
use tracing::{error, info, warn};

use backend_domain::{
    export_predicate, filter_records, DataSourceKind, ExportParams, UserIdMatch, EXPORT_ROW_LIMIT,
};

use crate::datasource::{synthetic_anomalies, DataSource};
use crate::export_codec::{ExportResponse, EXPORT_FALLBACK_ERROR};
use crate::AppState;

/// Rows returned when the export query itself fails.
pub const EXPORT_FALLBACK_ROWS: usize = 50;

/// Export never fails outright: an unreachable store or a failed query both
/// degrade to synthetic records.
pub async fn export_anomalies(state: &AppState, params: &ExportParams) -> ExportResponse {
    let criteria = params.to_criteria();
    let now = Utc::now();

    let repo = match DataSource::resolve(state).await {
        DataSource::Available(repo) => repo,
        DataSource::Unavailable(_) => {
            let records = synthetic_anomalies(&state.config, now);
            let mut filtered = filter_records(&records, &criteria, UserIdMatch::Substring);
            filtered.truncate(EXPORT_ROW_LIMIT as usize);
            info!(rows = filtered.len(), source = "mock", "export served");
            return ExportResponse::new(filtered, DataSourceKind::Mock);
        }
    };

    let predicate = export_predicate(&criteria);
    match repo.fetch_export(&predicate).await {
        Ok(records) => {
            info!(rows = records.len(), source = "database", "export served");
            ExportResponse::new(records, DataSourceKind::Database)
        }
        Err(err) => {
            error!(error = %err, "export query failed");
            state.metrics.record_query_error();
            state.metrics.record_fallback();
            warn!("falling back to synthetic export rows");
            let mut records = synthetic_anomalies(&state.config, now);
            records.truncate(EXPORT_FALLBACK_ROWS);
            let mut response = ExportResponse::new(records, DataSourceKind::Mock);
            response.error = Some(EXPORT_FALLBACK_ERROR.to_string());
            response.details = Some(err.root_cause().to_string());
            response
        }
    }
}
