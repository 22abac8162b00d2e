pub mod export_queries;
pub mod metrics_queries;
pub mod ops_queries;
pub mod profile_queries;
pub mod stream_queries;
