// Backend Application Layer

pub mod datasource;
pub mod error;
pub mod export_codec;
pub mod live_feed;
pub mod metrics;
pub mod queries;
pub mod sse;
pub mod state;

pub use error::AppError;
pub use metrics::Metrics;
pub use state::AppState;
