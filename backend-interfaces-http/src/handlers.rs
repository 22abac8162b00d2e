pub mod anomaly_handlers;
pub mod metrics_handlers;
pub mod ops_handlers;
pub mod profile_handlers;
pub mod stream_handlers;

pub use anomaly_handlers::*;
pub use metrics_handlers::*;
pub use ops_handlers::*;
pub use profile_handlers::*;
pub use stream_handlers::*;
