// Domain entities
pub mod anomaly;
pub mod config;
pub mod filter;
pub mod metrics;
pub mod stream;
pub mod user_profile;

pub use anomaly::*;
pub use config::*;
pub use filter::*;
pub use metrics::*;
pub use stream::*;
pub use user_profile::*;
