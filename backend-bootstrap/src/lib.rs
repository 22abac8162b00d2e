pub mod context;
pub mod lifecycle;
pub mod logging;

pub use context::AppContext;
pub use lifecycle::{build_app, default_tail_url, run_server, run_tail, shutdown_signal};
pub use logging::init_tracing;
