use std::sync::Arc;

use backend_application::AppState;
use backend_infrastructure::{AppConfig, PgDataSource};

/// Everything the server owns for its lifetime. The pool is kept outside
/// `AppState` so shutdown can drain it after the router is gone.
pub struct AppContext {
    pub state: AppState,
    pub pool: PgDataSource,
}

impl AppContext {
    /// Does not touch the network: the pool connects on first use, so the
    /// service starts (and serves synthetic data) with the store down.
    pub fn new(config: &AppConfig) -> Self {
        let pool = PgDataSource::connect_lazy(&config.to_db_config());
        let state = AppState::new(config.to_runtime_config(), Arc::new(pool.clone()));
        Self { state, pool }
    }
}
