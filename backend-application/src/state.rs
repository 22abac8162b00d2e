use std::sync::Arc;

use backend_domain::ports::DashboardRepository;
use backend_domain::RuntimeConfig;

use crate::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub repo: Arc<dyn DashboardRepository>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(config: RuntimeConfig, repo: Arc<dyn DashboardRepository>) -> Self {
        Self {
            config,
            repo,
            metrics: Arc::new(Metrics::default()),
        }
    }
}
