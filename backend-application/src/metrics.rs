use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Metrics {
    requests: AtomicU64,
    fallbacks: AtomicU64,
    query_errors: AtomicU64,
}

impl Metrics {
    pub fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fallback(&self) {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_query_error(&self) {
        self.query_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    pub fn fallbacks(&self) -> u64 {
        self.fallbacks.load(Ordering::Relaxed)
    }

    pub fn query_errors(&self) -> u64 {
        self.query_errors.load(Ordering::Relaxed)
    }

    pub fn render_prometheus(&self) -> String {
        format!(
            "# TYPE dashboard_requests_total counter\n\
dashboard_requests_total {}\n\
# TYPE dashboard_mock_fallbacks_total counter\n\
dashboard_mock_fallbacks_total {}\n\
# TYPE dashboard_query_errors_total counter\n\
dashboard_query_errors_total {}\n",
            self.requests(),
            self.fallbacks(),
            self.query_errors()
        )
    }
}
