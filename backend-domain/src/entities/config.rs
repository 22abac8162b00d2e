// Runtime configuration as seen by the application and interface layers

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub bind_addr: String,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
    /// Budget for the per-request store ping before falling back.
    pub ping_timeout_ms: u64,
    pub mock_record_count: usize,
    pub mock_window_days: i64,
    pub mock_seed: Option<u64>,
    pub stream_poll_interval_ms: u64,
    pub stream_max_items: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 15,
            ping_timeout_ms: 1000,
            mock_record_count: 100,
            mock_window_days: 30,
            mock_seed: None,
            stream_poll_interval_ms: 3000,
            stream_max_items: 50,
        }
    }
}

impl RuntimeConfig {
    pub fn ping_timeout(&self) -> Duration {
        Duration::from_millis(self.ping_timeout_ms.max(1))
    }

    pub fn stream_poll_interval(&self) -> Duration {
        Duration::from_millis(self.stream_poll_interval_ms.max(1))
    }
}

/// Connection settings only the composition root needs.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: Option<String>,
    pub pool_max: u32,
    pub connect_timeout_ms: u64,
    pub idle_timeout_ms: u64,
}
