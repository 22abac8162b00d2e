use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use backend_domain::{DbConfig, RuntimeConfig};

pub const CONFIG_PATH_ENV: &str = "DASHBOARD_CONFIG";
const ENV_PREFIX: &str = "DASHBOARD_";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub db_host: String,
    pub db_port: u16,
    pub db_name: String,
    pub db_user: String,
    pub db_password: Option<String>,
    pub db_pool_max: u32,
    pub db_connect_timeout_ms: u64,
    pub db_idle_timeout_ms: u64,
    pub db_ping_timeout_ms: u64,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
    pub mock_record_count: usize,
    pub mock_window_days: i64,
    pub mock_seed: Option<u64>,
    pub stream_poll_interval_ms: u64,
    pub stream_max_items: usize,
    pub log_dir: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            db_host: "localhost".to_string(),
            db_port: 5432,
            db_name: "anomalies".to_string(),
            db_user: "user".to_string(),
            db_password: Some("pass".to_string()),
            db_pool_max: 20,
            db_connect_timeout_ms: 10_000,
            db_idle_timeout_ms: 30_000,
            db_ping_timeout_ms: 1000,
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 15,
            mock_record_count: 100,
            mock_window_days: 30,
            mock_seed: None,
            stream_poll_interval_ms: 3000,
            stream_max_items: 50,
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Reads the file named by `DASHBOARD_CONFIG` (default `./config.toml`),
    /// then applies `DASHBOARD_*` overrides. A missing file means defaults.
    pub async fn load() -> Result<Self> {
        let path = env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "./config.toml".to_string());
        let file_path = Path::new(&path);
        let mut config = if file_path.exists() {
            let content = fs::read_to_string(file_path).await?;
            Self::from_toml(&content)?
        } else {
            warn!(path = %path, "config file not found, using defaults");
            AppConfig::default()
        };
        config.apply_env_overrides(|key| env::var(key).ok());
        config.resolve_paths(file_path.parent());
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|err| anyhow!("invalid config file: {}", err))
    }

    pub fn normalize(&mut self) {
        if let Some(password) = &self.db_password {
            if password.trim().is_empty() {
                self.db_password = None;
            }
        }
        if let Some(log_dir) = &self.log_dir {
            if log_dir.trim().is_empty() {
                self.log_dir = None;
            }
        }
        self.db_host = self.db_host.trim().to_string();
        self.db_name = self.db_name.trim().to_string();
        self.db_user = self.db_user.trim().to_string();
    }

    fn resolve_paths(&mut self, base_dir: Option<&Path>) {
        let (Some(base), Some(log_dir)) = (base_dir, self.log_dir.as_deref()) else {
            return;
        };
        self.log_dir = Some(resolve_path(base, log_dir));
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|err| anyhow!("invalid bind_addr: {}", err))?;
        if self.db_host.is_empty() {
            return Err(anyhow!("db_host must not be empty"));
        }
        if self.db_pool_max == 0 {
            return Err(anyhow!("db_pool_max must be greater than 0"));
        }
        if self.db_ping_timeout_ms == 0 {
            return Err(anyhow!("db_ping_timeout_ms must be greater than 0"));
        }
        if self.max_body_bytes == 0 {
            return Err(anyhow!("max_body_bytes must be greater than 0"));
        }
        if self.stream_poll_interval_ms == 0 {
            return Err(anyhow!("stream_poll_interval_ms must be greater than 0"));
        }
        if self.mock_window_days <= 0 {
            return Err(anyhow!("mock_window_days must be greater than 0"));
        }
        Ok(())
    }

    pub fn log_dir(&self) -> Option<PathBuf> {
        self.log_dir.as_deref().map(PathBuf::from)
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            max_body_bytes: self.max_body_bytes,
            request_timeout_seconds: self.request_timeout_seconds,
            ping_timeout_ms: self.db_ping_timeout_ms,
            mock_record_count: self.mock_record_count,
            mock_window_days: self.mock_window_days,
            mock_seed: self.mock_seed,
            stream_poll_interval_ms: self.stream_poll_interval_ms,
            stream_max_items: self.stream_max_items,
        }
    }

    pub fn to_db_config(&self) -> DbConfig {
        DbConfig {
            host: self.db_host.clone(),
            port: self.db_port,
            database: self.db_name.clone(),
            user: self.db_user.clone(),
            password: self.db_password.clone(),
            pool_max: self.db_pool_max,
            connect_timeout_ms: self.db_connect_timeout_ms,
            idle_timeout_ms: self.db_idle_timeout_ms,
        }
    }

    /// `lookup` maps a full variable name such as `DASHBOARD_DB_HOST` to its
    /// value. Unparseable numbers keep the current value.
    fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));

        if let Some(value) = var("BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Some(value) = var("DB_HOST") {
            self.db_host = value;
        }
        if let Some(value) = var("DB_PORT") {
            self.db_port = value.parse().unwrap_or(self.db_port);
        }
        if let Some(value) = var("DB_NAME") {
            self.db_name = value;
        }
        if let Some(value) = var("DB_USER") {
            self.db_user = value;
        }
        if let Some(value) = var("DB_PASSWORD") {
            self.db_password = Some(value);
        }
        if let Some(value) = var("DB_POOL_MAX") {
            self.db_pool_max = value.parse().unwrap_or(self.db_pool_max);
        }
        if let Some(value) = var("DB_CONNECT_TIMEOUT_MS") {
            self.db_connect_timeout_ms = value.parse().unwrap_or(self.db_connect_timeout_ms);
        }
        if let Some(value) = var("DB_IDLE_TIMEOUT_MS") {
            self.db_idle_timeout_ms = value.parse().unwrap_or(self.db_idle_timeout_ms);
        }
        if let Some(value) = var("DB_PING_TIMEOUT_MS") {
            self.db_ping_timeout_ms = value.parse().unwrap_or(self.db_ping_timeout_ms);
        }
        if let Some(value) = var("MAX_BODY_BYTES") {
            self.max_body_bytes = value.parse().unwrap_or(self.max_body_bytes);
        }
        if let Some(value) = var("REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
        if let Some(value) = var("MOCK_RECORD_COUNT") {
            self.mock_record_count = value.parse().unwrap_or(self.mock_record_count);
        }
        if let Some(value) = var("MOCK_WINDOW_DAYS") {
            self.mock_window_days = value.parse().unwrap_or(self.mock_window_days);
        }
        if let Some(value) = var("MOCK_SEED") {
            self.mock_seed = value.parse().ok();
        }
        if let Some(value) = var("STREAM_POLL_INTERVAL_MS") {
            self.stream_poll_interval_ms = value.parse().unwrap_or(self.stream_poll_interval_ms);
        }
        if let Some(value) = var("STREAM_MAX_ITEMS") {
            self.stream_max_items = value.parse().unwrap_or(self.stream_max_items);
        }
        if let Some(value) = var("LOG_DIR") {
            self.log_dir = Some(value);
        }
    }
}

fn resolve_path(base: &Path, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return trimmed.to_string();
    }
    let path = Path::new(trimmed);
    if path.is_absolute() || base.as_os_str().is_empty() {
        trimmed.to_string()
    } else {
        base.join(path).to_string_lossy().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        config.validate().expect("defaults validate");
        let db = config.to_db_config();
        assert_eq!(db.port, 5432);
        assert_eq!(db.database, "anomalies");
        assert_eq!(db.pool_max, 20);
        assert_eq!(config.to_runtime_config().stream_poll_interval_ms, 3000);
        assert_eq!(config.to_runtime_config().ping_timeout_ms, 1000);
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let config = AppConfig::from_toml(
            r#"
            bind_addr = "0.0.0.0:8080"
            db_host = "db.internal"
            mock_seed = 7
            "#,
        )
        .expect("parse");
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.db_host, "db.internal");
        assert_eq!(config.mock_seed, Some(7));
        assert_eq!(config.db_user, "user");
        assert_eq!(config.stream_max_items, 50);
    }

    #[test]
    fn env_overrides_win_and_bad_numbers_are_ignored() {
        let vars: HashMap<&str, &str> = [
            ("DASHBOARD_DB_PORT", "6543"),
            ("DASHBOARD_DB_POOL_MAX", "many"),
            ("DASHBOARD_MOCK_SEED", "99"),
            ("DASHBOARD_DB_PASSWORD", "  "),
            ("DASHBOARD_DB_PING_TIMEOUT_MS", "250"),
        ]
        .into_iter()
        .collect();
        let mut config = AppConfig::default();
        config.apply_env_overrides(|key| vars.get(key).map(|v| v.to_string()));
        config.normalize();
        assert_eq!(config.db_port, 6543);
        assert_eq!(config.db_pool_max, 20);
        assert_eq!(config.mock_seed, Some(99));
        assert_eq!(config.db_password, None);
        assert_eq!(config.db_ping_timeout_ms, 250);
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut config = AppConfig {
            bind_addr: "not an address".to_string(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
        config.bind_addr = "127.0.0.1:3000".to_string();
        config.db_pool_max = 0;
        assert!(config.validate().is_err());
        config.db_pool_max = 5;
        config.stream_poll_interval_ms = 0;
        assert!(config.validate().is_err());
        config.stream_poll_interval_ms = 3000;
        config.db_ping_timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn relative_log_dir_follows_config_file() {
        let mut config = AppConfig {
            log_dir: Some("logs".to_string()),
            ..AppConfig::default()
        };
        config.resolve_paths(Some(Path::new("/etc/dashboard")));
        assert_eq!(config.log_dir(), Some(PathBuf::from("/etc/dashboard/logs")));
    }
}
