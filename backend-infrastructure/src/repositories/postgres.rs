use std::time::Duration;

use anyhow::Context;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgRow};
use sqlx::{FromRow, PgPool};
use tracing::debug;

use backend_domain::{DbConfig, SqlParam};

/// Pooled executor over the anomaly store. Owned by the composition root and
/// closed at shutdown.
#[derive(Clone)]
pub struct PgDataSource {
    pool: PgPool,
}

impl PgDataSource {
    /// Builds the pool without connecting, so the process starts even when
    /// the store is down. Sessions run in UTC so `DATE(..)` and `EXTRACT(..)`
    /// agree with the service's notion of "today".
    pub fn connect_lazy(config: &DbConfig) -> Self {
        let mut options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.database)
            .username(&config.user)
            .options([("timezone", "UTC")]);
        if let Some(password) = &config.password {
            options = options.password(password);
        }
        let pool = PgPoolOptions::new()
            .max_connections(config.pool_max)
            .acquire_timeout(Duration::from_millis(config.connect_timeout_ms))
            .idle_timeout(Some(Duration::from_millis(config.idle_timeout_ms)))
            .connect_lazy_with(options);
        Self { pool }
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs `sql` with positional `params` and maps every row to `T`. The
    /// pooled connection goes back to the pool when `conn` drops, on the
    /// error path too.
    pub async fn query<T>(&self, sql: &str, params: &[SqlParam]) -> anyhow::Result<Vec<T>>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let mut query = sqlx::query_as::<_, T>(sql);
        for param in params {
            query = match param {
                SqlParam::Text(value) => query.bind(value.clone()),
                SqlParam::Float(value) => query.bind(*value),
                SqlParam::Int(value) => query.bind(*value),
            };
        }
        debug!(params = params.len(), "executing query");
        let mut conn = self
            .pool
            .acquire()
            .await
            .context("acquire pooled connection")?;
        let rows = query
            .fetch_all(&mut *conn)
            .await
            .context("query execution failed")?;
        Ok(rows)
    }

    /// `SELECT NOW()` round trip.
    pub async fn ping(&self) -> anyhow::Result<()> {
        self.query::<(DateTime<Utc>,)>("SELECT NOW()", &[])
            .await
            .map(|_| ())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
