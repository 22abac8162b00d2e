use std::time::Duration;

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use backend_application::live_feed::{poll_feed, LiveFeed};
use backend_application::AppState;
use backend_domain::RuntimeConfig;
use backend_infrastructure::HttpTransactionSource;
use backend_interfaces_http::build_router;

use crate::context::AppContext;

pub fn build_app(state: AppState) -> Router {
    build_router(state.clone())
        .layer(CorsLayer::permissive())
        .layer(RequestBodyLimitLayer::new(
            usize::try_from(state.config.max_body_bytes).unwrap_or(usize::MAX),
        ))
        .layer(TimeoutLayer::new(Duration::from_secs(
            state.config.request_timeout_seconds,
        )))
        .layer(TraceLayer::new_for_http())
}

pub async fn run_server(context: AppContext) -> Result<()> {
    let AppContext { state, pool } = context;

    let app = build_app(state.clone());
    let addr: std::net::SocketAddr = state.config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "listening");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    info!("draining connection pool");
    pool.close().await;
    served?;
    Ok(())
}

/// Base URL for `tail` when none is given: the configured bind address,
/// with an unspecified host replaced by loopback.
pub fn default_tail_url(bind_addr: &str) -> String {
    match bind_addr.parse::<std::net::SocketAddr>() {
        Ok(addr) if addr.ip().is_unspecified() => format!("http://127.0.0.1:{}", addr.port()),
        _ => format!("http://{}", bind_addr),
    }
}

/// Polls a running server's stream endpoint until `max_polls` is reached or
/// the process is interrupted, and returns what was collected.
pub async fn run_tail(
    config: &RuntimeConfig,
    base_url: &str,
    max_polls: Option<usize>,
) -> Result<LiveFeed> {
    let source = HttpTransactionSource::new(
        base_url,
        Duration::from_secs(config.request_timeout_seconds),
    )?;
    info!(
        url = source.url(),
        interval_ms = config.stream_poll_interval_ms,
        "tailing live transactions"
    );

    let mut feed = LiveFeed::new(config.stream_max_items);
    tokio::select! {
        _ = poll_feed(&source, &mut feed, config.stream_poll_interval(), max_polls, log_update) => {}
        _ = shutdown_signal() => info!("tail interrupted"),
    }
    Ok(feed)
}

fn log_update(feed: &LiveFeed) {
    if !feed.is_connected() {
        warn!(
            error = feed.last_error().unwrap_or("unknown"),
            buffered = feed.len(),
            "stream disconnected"
        );
        return;
    }
    let Some(txn) = feed.latest() else {
        return;
    };
    if txn.is_anomaly {
        warn!(
            id = %txn.id,
            user_id = %txn.user_id,
            amount = txn.amount,
            location = %txn.location,
            score = txn.anomaly_score,
            "anomalous transaction"
        );
    } else {
        info!(
            id = %txn.id,
            user_id = %txn.user_id,
            amount = txn.amount,
            location = %txn.location,
            buffered = feed.len(),
            "transaction"
        );
    }
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "ctrl-c handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "sigterm handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
