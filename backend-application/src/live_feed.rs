// Fixed-interval pull of live transactions
// There is no subscription: every tick issues one request and appends
// whatever came back.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tokio::time::{interval, MissedTickBehavior};
use tracing::warn;

use backend_domain::LiveTransaction;

#[async_trait]
pub trait TransactionSource: Send + Sync {
    async fn next_transaction(&self) -> anyhow::Result<LiveTransaction>;
}

/// Rolling window of the newest transactions, newest first.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveFeed {
    transactions: VecDeque<LiveTransaction>,
    max_items: usize,
    connected: bool,
    last_error: Option<String>,
}

impl LiveFeed {
    pub fn new(max_items: usize) -> Self {
        Self {
            transactions: VecDeque::with_capacity(max_items),
            max_items: max_items.max(1),
            connected: false,
            last_error: None,
        }
    }

    pub fn push(&mut self, txn: LiveTransaction) {
        self.transactions.push_front(txn);
        self.transactions.truncate(self.max_items);
        self.connected = true;
        self.last_error = None;
    }

    /// Keeps what was already received.
    pub fn mark_error(&mut self, message: String) {
        self.connected = false;
        self.last_error = Some(message);
    }

    pub fn transactions(&self) -> impl Iterator<Item = &LiveTransaction> {
        self.transactions.iter()
    }

    pub fn latest(&self) -> Option<&LiveTransaction> {
        self.transactions.front()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

/// Polls `source` once immediately and then once per `period`, calling
/// `on_update` after every poll. Stops after `max_polls` polls, or never
/// when `None`; callers race it against a shutdown signal.
pub async fn poll_feed<S, F>(
    source: &S,
    feed: &mut LiveFeed,
    period: Duration,
    max_polls: Option<usize>,
    mut on_update: F,
) where
    S: TransactionSource + ?Sized,
    F: FnMut(&LiveFeed),
{
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut polls = 0usize;
    while max_polls.map_or(true, |max| polls < max) {
        ticker.tick().await;
        polls += 1;
        match source.next_transaction().await {
            Ok(txn) => feed.push(txn),
            Err(err) => {
                warn!(error = %err, "live transaction poll failed");
                feed.mark_error(err.to_string());
            }
        }
        on_update(feed);
    }
}
