use chrono::Utc;
use tracing::debug;

use backend_domain::{LiveTransaction, SyntheticGenerator};

use crate::sse::{encode_event, TRANSACTION_EVENT};

/// A fresh random transaction per call; each poll of the stream endpoint
/// gets exactly one.
pub fn next_transaction() -> LiveTransaction {
    let txn = SyntheticGenerator::from_entropy().live_transaction(Utc::now());
    debug!(id = %txn.id, anomaly = txn.is_anomaly, "live transaction generated");
    txn
}

pub fn next_transaction_event() -> anyhow::Result<String> {
    encode_event(TRANSACTION_EVENT, &next_transaction())
}
