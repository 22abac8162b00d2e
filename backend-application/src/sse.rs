// Minimal server-sent-event framing for single-message responses

use anyhow::{anyhow, Context};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub const TRANSACTION_EVENT: &str = "transaction";

/// `event: <name>\ndata: <json>\n\n`
pub fn encode_event<T: Serialize>(event: &str, payload: &T) -> anyhow::Result<String> {
    let data = serde_json::to_string(payload).context("encode event payload")?;
    Ok(format!("event: {}\ndata: {}\n\n", event, data))
}

/// Joins the `data:` lines of the first event in `body` and decodes them.
pub fn decode_data<T: DeserializeOwned>(body: &str) -> anyhow::Result<T> {
    let mut lines = Vec::new();
    for line in body.lines() {
        if line.is_empty() {
            if !lines.is_empty() {
                break;
            }
            continue;
        }
        if let Some(rest) = line.strip_prefix("data:") {
            lines.push(rest.strip_prefix(' ').unwrap_or(rest));
        }
    }
    if lines.is_empty() {
        return Err(anyhow!("no data field in event stream body"));
    }
    serde_json::from_str(&lines.join("\n")).context("decode event payload")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn multi_line_data_is_joined() {
        let body = "event: transaction\ndata: {\"a\":\ndata: 1}\n\ndata: {\"b\":2}\n\n";
        let value: Value = decode_data(body).expect("decode");
        assert_eq!(value, json!({"a": 1}));
    }

    #[test]
    fn body_without_data_is_an_error() {
        assert!(decode_data::<Value>(": keep-alive\n\n").is_err());
    }

    #[test]
    fn encoded_event_decodes() {
        let message = encode_event("transaction", &json!({"id": "txn-1"})).expect("encode");
        let value: Value = decode_data(&message).expect("decode");
        assert_eq!(value["id"], "txn-1");
    }
}
