use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;

use backend_application::live_feed::TransactionSource;
use backend_application::sse::decode_data;
use backend_domain::LiveTransaction;

pub const STREAM_PATH: &str = "/api/stream";

/// Fetches one transaction per call from a running dashboard's
/// `/api/stream` endpoint.
pub struct HttpTransactionSource {
    client: Client,
    url: String,
}

impl HttpTransactionSource {
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(request_timeout.max(Duration::from_secs(1)))
            .build()?;
        Ok(Self {
            client,
            url: stream_url(base_url),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl TransactionSource for HttpTransactionSource {
    async fn next_transaction(&self) -> Result<LiveTransaction> {
        let response = self
            .client
            .get(&self.url)
            .header(ACCEPT, "text/event-stream")
            .send()
            .await?;
        if !response.status().is_success() {
            bail!("stream endpoint responded {}", response.status());
        }
        let body = response.text().await?;
        decode_data(&body)
    }
}

fn stream_url(base_url: &str) -> String {
    let trimmed = base_url.trim().trim_end_matches('/');
    if trimmed.ends_with(STREAM_PATH) {
        trimmed.to_string()
    } else {
        format!("{}{}", trimmed, STREAM_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_stream_path() {
        assert_eq!(
            stream_url("http://127.0.0.1:3000/"),
            "http://127.0.0.1:3000/api/stream"
        );
        assert_eq!(
            stream_url("http://dash.local/api/stream"),
            "http://dash.local/api/stream"
        );
    }
}
