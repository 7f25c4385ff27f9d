//! HttpStatusSource - reqwest によるステータスエンドポイントの実装
//!
//! キャッシュ対策として毎回 `_=<nonce>` をクエリに付けます。

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CACHE_CONTROL;
use tracing::trace;
use ulid::Ulid;

use crate::domain::{PollError, ServerStatus, StatusReport};
use crate::ports::StatusSource;

pub struct HttpStatusSource {
    client: reqwest::Client,
    url: String,
}

impl HttpStatusSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, PollError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PollError::Transport(e.to_string()))?;
        Ok(Self::with_client(client, url))
    }

    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl StatusSource for HttpStatusSource {
    async fn fetch(&self) -> Result<ServerStatus, PollError> {
        let nonce = Ulid::new().to_string();
        trace!(url = %self.url, %nonce, "fetching status");

        let response = self
            .client
            .get(&self.url)
            .query(&[("_", nonce.as_str())])
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map_err(|e| PollError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PollError::Http {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| PollError::Transport(e.to_string()))?;
        let report: StatusReport = serde_json::from_slice(&body)?;
        Ok(report.into())
    }
}
