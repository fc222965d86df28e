//! HTTP transport for the Hyperliquid API

use std::time::Duration;

use backoff::{future::retry, ExponentialBackoff};
use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::NetworkConfig;
use crate::error::{Error, Result};

/// HTTP status codes that indicate transient server errors
pub const RETRYABLE_STATUS_CODES: &[u16] = &[502, 503, 504];

#[derive(Deserialize, Debug)]
struct ErrorData {
    msg: String,
}

/// Which failures a POST may be re-sent after
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Read-only queries: timeouts are retried too
    Idempotent,
    /// Signed actions: a timed-out request may already have been applied,
    /// so only connect errors and 502/503/504 are retried
    SignedAction,
}

impl RetryPolicy {
    pub fn should_retry(&self, error: &Error) -> bool {
        match self {
            RetryPolicy::Idempotent => {
                error.is_retryable() || matches!(error, Error::HttpTimeout(_))
            }
            RetryPolicy::SignedAction => error.is_retryable(),
        }
    }
}

/// POST-only JSON client bound to one API base URL
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    max_retries: u32,
    retry_base_delay_ms: u64,
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>, config: &NetworkConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config.timeout_ms)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_retries: config.max_retries,
            retry_base_delay_ms: config.retry_base_delay_ms,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            initial_interval: Duration::from_millis(self.retry_base_delay_ms),
            max_interval: Duration::from_millis(self.retry_base_delay_ms.saturating_mul(8)),
            max_elapsed_time: None,
            ..Default::default()
        }
    }

    /// POST a JSON body, re-sending with backoff when `policy` allows it
    pub async fn post(
        &self,
        url_path: &'static str,
        data: String,
        policy: RetryPolicy,
    ) -> Result<String> {
        let full_url = format!("{}{}", self.base_url, url_path);
        let full_url = &full_url;
        let data = &data;

        let backoff = self.backoff();
        let max_retries = self.max_retries;
        let mut attempts = 0u32;

        retry(backoff, || {
            attempts += 1;
            let attempt = attempts;
            async move {
                match self.post_once(full_url, data.clone()).await {
                    Ok(text) => Ok(text),
                    Err(e) if policy.should_retry(&e) && attempt <= max_retries => {
                        warn!(
                            attempt = attempt,
                            max_attempts = max_retries + 1,
                            url = %url_path,
                            "Retryable HTTP error, backing off: {}",
                            e
                        );
                        Err(backoff::Error::transient(e))
                    }
                    Err(e) => Err(backoff::Error::permanent(e)),
                }
            }
        })
        .await
    }

    async fn post_once(&self, full_url: &str, data: String) -> Result<String> {
        debug!("POST {}", full_url);

        let response = self
            .client
            .post(full_url)
            .header("Content-Type", "application/json")
            .body(data)
            .send()
            .await?;

        parse_response(response).await
    }
}

/// Build the underlying reqwest client (TLS backend + timeout)
pub fn build_client(timeout_ms: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_millis(timeout_ms))
        .build()
        .map_err(|e| Error::Http(format!("Failed to build HTTP client: {}", e)))
}

async fn parse_response(response: Response) -> Result<String> {
    let status = response.status().as_u16();
    let text = response.text().await?;

    if status < 400 {
        return Ok(text);
    }

    if status < 500 {
        let message = serde_json::from_str::<ErrorData>(&text)
            .map(|data| data.msg)
            .unwrap_or(text);
        return Err(Error::ClientRequest { status, message });
    }

    Err(Error::ServerRequest {
        status,
        message: text,
    })
}
