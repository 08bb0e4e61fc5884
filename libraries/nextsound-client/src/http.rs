//! Shared HTTP plumbing: client construction, status mapping, retries.

use crate::error::{ClientError, Result};
use crate::types::{ClientConfig, RetryPolicy};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// reqwest client plus the retry policy every request goes through
#[derive(Debug, Clone)]
pub struct HttpClient {
    http: Client,
    retry: RetryPolicy,
}

impl HttpClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.timeout().min(std::time::Duration::from_secs(10)))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            http,
            retry: config.retry,
        })
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Send the request built by `build`, retrying transient failures
    ///
    /// `build` runs once per attempt. Non-2xx responses are mapped to
    /// errors; the returned response is always successful.
    pub async fn send<F>(&self, build: F) -> Result<Response>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let attempts = self.retry.attempts.max(1);
        let mut attempt = 1;
        loop {
            let outcome = match build(&self.http).send().await {
                Ok(response) => check_status(response).await,
                Err(e) => Err(ClientError::Request(e)),
            };

            match outcome {
                Err(e) if e.is_transient() && attempt < attempts => {
                    let delay = self.retry.delay_after(attempt);
                    warn!(attempt, attempts, delay_ms = delay.as_millis() as u64, error = %e, "Request failed, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    /// GET-style request decoded as JSON
    pub async fn json<T, F>(&self, build: F) -> Result<T>
    where
        T: DeserializeOwned,
        F: Fn(&Client) -> RequestBuilder,
    {
        let response = self.send(build).await?;
        let url = response.url().clone();
        response.json().await.map_err(|e| {
            debug!(url = %url, error = %e, "Undecodable response body");
            ClientError::ParseError(format!("Failed to parse response from {}: {}", url.path(), e))
        })
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().path().to_string();
    let message = response.text().await.unwrap_or_default();
    debug!(status = status.as_u16(), url = %url, "Request rejected");

    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ClientError::AuthRequired,
        StatusCode::NOT_FOUND => ClientError::NotFound {
            entity: "resource".to_string(),
            id: url,
        },
        StatusCode::CONFLICT => ClientError::Conflict(message),
        StatusCode::TOO_MANY_REQUESTS => ClientError::RateLimited,
        _ => ClientError::ServerError {
            status: status.as_u16(),
            message,
        },
    })
}
