//! # Origin Fetch
//!
//! The origin is the remote storage service that holds photo bytes. It has
//! no caching responsibility; the cache calls it only on a full miss.
//!
//! [`HttpOrigin`] retries a request that never produced a response
//! (refused connection, timeout) on a doubling [`Backoff`] schedule. Any
//! response, success or not, ends the attempt loop.

use std::future::Future;
use std::time::Duration;

use url::Url;

use crate::error::OriginError;

/// Source of media bytes behind the cache.
pub trait Origin: Send + Sync {
    /// Fetch the raw bytes at `locator`.
    fn fetch(&self, locator: &Url) -> impl Future<Output = Result<Vec<u8>, OriginError>> + Send;
}

/// Retry schedule for requests that fail before a response arrives.
///
/// Waits `first_delay`, then twice that, and so on, for at most `retries`
/// extra attempts. The default is 3 retries starting at 200ms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    pub retries: u32,
    pub first_delay: Duration,
}

impl Backoff {
    /// No retries: the first failure is returned.
    pub const NONE: Backoff = Backoff {
        retries: 0,
        first_delay: Duration::ZERO,
    };

    /// Wait before retry number `n` (zero-based).
    pub fn delay(&self, n: u32) -> Duration {
        self.first_delay.saturating_mul(2u32.saturating_pow(n))
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            retries: 3,
            first_delay: Duration::from_millis(200),
        }
    }
}

/// Origin backed by plain HTTP GET requests.
#[derive(Debug, Clone)]
pub struct HttpOrigin {
    http: reqwest::Client,
    backoff: Backoff,
}

impl HttpOrigin {
    /// Build an origin whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, OriginError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(OriginError::Client)?;
        Ok(Self::with_client(http))
    }

    /// Wrap an existing client.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self {
            http,
            backoff: Backoff::default(),
        }
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    async fn get(&self, locator: &Url) -> Result<reqwest::Response, reqwest::Error> {
        let mut retry = 0;
        loop {
            match self.http.get(locator.clone()).send().await {
                Ok(resp) => return Ok(resp),
                Err(e) if retry < self.backoff.retries => {
                    let delay = self.backoff.delay(retry);
                    retry += 1;
                    tracing::warn!(
                        %locator,
                        retry,
                        retries = self.backoff.retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "origin unreachable, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl Origin for HttpOrigin {
    async fn fetch(&self, locator: &Url) -> Result<Vec<u8>, OriginError> {
        let transport = |source| OriginError::Transport {
            locator: locator.to_string(),
            source,
        };
        let resp = self.get(locator).await.map_err(transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(OriginError::Status {
                locator: locator.to_string(),
                status: status.as_u16(),
            });
        }

        let body = resp.bytes().await.map_err(transport)?;
        Ok(body.to_vec())
    }
}
