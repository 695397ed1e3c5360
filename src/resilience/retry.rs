use anyhow::Result;
use tokio::time::{sleep, Duration};
use tracing::{error, warn};

use crate::cache::token::Token;
use crate::supplier::SupplyToken;

/// Exponential-backoff retry policy.
///
/// The cache itself never retries; wrap the supplier in `RetryingSupplier`
/// when transient identity-provider failures should be absorbed before they
/// reach the attached callers.
#[derive(Debug, Clone)]
pub struct RetrySettings {
    pub attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            attempts: 3,
            base_delay_ms: 200,
            max_delay_ms: 1000,
        }
    }
}

impl RetrySettings {
    pub async fn run_with_retry<F, Fut, T>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let mut delay = self.base_delay_ms;

        for attempt in 1..=self.attempts {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.attempts => {
                    warn!("attempt {attempt}/{} failed: {e:#}", self.attempts);
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(self.max_delay_ms);
                }
                Err(e) => {
                    error!("all {attempt} attempts failed: {e:#}");
                    return Err(e);
                }
            }
        }
        unreachable!("retry loop exhausted unexpectedly")
    }
}

/// Supplier decorator that retries the inner supplier per `RetrySettings`.
pub struct RetryingSupplier<S> {
    inner: S,
    retry: RetrySettings,
}

impl<S: SupplyToken> RetryingSupplier<S> {
    pub fn new(inner: S, retry: RetrySettings) -> Self {
        Self { inner, retry }
    }
}

impl<S: SupplyToken> SupplyToken for RetryingSupplier<S> {
    async fn supply_token(&self) -> Result<Token> {
        self.retry
            .run_with_retry(|| self.inner.supply_token())
            .await
    }
}
