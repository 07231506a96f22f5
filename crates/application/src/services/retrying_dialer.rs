use ferrous_outbound_domain::{DialOptions, Destination, DomainError, RetryConfig};
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use crate::ports::{BoxedConnection, Dialer, DispatchLog};

/// Bounded exponential backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub base_delay: Duration,
    pub multiplier: u32,
}

impl RetryPolicy {
    pub const fn exponential(attempts: u32, base_delay: Duration) -> Self {
        Self {
            attempts,
            base_delay,
            multiplier: 2,
        }
    }

    /// Delay slept after the `failed_attempt`-th failure (1-based).
    pub fn delay_for(&self, failed_attempt: u32) -> Duration {
        let factor = self
            .multiplier
            .saturating_pow(failed_attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::exponential(5, Duration::from_millis(100))
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            attempts: config.attempts.max(1),
            base_delay: Duration::from_millis(config.base_delay_ms),
            multiplier: config.multiplier.max(1),
        }
    }
}

/// Wraps a single-attempt [`Dialer`] with [`RetryPolicy`]. Every error is
/// retried the same way; the last one is returned once attempts run out.
pub struct RetryingDialer {
    dialer: Arc<dyn Dialer>,
    policy: RetryPolicy,
    log: Arc<dyn DispatchLog>,
}

impl RetryingDialer {
    pub fn new(dialer: Arc<dyn Dialer>, policy: RetryPolicy, log: Arc<dyn DispatchLog>) -> Self {
        Self {
            dialer,
            policy,
            log,
        }
    }

    pub async fn dial(
        &self,
        source: Option<IpAddr>,
        destination: &Destination,
        options: &DialOptions,
    ) -> Result<BoxedConnection, DomainError> {
        let attempts = self.policy.attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.dialer.dial(source, destination, options).await {
                Ok(connection) => return Ok(connection),
                Err(e) if attempt >= attempts => return Err(e),
                Err(e) => {
                    let delay = self.policy.delay_for(attempt);
                    self.log.debug(&format!(
                        "Dial attempt {}/{} to {} failed: {}. Retrying in {:?}",
                        attempt, attempts, destination, e, delay
                    ));
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
