//! Bounded exponential retry for individual remote calls.
//!
//! Delays come from `backon::ExponentialBuilder`; only errors classified as
//! transient are retried. Exhausting the attempt budget surfaces
//! [`StackSetError::RetriesExhausted`] carrying the last error's handler code.

use crate::config::RetryPolicy;
use crate::error::{Result, StackSetError};
use backon::{BackoffBuilder, ExponentialBuilder};
use std::future::Future;
use tracing::{debug, warn};

/// Run `attempt` until it succeeds, fails permanently, or `policy` is exhausted
pub async fn retry_with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    mut attempt: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut builder = ExponentialBuilder::default()
        .with_min_delay(policy.initial_delay())
        .with_max_delay(policy.max_delay())
        .with_factor(policy.multiplier)
        .with_max_times(policy.max_attempts as usize);
    if policy.jitter {
        builder = builder.with_jitter();
    }
    let mut delays = builder.build();

    let mut attempts = 0u32;
    loop {
        attempts += 1;

        match attempt().await {
            Ok(value) => {
                if attempts > 1 {
                    debug!(operation = %operation, attempts, "Call succeeded after retry");
                }
                return Ok(value);
            }
            Err(e) if e.is_retryable() && attempts < policy.max_attempts => {
                let delay = delays.next().unwrap_or_else(|| policy.max_delay());
                warn!(
                    operation = %operation,
                    attempt = attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Transient failure, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) if e.is_retryable() => {
                return Err(StackSetError::RetriesExhausted {
                    operation: operation.to_string(),
                    attempts,
                    code: e.error_code(),
                    last_error: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        }
    }
}
