use std::io;

use tokio::time::sleep;
use tokio::time::timeout;
use tracing::debug;
use tracing::warn;

use crate::BackoffPolicy;
use crate::Error;
use crate::Result;

/// Runs `task` until it succeeds, at most `policy.max_retries` times.
///
/// Every attempt is bounded by `policy.timeout()`; between attempts the
/// delay doubles from `base_delay_ms` up to `max_delay_ms`. On exhaustion
/// the last attempt's error is returned, a timeout surfacing as
/// `io::ErrorKind::TimedOut`.
pub(crate) async fn task_with_timeout_and_exponential_backoff<F, T, P>(
    task: F,
    policy: BackoffPolicy,
) -> Result<P>
where
    F: Fn() -> T,
    T: std::future::Future<Output = Result<P>>,
{
    let mut last_error = Error::Fatal("task was never attempted".to_string());

    for attempt in 0..policy.max_retries {
        match timeout(policy.timeout(), task()).await {
            Ok(Ok(r)) => return Ok(r),
            Ok(Err(e)) => {
                debug!(attempt, "attempt failed: {}", e);
                last_error = e;
            }
            Err(_) => {
                debug!(attempt, "attempt timed out after {:?}", policy.timeout());
                last_error = io::Error::new(io::ErrorKind::TimedOut, "attempt timed out").into();
            }
        }

        if attempt + 1 < policy.max_retries {
            sleep(policy.delay_for(attempt)).await;
        }
    }

    warn!("task failed after {} attempts", policy.max_retries);
    Err(last_error)
}
