//! Conflict retry and deadline enforcement (§4.3 retry discipline, §5
//! concurrency model: "every operation accepts a deadline").
//!
//! Retries after a `Conflict` do not reset the deadline — the timeout
//! wraps the whole retry loop, not each individual attempt.

use iq_core::{CoreError, CoreResult};
use std::future::Future;
use std::time::Duration;

/// Backoff between successive retries of a `Conflict`, in milliseconds.
pub const CONFLICT_BACKOFFS_MS: [u64; 3] = [10, 40, 160];

/// Re-run `op` while it fails with `Conflict`, sleeping
/// `CONFLICT_BACKOFFS_MS` between attempts. After the backoff schedule is
/// exhausted, a further conflict surfaces as `TransientStoreError` rather
/// than `Conflict`, so callers above the engine never see a retryable
/// error they didn't get a chance to retry.
pub async fn with_conflict_retry<F, Fut, T>(mut op: F) -> CoreResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = CoreResult<T>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(CoreError::Conflict) => {
                if attempt >= CONFLICT_BACKOFFS_MS.len() {
                    return Err(CoreError::TransientStoreError(
                        "conflict retries exhausted".to_string(),
                    ));
                }
                tokio::time::sleep(Duration::from_millis(CONFLICT_BACKOFFS_MS[attempt])).await;
                attempt += 1;
            }
            Err(other) => return Err(other),
        }
    }
}

/// Run `op` with conflict retry under an overall deadline. On expiry the
/// in-flight transaction is simply dropped (no partial writes are ever
/// visible — each attempt either commits whole or not at all) and the
/// operation reports `Timeout`.
pub async fn run_transactional<F, Fut, T>(deadline: Duration, op: F) -> CoreResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = CoreResult<T>>,
{
    match tokio::time::timeout(deadline, with_conflict_retry(op)).await {
        Ok(result) => result,
        Err(_) => Err(CoreError::Timeout),
    }
}
