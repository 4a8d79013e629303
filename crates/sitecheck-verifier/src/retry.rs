//! Retry utilities for the external matcher call.
//!
//! Provides exponential backoff retry logic for transient HTTP errors such as
//! 429 Rate Limited responses from the matcher endpoint. Non-retriable errors
//! (parse failures, unexpected statuses) are propagated immediately without
//! retrying.

use std::future::Future;
use std::time::Duration;

use crate::error::VerifierError;

/// Returns `true` if `err` represents a transient condition that should be
/// retried after a backoff delay.
///
/// Retriable errors:
/// - [`VerifierError::RateLimited`] — HTTP 429; the endpoint has asked us to back off.
/// - [`VerifierError::Http`] — network-level failure (connection reset, timeout, etc.).
///
/// Non-retriable errors (propagated immediately):
/// - [`VerifierError::UnexpectedStatus`] — non-retriable HTTP status (e.g., 401, 500).
/// - [`VerifierError::Deserialize`] — response body does not parse; retrying won't fix it.
/// - [`VerifierError::EmptyResponse`] — the responder returned no content.
fn is_retriable(err: &VerifierError) -> bool {
    matches!(
        err,
        VerifierError::RateLimited { .. } | VerifierError::Http(_)
    )
}

/// Executes `operation` with exponential backoff retries on transient errors.
///
/// On a retriable error the function sleeps for `backoff_base_secs * 2^attempt`
/// seconds and tries again, up to `max_retries` additional attempts after the
/// first try. If all retries are exhausted the last error is returned.
/// Non-retriable errors are returned immediately without sleeping or retrying.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, VerifierError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, VerifierError>>,
{
    let mut last_err;
    let mut attempt = 0u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                last_err = err;
            }
        }

        // Exponential backoff: base * 2^attempt seconds.
        // Cap the shift to prevent overflow on extreme configs.
        let delay_secs = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %last_err,
            "transient matcher error — retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}
