//! Retry with exponential backoff for record-source HTTP calls.
//!
//! Only connection-level failures are retried. Timeouts are returned
//! immediately since the resolver deadline already bounds the whole lookup,
//! and HTTP error statuses are the caller's to interpret.

use std::time::Duration;

/// Maximum number of retry attempts after the initial request.
const MAX_RETRIES: u32 = 2;

/// Base delay between retries (doubles each attempt: 100ms, 200ms).
const BASE_DELAY_MS: u64 = 100;

/// Send an HTTP request, retrying transient connection failures.
pub(crate) async fn retry_send<F, Fut>(f: F) -> Result<reqwest::Response, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
{
    for attempt in 0..MAX_RETRIES {
        match f().await {
            Ok(resp) => return Ok(resp),
            Err(e) if e.is_timeout() => return Err(e),
            Err(e) => {
                let delay = Duration::from_millis(BASE_DELAY_MS * 2u64.pow(attempt));
                tracing::warn!(
                    attempt = attempt + 1,
                    max_retries = MAX_RETRIES,
                    "record source request failed, retrying in {delay:?}: {e}"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
    f().await
}
