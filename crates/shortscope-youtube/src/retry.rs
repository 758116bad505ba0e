//! Retry with exponential back-off and jitter for the `YouTube` client.
//!
//! [`retry_with_backoff`] wraps a fallible async operation and retries on
//! transient errors (network failures, 5xx, 429). Non-transient errors —
//! including [`YouTubeError::QuotaExceeded`] and
//! [`YouTubeError::BudgetExceeded`] — are returned immediately so a spent
//! quota is never hammered with further attempts.

use std::future::Future;
use std::time::Duration;

use crate::error::YouTubeError;

/// Returns `true` for errors worth retrying after a back-off delay.
///
/// **Retriable:**
/// - Network-level failures: timeout, connection reset.
/// - HTTP 5xx and 429: transient server pressure.
///
/// **Not retriable (hard stop):**
/// - [`YouTubeError::BudgetExceeded`] — local per-run cap.
/// - [`YouTubeError::QuotaExceeded`] — the API's own daily quota.
/// - [`YouTubeError::Api`] — application-level error; retrying won't fix it.
/// - [`YouTubeError::Deserialize`] — malformed response; retrying won't fix it.
pub(crate) fn is_retriable(err: &YouTubeError) -> bool {
    match err {
        YouTubeError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        YouTubeError::UnexpectedStatus { status, .. } => *status >= 500 || *status == 429,
        YouTubeError::Api { .. }
        | YouTubeError::QuotaExceeded(_)
        | YouTubeError::BudgetExceeded { .. }
        | YouTubeError::InvalidBaseUrl(_)
        | YouTubeError::Deserialize { .. } => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on
/// transient errors.
///
/// The sleep before the n-th retry is `backoff_base_ms × 2^(n-1)` with
/// ±25 % jitter, capped at 60 s. Non-retriable errors are returned
/// immediately.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, YouTubeError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, YouTubeError>>,
{
    const MAX_DELAY_MS: u64 = 60_000;
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
                let capped = computed.min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "transient YouTube API error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;

    #[test]
    fn quota_exceeded_is_not_retriable() {
        assert!(!is_retriable(&YouTubeError::QuotaExceeded(
            "daily limit".to_owned()
        )));
    }

    #[test]
    fn budget_exceeded_is_not_retriable() {
        assert!(!is_retriable(&YouTubeError::BudgetExceeded {
            used: 100,
            limit: 100
        }));
    }

    #[test]
    fn api_error_is_not_retriable() {
        assert!(!is_retriable(&YouTubeError::Api {
            code: 400,
            message: "bad request".to_owned()
        }));
    }

    #[test]
    fn server_error_status_is_retriable() {
        assert!(is_retriable(&YouTubeError::UnexpectedStatus {
            status: 503,
            url: "https://example.com".to_owned()
        }));
        assert!(is_retriable(&YouTubeError::UnexpectedStatus {
            status: 429,
            url: "https://example.com".to_owned()
        }));
    }

    #[test]
    fn client_error_status_is_not_retriable() {
        assert!(!is_retriable(&YouTubeError::UnexpectedStatus {
            status: 404,
            url: "https://example.com".to_owned()
        }));
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, YouTubeError>(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn does_not_retry_quota_exceeded() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(YouTubeError::QuotaExceeded("daily limit".to_owned()))
            }
        })
        .await;
        assert_eq!(
            calls.load(Ordering::SeqCst),
            1,
            "QuotaExceeded must not be retried"
        );
        assert!(matches!(result, Err(YouTubeError::QuotaExceeded(_))));
    }

    #[tokio::test]
    async fn retries_transient_status_then_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                let attempt = c.fetch_add(1, Ordering::SeqCst) + 1;
                if attempt < 3 {
                    Err(YouTubeError::UnexpectedStatus {
                        status: 503,
                        url: "https://example.com".to_owned(),
                    })
                } else {
                    Ok(99)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 99);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhausted_retries_return_last_error() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(2, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(YouTubeError::UnexpectedStatus {
                    status: 500,
                    url: "https://example.com".to_owned(),
                })
            }
        })
        .await;
        // max_retries = 2 means 3 total attempts.
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(matches!(
            result,
            Err(YouTubeError::UnexpectedStatus { status: 500, .. })
        ));
    }
}
