//! Drives remote calls through the retry policy.

use std::future::Future;

use tracing::warn;

use crate::error::Result;
use crate::retry::{RetryDecision, RetryPolicy};

/// Executes a remote-call thunk under a [`RetryPolicy`].
///
/// `Ok(Some(value))` is a successful call, `Ok(None)` means the call is
/// permanently unservable (the caller keeps whatever it already has), and
/// `Err` aborts the run with the triggering error.
#[derive(Debug, Clone, Default)]
pub struct RequestExecutor {
    policy: RetryPolicy,
}

impl RequestExecutor {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Runs `op` until it succeeds or the policy calls the request off.
    ///
    /// Backoff and cooldown sleeps happen here, on the current task; there
    /// is never more than one attempt in flight.
    pub async fn execute<T, F, Fut>(&self, mut op: F) -> Result<Option<T>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut state = self.policy.new_state();
        loop {
            match op().await {
                Ok(value) => return Ok(Some(value)),
                Err(err) => match self.policy.decide(&mut state, &err) {
                    RetryDecision::GiveUp => {
                        warn!("Giving up on unservable call: {}", err);
                        return Ok(None);
                    }
                    RetryDecision::Wait(delay) => {
                        warn!("Retrying in {:.1}s: {}", delay.as_secs_f64(), err);
                        tokio::time::sleep(delay).await;
                    }
                    RetryDecision::Abort => {
                        warn!("Too many retries, quitting: {}", err);
                        return Err(err);
                    }
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::retry::RetryPolicy;
    use std::cell::Cell;
    use std::time::Duration;

    fn server_error() -> ApiError {
        ApiError::ServerError {
            status: 502,
            url: "http://api.test/followers/ids.json".to_string(),
        }
    }

    /// Three transient server errors, then success. The observed sleeps are
    /// the geometric sequence 2, 3, 4.5 seconds.
    #[tokio::test(start_paused = true)]
    async fn test_backoff_sleeps_form_geometric_sequence() {
        let executor = RequestExecutor::default();
        let attempts = Cell::new(0u32);
        let start = tokio::time::Instant::now();

        let result = executor
            .execute(|| {
                let attempt = attempts.get();
                attempts.set(attempt + 1);
                async move {
                    if attempt < 3 {
                        Err(server_error())
                    } else {
                        Ok(attempt)
                    }
                }
            })
            .await
            .unwrap();

        assert_eq!(result, Some(3));
        assert_eq!(attempts.get(), 4);
        // 2.0 + 3.0 + 4.5 seconds of backoff in total.
        assert_eq!(start.elapsed(), Duration::from_millis(9500));
    }

    /// A 429 sleeps for exactly the configured cooldown once, then the
    /// follow-up attempt runs.
    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_sleeps_cooldown_then_retries_once() {
        let executor = RequestExecutor::default();
        let attempts = Cell::new(0u32);
        let start = tokio::time::Instant::now();

        let result = executor
            .execute(|| {
                let attempt = attempts.get();
                attempts.set(attempt + 1);
                async move {
                    if attempt == 0 {
                        Err(ApiError::RateLimited { url: "u".into() })
                    } else {
                        Ok("ok")
                    }
                }
            })
            .await
            .unwrap();

        assert_eq!(result, Some("ok"));
        assert_eq!(attempts.get(), 2);
        assert_eq!(start.elapsed(), Duration::from_secs(15 * 60 + 5));
    }

    #[tokio::test]
    async fn test_rate_limit_fatal_when_cooldown_disabled() {
        let policy = RetryPolicy {
            sleep_on_rate_limit: false,
            ..RetryPolicy::default()
        };
        let executor = RequestExecutor::new(policy);

        let result: Result<Option<()>> = executor
            .execute(|| async { Err(ApiError::RateLimited { url: "u".into() }) })
            .await;

        assert!(matches!(result, Err(ApiError::RateLimited { .. })));
    }

    /// Eleven consecutive network errors exceed the default maximum of ten
    /// and propagate fatally.
    #[tokio::test(start_paused = true)]
    async fn test_network_errors_propagate_after_max_consecutive() {
        let executor = RequestExecutor::default();
        let attempts = Cell::new(0u32);

        let result: Result<Option<()>> = executor
            .execute(|| {
                attempts.set(attempts.get() + 1);
                async { Err(ApiError::Network("bad status line".to_string())) }
            })
            .await;

        assert!(matches!(result, Err(ApiError::Network(_))));
        assert_eq!(attempts.get(), 11);
    }

    #[tokio::test]
    async fn test_permanent_error_returns_nothing_without_retry() {
        let executor = RequestExecutor::default();
        let attempts = Cell::new(0u32);

        let result: Option<()> = executor
            .execute(|| {
                attempts.set(attempts.get() + 1);
                async { Err(ApiError::NotFound { url: "u".into() }) }
            })
            .await
            .unwrap();

        assert_eq!(result, None);
        assert_eq!(attempts.get(), 1);
    }

    #[tokio::test]
    async fn test_unclassified_error_is_fatal_without_retry() {
        let executor = RequestExecutor::default();
        let attempts = Cell::new(0u32);

        let result: Result<Option<()>> = executor
            .execute(|| {
                attempts.set(attempts.get() + 1);
                async {
                    Err(ApiError::UnexpectedStatus {
                        status: 400,
                        url: "u".into(),
                    })
                }
            })
            .await;

        assert!(matches!(result, Err(ApiError::UnexpectedStatus { .. })));
        assert_eq!(attempts.get(), 1);
    }

    #[tokio::test]
    async fn test_success_on_first_attempt_returns_immediately() {
        let executor = RequestExecutor::default();

        let result = executor.execute(|| async { Ok(42) }).await.unwrap();
        assert_eq!(result, Some(42));
    }
}
