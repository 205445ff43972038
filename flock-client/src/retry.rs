//! Retry policy for remote calls.
//!
//! The policy is a pure decision function: given the per-request
//! [`RetryState`] and the error an attempt produced, it returns what the
//! executor should do next. All sleeping happens in the executor, which
//! keeps the decision logic testable without a clock.

use std::time::Duration;

use crate::error::ApiError;

/// How a failed attempt is treated by the retry loop, checked in this
/// priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// 401/404. Terminal for this one call; the caller gets no data.
    Permanent,
    /// 429. Fixed cooldown, then one more try without escalating backoff.
    RateLimited,
    /// 500/502/503/504. Multiplicative backoff, unbounded attempt count.
    TransientServer,
    /// Transport-level failure. Multiplicative backoff, bounded consecutive
    /// count.
    Network,
    /// Anything else. Never retried.
    Fatal,
}

pub fn classify(error: &ApiError) -> ErrorClass {
    match error {
        ApiError::Unauthorized { .. } | ApiError::NotFound { .. } => ErrorClass::Permanent,
        ApiError::RateLimited { .. } => ErrorClass::RateLimited,
        ApiError::ServerError { .. } => ErrorClass::TransientServer,
        ApiError::Network(_) => ErrorClass::Network,
        _ => ErrorClass::Fatal,
    }
}

/// Retry configuration, supplied by the caller per run.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// First backoff sleep in seconds.
    pub base_wait_secs: f64,
    /// Growth factor applied to the wait after each backoff sleep.
    pub backoff_multiplier: f64,
    /// Once the wait exceeds this, retries are abandoned and the error
    /// propagates. Bounds total wall-clock time for the backoff classes.
    pub ceiling_secs: f64,
    /// Consecutive network errors tolerated before giving up for good.
    pub max_network_errors: u32,
    /// Sleep taken after a 429 before the single follow-up attempt.
    pub rate_limit_cooldown: Duration,
    /// When false, a 429 is fatal instead of triggering the cooldown.
    pub sleep_on_rate_limit: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_wait_secs: 2.0,
            backoff_multiplier: 1.5,
            ceiling_secs: 3600.0,
            max_network_errors: 10,
            rate_limit_cooldown: Duration::from_secs(15 * 60 + 5),
            sleep_on_rate_limit: true,
        }
    }
}

/// Transient per-request state. Created fresh for every logical request and
/// discarded after success or a fatal outcome; never shared across requests.
#[derive(Debug)]
pub struct RetryState {
    /// Next backoff sleep in seconds. Non-decreasing within a request,
    /// except that a rate-limit cooldown resets it to the base.
    pub wait_period: f64,
    /// Consecutive network-error counter. Any HTTP-classified error resets
    /// it; success discards the whole state.
    pub error_count: u32,
}

/// What the executor should do after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RetryDecision {
    /// Sleep for this long, then try the same call again.
    Wait(Duration),
    /// The call is permanently unservable; return no data and move on.
    GiveUp,
    /// Propagate the error; the run is over.
    Abort,
}

impl RetryPolicy {
    pub fn new_state(&self) -> RetryState {
        RetryState {
            wait_period: self.base_wait_secs,
            error_count: 0,
        }
    }

    /// Classifies `error` and decides the next move, updating `state`.
    pub fn decide(&self, state: &mut RetryState, error: &ApiError) -> RetryDecision {
        match classify(error) {
            ErrorClass::Permanent => RetryDecision::GiveUp,
            ErrorClass::RateLimited => {
                state.error_count = 0;
                if self.sleep_on_rate_limit {
                    // The cooldown stands in for backoff; the next transient
                    // error starts over from the base wait.
                    state.wait_period = self.base_wait_secs;
                    RetryDecision::Wait(self.rate_limit_cooldown)
                } else {
                    RetryDecision::Abort
                }
            }
            ErrorClass::TransientServer => {
                state.error_count = 0;
                self.backoff(state)
            }
            ErrorClass::Network => {
                if state.wait_period > self.ceiling_secs {
                    return RetryDecision::Abort;
                }
                state.error_count += 1;
                if state.error_count > self.max_network_errors {
                    return RetryDecision::Abort;
                }
                self.backoff(state)
            }
            ErrorClass::Fatal => RetryDecision::Abort,
        }
    }

    fn backoff(&self, state: &mut RetryState) -> RetryDecision {
        if state.wait_period > self.ceiling_secs {
            return RetryDecision::Abort;
        }
        let wait = Duration::from_secs_f64(state.wait_period);
        state.wait_period *= self.backoff_multiplier;
        RetryDecision::Wait(wait)
    }
}
