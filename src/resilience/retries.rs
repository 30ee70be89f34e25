//! Retry decisions and retry budget.
//!
//! # Design Decisions
//! - Never retry POST/PATCH (non-idempotent)
//! - Connection errors and 502/503/504 are retryable
//! - Retry budget prevents retry storms under load

use std::sync::atomic::{AtomicU64, Ordering};

use axum::http::{Method, StatusCode};

/// Whether a failed attempt may be retried.
pub fn is_retryable(method: &Method, status: Option<StatusCode>, network_error: bool) -> bool {
    if !method.is_idempotent() {
        return false;
    }
    if network_error {
        return true;
    }
    matches!(
        status,
        Some(StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT)
    )
}

/// Caps retries to `min_retries + ratio * requests`.
#[derive(Debug)]
pub struct RetryBudget {
    ratio: f32,
    min_retries: u64,
    requests: AtomicU64,
    retries: AtomicU64,
}

impl RetryBudget {
    pub fn new(ratio: f32, min_retries: u64) -> Self {
        Self {
            ratio: ratio.max(0.0),
            min_retries,
            requests: AtomicU64::new(0),
            retries: AtomicU64::new(0),
        }
    }

    /// Count an original (non-retry) request.
    pub fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Reserve one retry if the budget allows it.
    pub fn can_retry(&self) -> bool {
        let requests = self.requests.load(Ordering::Relaxed);
        let allowed = self.min_retries + (requests as f64 * self.ratio as f64) as u64;
        self.retries
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |used| {
                (used < allowed).then_some(used + 1)
            })
            .is_ok()
    }

    pub fn retries_used(&self) -> u64 {
        self.retries.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_methods() {
        assert!(is_retryable(&Method::GET, None, true));
        assert!(is_retryable(&Method::PUT, Some(StatusCode::SERVICE_UNAVAILABLE), false));
        assert!(!is_retryable(&Method::POST, None, true));
        assert!(!is_retryable(&Method::GET, Some(StatusCode::INTERNAL_SERVER_ERROR), false));
        assert!(!is_retryable(&Method::GET, Some(StatusCode::OK), false));
    }

    #[test]
    fn test_budget() {
        let budget = RetryBudget::new(0.5, 1);
        assert!(budget.can_retry());
        assert!(!budget.can_retry());

        for _ in 0..4 {
            budget.record_request();
        }
        assert!(budget.can_retry());
        assert!(budget.can_retry());
        assert!(!budget.can_retry());
        assert_eq!(budget.retries_used(), 3);
    }
}
