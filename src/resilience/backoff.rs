//! Exponential backoff with jitter.

use std::time::Duration;
use rand::Rng;

/// Delay before retry number `attempt` (1-based).
///
/// Doubles from `base_ms`, capped at `max_ms`, plus up to 10% jitter.
/// Attempt 0 never waits.
pub fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    let Some(doublings) = attempt.checked_sub(1) else {
        return Duration::ZERO;
    };

    let delay = 1u64
        .checked_shl(doublings)
        .and_then(|factor| base_ms.checked_mul(factor))
        .map_or(max_ms, |ms| ms.min(max_ms));
    let jitter = rand::thread_rng().gen_range(0..=delay / 10);

    Duration::from_millis(delay.saturating_add(jitter))
}
