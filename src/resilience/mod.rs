//! Resilience subsystem for upstream calls.
//!
//! # Data Flow
//! ```text
//! Forwarded request fails (network error or 502/503/504):
//!     → retries.rs (retryable? budget left?)
//!     → backoff.rs (exponential delay with jitter)
//!     → next attempt
//! ```
//!
//! # Design Decisions
//! - Retries only for idempotent requests (GET, HEAD, etc.)
//! - Retry budget caps retries relative to traffic

pub mod backoff;
pub mod retries;

pub use backoff::calculate_backoff;
pub use retries::{is_retryable, RetryBudget};
