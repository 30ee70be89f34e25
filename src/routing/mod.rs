//! Host routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (host, path, query)
//!     → host.rs (strip port, classify tenant subdomain)
//!     → rules.rs (ordered rule table, first match wins)
//!     → router.rs (evaluate table, default to Continue)
//!     → Decision: Rewrite | Redirect | Continue
//!
//! Router construction (at startup):
//!     RoutingConfig (base domain, skip list)
//!     → Freeze as immutable HostRouter
//!     → Shared via Arc with the HTTP middleware and admin API
//! ```
//!
//! # Design Decisions
//! - Config is injected, never read from the environment here
//! - No regex in hot path (suffix and prefix matching only)
//! - Deterministic: same input always yields the same decision
//! - First match wins (ordered by table position)

pub mod decision;
pub mod host;
pub mod router;
pub mod rules;

pub use decision::{Decision, RequestContext};
pub use router::{HostRouter, RouteOutcome};
pub use rules::Rule;
