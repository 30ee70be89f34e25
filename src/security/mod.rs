//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Request forwarded to the application upstream:
//!     → headers.rs (strip hop-by-hop, add X-Forwarded-*)
//! ```
//!
//! # Design Decisions
//! - No trust in client-supplied X-Forwarded-Host
//! - Body size is capped before any buffering (see http::server)

pub mod headers;
