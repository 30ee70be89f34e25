//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, routing context)
//!     → middleware/host_routing.rs (rewrite, redirect or continue)
//!     → platform route → forward.rs → application upstream
//!     → anything else → tenant.rs (tenant content, else upstream)
//! ```

pub mod forward;
pub mod middleware;
pub mod request;
pub mod server;
pub mod tenant;

pub use forward::{Upstream, UpstreamError};
pub use request::{MakeRequestUuid, RequestIdExt, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
