//! HTTP middleware.

pub mod host_routing;

pub use host_routing::{host_routing_middleware, RewrittenFrom, TenantTarget};
