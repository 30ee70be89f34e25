//! Tenant gateway library.
//!
//! Routes requests by host: custom tenant subdomains are rewritten onto
//! the tenant's published content, the bare base domain reaches the
//! platform application, and the auth entry points are redirected.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client ──▶ http::server ──▶ host_routing middleware ──▶ routing::HostRouter
//!                                        │
//!                     ┌──────────────────┼────────────────────┐
//!                     ▼                  ▼                    ▼
//!                 redirect        platform route        tenant content
//!                                  http::forward        tenants::resolver
//!                                        │                    │
//!                                        ▼                    ▼
//!                               application upstream   tenants::directory
//! ```

// Core subsystems
pub mod config;
pub mod http;
pub mod routing;
pub mod tenants;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod security;

pub mod admin;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{Decision, HostRouter, RequestContext};
