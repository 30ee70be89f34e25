//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize, environment overrides)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Environment is read only at startup, never by request handling
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::GatewayConfig;
pub use schema::ListenerConfig;
pub use schema::RoutingConfig;
pub use schema::UpstreamConfig;
pub use schema::{
    AdminConfig, DirectoryConfig, LogFormat, ObservabilityConfig, RetryConfig, SecurityConfig, TimeoutConfig,
};
pub use validation::ValidationError;
