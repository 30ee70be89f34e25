//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::tenants::Funnel;

/// Root configuration for the tenant gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Host routing: base domain and skip list.
    pub routing: RoutingConfig,

    /// Application upstream that serves platform routes.
    pub upstream: UpstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Retry configuration.
    pub retries: RetryConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    pub admin: AdminConfig,

    pub security: SecurityConfig,

    /// Tenant directory persistence.
    pub directory: DirectoryConfig,

    /// Tenant funnels loaded into the in-memory directory at startup.
    pub tenants: Vec<Funnel>,
}

/// Tenant directory persistence settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// JSON snapshot written on admin changes and read back at startup.
    pub snapshot_path: Option<String>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Process-wide routing configuration, read-only after startup.
///
/// An empty `base_domain` disables tenant rewriting; requests then only see
/// the auth and marketing rules.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Platform root domain (e.g. "example.com").
    pub base_domain: String,

    /// Path prefixes exempt from tenant rewriting, in evaluation order.
    pub skip_list: Vec<String>,
}

impl RoutingConfig {
    /// Routing config for `base_domain` with the default skip list.
    pub fn new(base_domain: impl Into<String>) -> Self {
        Self {
            base_domain: base_domain.into(),
            ..Self::default()
        }
    }

    /// Whether subdomain detection is active.
    pub fn tenant_routing_enabled(&self) -> bool {
        !self.base_domain.is_empty()
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            base_domain: String::new(),
            skip_list: default_skip_list(),
        }
    }
}

pub fn default_skip_list() -> Vec<String> {
    ["/agency", "/sign-in", "/sign-up", "/api", "/trpc"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Application upstream configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the application server (e.g., "http://127.0.0.1:3000").
    pub url: String,

    /// Path prefixes served by the application rather than tenant content.
    pub platform_routes: Vec<String>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:3000".to_string(),
            platform_routes: ["/agency", "/subaccount", "/site", "/api", "/trpc"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Enable retries.
    pub enabled: bool,

    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,

    /// Percentage of requests that can be retries (retry budget).
    /// e.g., 0.1 for 10% budget.
    pub budget_ratio: f32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_attempts: 3,
            base_delay_ms: 100,
            max_delay_ms: 2000,
            budget_ratio: 0.1,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Admin API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Enable admin API.
    pub enabled: bool,

    /// API key for authentication (Bearer token).
    pub api_key: String,

    /// Admin API bind address.
    pub bind_address: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            // WARNING: This is a placeholder! Change this in production.
            api_key: "CHANGE_ME_IN_PRODUCTION".to_string(),
            bind_address: "127.0.0.1:8081".to_string(),
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}
