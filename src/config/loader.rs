//! Configuration loading from disk and environment.

use std::env;
use std::fs;
use std::path::Path;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Overrides `routing.base_domain`.
pub const ENV_BASE_DOMAIN: &str = "BASE_DOMAIN";
/// Overrides `listener.bind_address`.
pub const ENV_BIND_ADDRESS: &str = "GATEWAY_BIND_ADDRESS";
/// Overrides `upstream.url`.
pub const ENV_UPSTREAM_URL: &str = "UPSTREAM_URL";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file, then apply environment overrides.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config = parse_config(&content)?;
    apply_env_overrides(&mut config, |key| env::var(key).ok());
    normalize(&mut config);

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Parse a TOML document without touching the environment.
pub fn parse_config(content: &str) -> Result<GatewayConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

impl GatewayConfig {
    /// Defaults plus environment overrides, for running without a config file.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        apply_env_overrides(&mut config, |key| env::var(key).ok());
        normalize(&mut config);
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

/// Hosts are compared lowercased, so the base domain is stored that way.
fn normalize(config: &mut GatewayConfig) {
    config.routing.base_domain = config.routing.base_domain.trim().to_ascii_lowercase();
}

/// Apply environment overrides through `lookup`.
///
/// Only called at startup; the decision logic never reads the environment.
pub fn apply_env_overrides<F>(config: &mut GatewayConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(domain) = lookup(ENV_BASE_DOMAIN) {
        config.routing.base_domain = domain;
    }
    if let Some(addr) = lookup(ENV_BIND_ADDRESS) {
        config.listener.bind_address = addr;
    }
    if let Some(url) = lookup(ENV_UPSTREAM_URL) {
        config.upstream.url = url;
    }
}
