//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check base domain and path prefix shape
//! - Validate value ranges (timeouts > 0, attempts >= 1)
//! - Detect duplicate tenants and page paths
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - An empty base domain is valid: tenant routing is simply off

use std::collections::HashSet;

use url::Url;

use crate::config::schema::GatewayConfig;
use crate::routing::rules::SITE_PATH;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("routing.base_domain {0:?} must be a bare domain (no scheme, port, path or whitespace)")]
    MalformedBaseDomain(String),

    #[error("{field} entry {prefix:?} must start with '/', not end with '/' and contain no '{{', '}}' or '*'")]
    MalformedPrefix { field: &'static str, prefix: String },

    #[error("{field} entry {prefix:?} is listed more than once")]
    DuplicatePrefix { field: &'static str, prefix: String },

    #[error("upstream.url {0:?} must be an absolute http URL")]
    InvalidUpstreamUrl(String),

    #[error("admin.api_key must be set when the admin API is enabled")]
    MissingAdminKey,

    #[error("{0} must be greater than zero")]
    ZeroValue(&'static str),

    #[error("tenant subdomain {0:?} must be non-empty, lowercase and contain no dots")]
    InvalidSubdomain(String),

    #[error("tenant subdomain {0:?} is reserved by a platform route")]
    ReservedSubdomain(String),

    #[error("tenant subdomain {0:?} is declared more than once")]
    DuplicateTenant(String),

    #[error("tenant {tenant:?} declares page path {path:?} more than once")]
    DuplicatePage { tenant: String, path: String },
}

/// Validate a parsed configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let domain = &config.routing.base_domain;
    if !domain.is_empty() && !is_bare_domain(domain) {
        errors.push(ValidationError::MalformedBaseDomain(domain.clone()));
    }

    check_prefixes("routing.skip_list", &config.routing.skip_list, &mut errors);
    check_prefixes(
        "upstream.platform_routes",
        &config.upstream.platform_routes,
        &mut errors,
    );
    let mut routes = HashSet::new();
    for prefix in &config.upstream.platform_routes {
        if !routes.insert(prefix.as_str()) {
            errors.push(ValidationError::DuplicatePrefix {
                field: "upstream.platform_routes",
                prefix: prefix.clone(),
            });
        }
    }

    match Url::parse(&config.upstream.url) {
        Ok(url) if url.scheme() == "http" && url.host_str().is_some() => {}
        _ => errors.push(ValidationError::InvalidUpstreamUrl(config.upstream.url.clone())),
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroValue("timeouts.request_secs"));
    }
    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroValue("timeouts.connect_secs"));
    }
    if config.retries.max_attempts == 0 {
        errors.push(ValidationError::ZeroValue("retries.max_attempts"));
    }
    if config.admin.enabled && config.admin.api_key.trim().is_empty() {
        errors.push(ValidationError::MissingAdminKey);
    }
    if config.security.max_body_size == 0 {
        errors.push(ValidationError::ZeroValue("security.max_body_size"));
    }

    let mut seen = HashSet::new();
    for funnel in &config.tenants {
        let sub = &funnel.subdomain;
        if let Err(e) = check_subdomain(sub, &config.upstream.platform_routes) {
            errors.push(e);
        }
        if !seen.insert(sub.as_str()) {
            errors.push(ValidationError::DuplicateTenant(sub.clone()));
        }

        let mut paths = HashSet::new();
        for page in &funnel.pages {
            if !paths.insert(page.path_name.as_str()) {
                errors.push(ValidationError::DuplicatePage {
                    tenant: sub.clone(),
                    path: page.path_name.clone(),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check that `subdomain` can name a tenant.
///
/// A tenant may not shadow the first segment of a platform route or the
/// marketing site, since its content is served under `/{subdomain}`.
pub fn check_subdomain(subdomain: &str, platform_routes: &[String]) -> Result<(), ValidationError> {
    if subdomain.is_empty()
        || subdomain.contains(['.', '/', '{', '}', '*', '?', '#'])
        || subdomain
            .chars()
            .any(|c| c.is_ascii_uppercase() || c.is_whitespace())
    {
        return Err(ValidationError::InvalidSubdomain(subdomain.to_string()));
    }

    let reserved = platform_routes
        .iter()
        .map(String::as_str)
        .chain([SITE_PATH])
        .filter_map(|route| route.trim_start_matches('/').split('/').next())
        .any(|segment| segment == subdomain);
    if reserved {
        return Err(ValidationError::ReservedSubdomain(subdomain.to_string()));
    }
    Ok(())
}

fn is_bare_domain(domain: &str) -> bool {
    !domain.contains("://")
        && !domain.contains(['/', ':', '?', '#'])
        && !domain.chars().any(char::is_whitespace)
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

fn check_prefixes(field: &'static str, prefixes: &[String], errors: &mut Vec<ValidationError>) {
    for prefix in prefixes {
        if !prefix.starts_with('/')
            || prefix.len() < 2
            || prefix.ends_with('/')
            || prefix.contains(['{', '}', '*'])
        {
            errors.push(ValidationError::MalformedPrefix {
                field,
                prefix: prefix.clone(),
            });
        }
    }
}
