//! Routing rules.
//!
//! # Responsibilities
//! - Tenant rewrite for custom subdomains, honouring the skip list
//! - Canonical redirect for the auth entry points
//! - Rewrite of the marketing root to `/site`
//!
//! # Design Decisions
//! - Each rule is a self-contained (predicate, action) pair
//! - A rule returns `None` to fall through to the next one
//! - Skip-list prefixes match literally (`/agencyX` is under `/agency`)
//! - No regex to guarantee O(n) matching

use crate::config::RoutingConfig;
use crate::routing::decision::{Decision, RequestContext};

/// Canonical sign-in location for both auth entry points.
pub const SIGN_IN_PATH: &str = "/agency/sign-in";

/// Internal path of the marketing site.
pub const SITE_PATH: &str = "/site";

/// Name of the rule that rewrites onto tenant content.
pub const TENANT_REWRITE: &str = "tenant_rewrite";

/// Classified request handed to every rule.
#[derive(Debug)]
pub struct RoutingInput<'a> {
    pub request: &'a RequestContext,
    pub config: &'a RoutingConfig,
    /// Normalized host (port stripped, lowercased).
    pub base_host: &'a str,
    /// Tenant identifier when the host is a custom subdomain.
    pub tenant: Option<&'a str>,
}

/// A single entry of the ordered routing table.
pub trait Rule: Send + Sync + std::fmt::Debug {
    /// Stable name for logs, metrics and the explain endpoint.
    fn name(&self) -> &'static str;

    /// Returns a decision if this rule applies.
    fn evaluate(&self, input: &RoutingInput<'_>) -> Option<Decision>;
}

/// First skip-list prefix that `path` starts with.
pub fn matching_skip_prefix<'a>(config: &'a RoutingConfig, path: &str) -> Option<&'a str> {
    config
        .skip_list
        .iter()
        .map(String::as_str)
        .find(|prefix| path.starts_with(prefix))
}

/// Rewrites tenant subdomain traffic to `/{tenant}{path}[?query]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TenantRewrite;

impl Rule for TenantRewrite {
    fn name(&self) -> &'static str {
        TENANT_REWRITE
    }

    fn evaluate(&self, input: &RoutingInput<'_>) -> Option<Decision> {
        let tenant = input.tenant?;
        let request = input.request;

        if matching_skip_prefix(input.config, &request.path).is_some() {
            return None;
        }

        let mut target = format!("/{}{}", tenant, request.path);
        if !request.query.is_empty() {
            target.push('?');
            target.push_str(&request.query);
        }
        Some(Decision::Rewrite(target))
    }
}

/// Sends `/sign-in` and `/sign-up` to the agency sign-in page.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthRedirect;

impl Rule for AuthRedirect {
    fn name(&self) -> &'static str {
        "auth_redirect"
    }

    fn evaluate(&self, input: &RoutingInput<'_>) -> Option<Decision> {
        match input.request.path.as_str() {
            "/sign-in" | "/sign-up" => Some(Decision::Redirect(SIGN_IN_PATH.to_string())),
            _ => None,
        }
    }
}

/// Serves the marketing site for the root path.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarketingRoot;

impl Rule for MarketingRoot {
    fn name(&self) -> &'static str {
        "marketing_root"
    }

    fn evaluate(&self, input: &RoutingInput<'_>) -> Option<Decision> {
        let path = input.request.path.as_str();
        let on_base_domain = input.base_host == input.config.base_domain;

        if path == "/" || (path == SITE_PATH && on_base_domain) {
            Some(Decision::Rewrite(SITE_PATH.to_string()))
        } else {
            None
        }
    }
}

/// The routing table in precedence order.
pub fn default_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(TenantRewrite),
        Box::new(AuthRedirect),
        Box::new(MarketingRoot),
    ]
}
