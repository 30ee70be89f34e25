//! Host router: the ordered decision procedure.
//!
//! # Responsibilities
//! - Normalize the host and classify tenant subdomains
//! - Evaluate the rule table, first match wins
//! - Fall back to an explicit `Continue`
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Pure: no I/O, no logging, no environment access
//! - Deterministic: same input always yields the same decision

use serde::Serialize;

use crate::config::RoutingConfig;
use crate::routing::decision::{Decision, RequestContext};
use crate::routing::host::{normalize_host, tenant_subdomain};
use crate::routing::rules::{default_rules, Rule, RoutingInput};

/// Rule name reported when nothing matched.
pub const DEFAULT_RULE: &str = "default";

/// A decision together with how it was reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteOutcome {
    /// Name of the rule that produced the decision.
    pub rule: &'static str,
    /// Tenant identifier derived from the host, if any.
    pub tenant: Option<String>,
    pub decision: Decision,
}

/// Classifies requests by host and path.
#[derive(Debug)]
pub struct HostRouter {
    config: RoutingConfig,
    rules: Vec<Box<dyn Rule>>,
}

impl HostRouter {
    /// Router with the standard rule table.
    pub fn new(config: RoutingConfig) -> Self {
        Self::with_rules(config, default_rules())
    }

    /// Router with a custom rule table, evaluated in the given order.
    pub fn with_rules(config: RoutingConfig, rules: Vec<Box<dyn Rule>>) -> Self {
        Self { config, rules }
    }

    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    /// Decide what to do with `request`.
    pub fn decide(&self, request: &RequestContext) -> Decision {
        self.explain(request).decision
    }

    /// Decide and report which rule matched.
    pub fn explain(&self, request: &RequestContext) -> RouteOutcome {
        let base_host = normalize_host(&request.host);
        let tenant = tenant_subdomain(&base_host, &self.config.base_domain);

        let input = RoutingInput {
            request,
            config: &self.config,
            base_host: &base_host,
            tenant,
        };

        let (rule, decision) = self
            .rules
            .iter()
            .find_map(|rule| rule.evaluate(&input).map(|d| (rule.name(), d)))
            .unwrap_or((DEFAULT_RULE, Decision::Continue));

        RouteOutcome {
            rule,
            tenant: tenant.map(str::to_string),
            decision,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> HostRouter {
        HostRouter::new(RoutingConfig::new("example.com"))
    }

    fn decide(router: &HostRouter, host: &str, path: &str) -> Decision {
        router.decide(&RequestContext::new(host, path, ""))
    }

    #[test]
    fn test_tenant_products() {
        assert_eq!(
            decide(&router(), "shop.example.com", "/products"),
            Decision::Rewrite("/shop/products".into())
        );
    }

    #[test]
    fn test_tenant_with_port_and_query() {
        let outcome = router().explain(&RequestContext::new("shop.example.com:3000", "/", "ref=ad"));
        assert_eq!(outcome.rule, "tenant_rewrite");
        assert_eq!(outcome.tenant.as_deref(), Some("shop"));
        assert_eq!(outcome.decision, Decision::Rewrite("/shop/?ref=ad".into()));
    }

    #[test]
    fn test_marketing_root_on_base_domain() {
        assert_eq!(
            decide(&router(), "example.com", "/"),
            Decision::Rewrite("/site".into())
        );
        assert_eq!(
            decide(&router(), "example.com:443", "/site"),
            Decision::Rewrite("/site".into())
        );
    }

    #[test]
    fn test_skip_list_falls_through() {
        let config = RoutingConfig {
            base_domain: "example.com".into(),
            skip_list: vec!["/agency".into()],
        };
        let router = HostRouter::new(config);
        assert_eq!(decide(&router, "shop.example.com", "/agency/settings"), Decision::Continue);
    }

    #[test]
    fn test_skipped_tenant_request_reaches_auth_redirect() {
        let outcome = router().explain(&RequestContext::new("shop.example.com", "/sign-in", ""));
        assert_eq!(outcome.rule, "auth_redirect");
        assert_eq!(outcome.decision, Decision::Redirect("/agency/sign-in".into()));
    }

    // Current behaviour: sign-up lands on the sign-in page. Changing this
    // must be a deliberate edit of this test.
    #[test]
    fn test_sign_up_redirects_to_sign_in() {
        assert_eq!(
            decide(&router(), "example.com", "/sign-up"),
            Decision::Redirect("/agency/sign-in".into())
        );
    }

    #[test]
    fn test_api_always_continues() {
        for host in ["anything", "shop.example.com", "example.com", ""] {
            assert_eq!(decide(&router(), host, "/api/foo"), Decision::Continue, "host {host}");
        }
    }

    #[test]
    fn test_disabled_without_base_domain() {
        let router = HostRouter::new(RoutingConfig::default());
        assert_eq!(decide(&router, "shop.example.com", "/products"), Decision::Continue);
        assert_eq!(decide(&router, "shop.example.com", "/"), Decision::Rewrite("/site".into()));
        assert_eq!(
            decide(&router, "shop.example.com", "/sign-in"),
            Decision::Redirect("/agency/sign-in".into())
        );
    }

    #[test]
    fn test_malformed_hosts_are_not_tenants() {
        for host in ["", ":", ":8080", ".example.com", "myexample.com", "example.com.evil.net"] {
            let outcome = router().explain(&RequestContext::new(host, "/products", ""));
            assert_eq!(outcome.tenant, None, "host {host:?}");
            assert_eq!(outcome.decision, Decision::Continue, "host {host:?}");
        }
    }

    #[test]
    fn test_tenant_iff_dotted_suffix() {
        let cases = [
            ("a.example.com", true),
            ("a.b.example.com", true),
            ("A.EXAMPLE.COM:8443", true),
            ("example.com", false),
            ("xexample.com", false),
            ("example.org", false),
        ];
        for (host, expected) in cases {
            let outcome = router().explain(&RequestContext::new(host, "/x", ""));
            assert_eq!(outcome.tenant.is_some(), expected, "host {host}");
        }
    }

    #[test]
    fn test_marketing_rewrite_is_a_fixed_point() {
        let router = router();
        let first = decide(&router, "example.com", "/");
        let Decision::Rewrite(path) = first else {
            panic!("expected rewrite");
        };
        assert_eq!(decide(&router, "example.com", &path), Decision::Rewrite(path.clone()));
    }

    #[test]
    fn test_deterministic() {
        let router = router();
        let request = RequestContext::new("shop.example.com", "/products", "a=1");
        let first = router.explain(&request);
        for _ in 0..100 {
            assert_eq!(router.explain(&request), first);
        }
    }

    #[test]
    fn test_custom_rule_table() {
        let router = HostRouter::with_rules(RoutingConfig::new("example.com"), Vec::new());
        let outcome = router.explain(&RequestContext::new("shop.example.com", "/", ""));
        assert_eq!(outcome.rule, DEFAULT_RULE);
        assert_eq!(outcome.decision, Decision::Continue);
    }
}
