//! Host header normalization and subdomain classification.

/// Normalize a host header value: trim, drop a trailing `:port`, lowercase.
///
/// Host names are case-insensitive (RFC 9110), so `Shop.Example.com` must
/// classify like `shop.example.com`; surrounding whitespace is never part
/// of a host. Only an all-digit suffix counts as a port, so bracketed IPv6
/// literals without a port (`[::1]`) pass through untouched.
pub fn normalize_host(host: &str) -> String {
    let host = host.trim();
    let host = match host.rsplit_once(':') {
        Some((head, port)) if port.bytes().all(|b| b.is_ascii_digit()) => head,
        _ => host,
    };
    host.to_ascii_lowercase()
}

/// Tenant identifier for `base_host` under `base_domain`, if any.
///
/// `base_host` must already be normalized. The bare base domain, foreign
/// hosts, and hosts that merely end with the same characters
/// (`myexample.com` vs `example.com`) are not tenants.
pub fn tenant_subdomain<'a>(base_host: &'a str, base_domain: &str) -> Option<&'a str> {
    if base_domain.is_empty()
        || base_host.len() <= base_domain.len()
        || !base_host.ends_with(base_domain)
    {
        return None;
    }

    base_host
        .strip_suffix(base_domain)?
        .strip_suffix('.')
        .filter(|tenant| !tenant.is_empty())
}
