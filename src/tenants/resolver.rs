//! Tenant content resolution for rewritten `/{tenant}/...` paths.
//!
//! # Responsibilities
//! - Strip a leftover protocol scheme from the tenant segment
//! - Look up the funnel and refuse unpublished ones
//! - Pick the landing page (lowest order) or a named page
//!
//! # Design Decisions
//! - Every failure is a plain "not found" to the client
//! - The router's rewrite is final; no fallback happens here

use crate::observability::metrics;
use crate::tenants::directory::TenantDirectory;
use crate::tenants::types::{Funnel, FunnelPage};

/// Why a tenant page could not be served.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("no funnel for tenant {0:?}")]
    NotFound(String),

    #[error("funnel for tenant {0:?} is not published")]
    Unpublished(String),

    #[error("funnel for tenant {0:?} has no pages")]
    NoPages(String),

    #[error("tenant {tenant:?} has no page {path:?}")]
    PageNotFound { tenant: String, path: String },
}

impl ResolveError {
    fn outcome(&self) -> &'static str {
        match self {
            ResolveError::NotFound(_) => "not_found",
            ResolveError::Unpublished(_) => "unpublished",
            ResolveError::NoPages(_) => "no_pages",
            ResolveError::PageNotFound { .. } => "page_not_found",
        }
    }
}

const SCHEMES: [&str; 4] = ["https://", "http://", "https%3a%2f%2f", "http%3a%2f%2f"];

/// Drop a leading `http://` or `https://`, plain or percent-encoded.
pub fn strip_scheme(segment: &str) -> &str {
    for scheme in SCHEMES {
        if segment.len() >= scheme.len()
            && segment.is_char_boundary(scheme.len())
            && segment[..scheme.len()].eq_ignore_ascii_case(scheme)
        {
            return &segment[scheme.len()..];
        }
    }
    segment
}

/// Tenant identifier from a raw path segment.
pub fn tenant_key(segment: &str) -> String {
    strip_scheme(segment).trim_matches('/').to_ascii_lowercase()
}

fn lookup(directory: &dyn TenantDirectory, segment: &str) -> Result<Funnel, ResolveError> {
    let key = tenant_key(segment);
    let funnel = directory
        .funnel(&key)
        .ok_or_else(|| ResolveError::NotFound(key.clone()))?;
    if !funnel.published {
        return Err(ResolveError::Unpublished(key));
    }
    Ok(funnel)
}

fn record<T>(result: Result<T, ResolveError>) -> Result<T, ResolveError> {
    let outcome = match &result {
        Ok(_) => "served",
        Err(e) => e.outcome(),
    };
    metrics::record_tenant_lookup(outcome);
    result
}

/// The landing page of the tenant named by `segment`.
pub fn resolve_landing(
    directory: &dyn TenantDirectory,
    segment: &str,
) -> Result<FunnelPage, ResolveError> {
    record(lookup(directory, segment).and_then(|funnel| {
        funnel
            .landing_page()
            .cloned()
            .ok_or(ResolveError::NoPages(funnel.subdomain))
    }))
}

/// The page served under `path_name` for the tenant named by `segment`.
///
/// An empty `path_name` (after trimming slashes) resolves the landing page.
pub fn resolve_page(
    directory: &dyn TenantDirectory,
    segment: &str,
    path_name: &str,
) -> Result<FunnelPage, ResolveError> {
    let path_name = path_name.trim_matches('/');
    if path_name.is_empty() {
        return resolve_landing(directory, segment);
    }

    record(lookup(directory, segment).and_then(|funnel| {
        funnel
            .page(path_name)
            .cloned()
            .ok_or_else(|| ResolveError::PageNotFound {
                tenant: funnel.subdomain.clone(),
                path: path_name.to_string(),
            })
    }))
}
