//! Router input and output types.

use serde::Serialize;

/// Routing-relevant view of one inbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Raw host header, possibly carrying `:port`.
    pub host: String,
    /// Request path, always starting with `/`.
    pub path: String,
    /// Query string without the leading `?`, possibly empty.
    pub query: String,
}

impl RequestContext {
    pub fn new(host: impl Into<String>, path: impl Into<String>, query: impl Into<String>) -> Self {
        let path = path.into();
        let path = if path.starts_with('/') {
            path
        } else {
            format!("/{path}")
        };
        Self {
            host: host.into(),
            path,
            query: query.into(),
        }
    }
}

/// The single outcome of routing one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum Decision {
    /// Serve this internal path without changing the client-visible URL.
    Rewrite(String),
    /// Send the client an HTTP redirect to this path.
    Redirect(String),
    /// Proceed with the original request.
    Continue,
}

impl Decision {
    /// Label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Decision::Rewrite(_) => "rewrite",
            Decision::Redirect(_) => "redirect",
            Decision::Continue => "continue",
        }
    }
}
