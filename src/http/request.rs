//! Request identification and routing inputs.
//!
//! # Responsibilities
//! - Generate unique request ID (UUID v4) unless the client sent one
//! - Extract routing-relevant information (host, path, query)
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Host header first, URI authority as the HTTP/2 fallback

use axum::http::{header, HeaderName, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::routing::RequestContext;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Generates UUID v4 request IDs for `SetRequestIdLayer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Access to the request ID assigned by the middleware stack.
pub trait RequestIdExt {
    fn request_id(&self) -> &str;
}

impl<B> RequestIdExt for Request<B> {
    fn request_id(&self) -> &str {
        self.headers()
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
    }
}

/// Host as seen by the client: `Host` header, else the URI authority.
pub fn request_host<B>(request: &Request<B>) -> &str {
    request
        .headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .or_else(|| request.uri().authority().map(|a| a.as_str()))
        .unwrap_or_default()
}

/// Routing view of `request`.
pub fn routing_context<B>(request: &Request<B>) -> RequestContext {
    RequestContext::new(
        request_host(request),
        request.uri().path(),
        request.uri().query().unwrap_or_default(),
    )
}
