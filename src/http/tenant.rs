//! Tenant content handlers.
//!
//! Tenant rewrites arrive as `/{tenant}/{page}`. Anything the inner
//! router does not claim lands here: tenant content when the request was
//! rewritten onto a tenant or names a known tenant, the application
//! upstream otherwise.

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request, StatusCode},
    response::{Html, IntoResponse, Response},
};

use crate::http::middleware::TenantTarget;
use crate::http::request::RequestIdExt;
use crate::http::server::AppState;
use crate::tenants::resolver::{resolve_page, tenant_key};

/// Split `/{tenant}/{rest}` into its first segment and the remainder.
pub fn split_tenant_path(path: &str) -> (&str, &str) {
    let trimmed = path.trim_start_matches('/');
    trimmed.split_once('/').unwrap_or((trimmed, ""))
}

/// Fallback handler: tenant content or application upstream.
pub async fn tenant_or_upstream(State(state): State<AppState>, request: Request<Body>) -> Response {
    let targeted = request.extensions().get::<TenantTarget>().is_some();
    let path = request.uri().path().to_string();
    let (segment, page_path) = split_tenant_path(&path);

    let is_tenant = !segment.is_empty()
        && (targeted || state.directory.funnel(&tenant_key(segment)).is_some());
    if !is_tenant {
        return state.upstream.forward(request).await;
    }

    if request.method() != Method::GET && request.method() != Method::HEAD {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    match resolve_page(state.directory.as_ref(), segment, page_path) {
        Ok(page) => Html(page.content).into_response(),
        Err(e) => {
            tracing::info!(
                request_id = %request.request_id(),
                tenant = %segment,
                page = %page_path,
                reason = %e,
                "Tenant content not found"
            );
            (StatusCode::NOT_FOUND, "Not Found").into_response()
        }
    }
}

/// Platform routes always go to the application upstream.
pub async fn platform(State(state): State<AppState>, request: Request<Body>) -> Response {
    state.upstream.forward(request).await
}
