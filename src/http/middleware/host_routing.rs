//! Host routing middleware.
//! Applies the router's decision before any route handler runs.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode, Uri},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::http::request::{routing_context, RequestIdExt};
use crate::observability::metrics;
use crate::routing::rules::TENANT_REWRITE;
use crate::routing::{Decision, HostRouter};

/// Marks a request whose URI was rewritten by the gateway.
#[derive(Debug, Clone)]
pub struct RewrittenFrom(pub Uri);

/// Tenant whose content a rewritten request targets.
///
/// Only set by the tenant rewrite, so other rewrites (the marketing root)
/// keep reaching the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantTarget(pub String);

/// Classify the request and rewrite, redirect or pass it on.
///
/// Must wrap the inner router as a service so that routing sees the
/// rewritten URI. A request already marked `RewrittenFrom` is passed on
/// untouched, so a rewrite can never be rewritten again.
pub async fn host_routing_middleware(
    State(router): State<Arc<HostRouter>>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if req.extensions().get::<RewrittenFrom>().is_some() {
        return next.run(req).await;
    }

    let ctx = routing_context(&req);
    let outcome = router.explain(&ctx);
    metrics::record_decision(outcome.rule, outcome.decision.kind());

    tracing::debug!(
        request_id = %req.request_id(),
        host = %ctx.host,
        path = %ctx.path,
        tenant = ?outcome.tenant,
        rule = outcome.rule,
        decision = outcome.decision.kind(),
        "Routing decision"
    );

    let tenant = match outcome.rule {
        TENANT_REWRITE => outcome.tenant.clone(),
        _ => None,
    };

    match outcome.decision {
        Decision::Continue => next.run(req).await,
        Decision::Redirect(location) => Redirect::temporary(&location).into_response(),
        Decision::Rewrite(target) => {
            let uri = match target.parse::<Uri>() {
                Ok(uri) => uri,
                Err(e) => {
                    tracing::warn!(
                        request_id = %req.request_id(),
                        target = %target,
                        error = %e,
                        "Rewrite target is not a valid URI"
                    );
                    return (StatusCode::BAD_REQUEST, "Invalid host").into_response();
                }
            };
            let original = std::mem::replace(req.uri_mut(), uri);
            req.extensions_mut().insert(RewrittenFrom(original));
            if let Some(tenant) = tenant {
                req.extensions_mut().insert(TenantTarget(tenant));
            }
            next.run(req).await
        }
    }
}
