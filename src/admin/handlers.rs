use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::admin::AdminState;
use crate::config::validation::check_subdomain;
use crate::routing::{RequestContext, RouteOutcome};
use crate::tenants::Funnel;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub base_domain: String,
    pub tenant_routing: bool,
    pub upstream: String,
    pub tenants: usize,
}

#[derive(Serialize)]
pub struct TenantSummary {
    pub subdomain: String,
    pub name: String,
    pub published: bool,
    pub pages: usize,
}

impl From<&Funnel> for TenantSummary {
    fn from(funnel: &Funnel) -> Self {
        Self {
            subdomain: funnel.subdomain.clone(),
            name: funnel.name.clone(),
            published: funnel.published,
            pages: funnel.pages.len(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ExplainParams {
    pub host: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
}

fn error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(serde_json::json!({ "error": message.into() }))).into_response()
}

pub async fn get_status(State(state): State<AdminState>) -> Json<SystemStatus> {
    let routing = state.app.router.config();
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        base_domain: routing.base_domain.clone(),
        tenant_routing: routing.tenant_routing_enabled(),
        upstream: state.app.upstream.authority().to_string(),
        tenants: state.app.directory.list().len(),
    })
}

pub async fn list_tenants(State(state): State<AdminState>) -> Json<Vec<TenantSummary>> {
    Json(state.app.directory.list().iter().map(TenantSummary::from).collect())
}

pub async fn get_tenant(State(state): State<AdminState>, Path(subdomain): Path<String>) -> Response {
    match state.app.directory.funnel(&subdomain.to_ascii_lowercase()) {
        Some(funnel) => Json(funnel).into_response(),
        None => error(StatusCode::NOT_FOUND, format!("no tenant {subdomain:?}")),
    }
}

/// Insert or replace a tenant. The path names the tenant; the body's
/// `subdomain` is overwritten.
pub async fn put_tenant(
    State(state): State<AdminState>,
    Path(subdomain): Path<String>,
    Json(mut funnel): Json<Funnel>,
) -> Response {
    let subdomain = subdomain.to_ascii_lowercase();
    if let Err(e) = check_subdomain(&subdomain, &state.platform_routes) {
        return error(StatusCode::UNPROCESSABLE_ENTITY, e.to_string());
    }
    funnel.subdomain = subdomain.clone();

    let created = state.app.directory.upsert(funnel).is_none();
    if let Err(e) = state.app.directory.persist() {
        tracing::error!(error = %e, "Failed to persist tenant directory");
        return error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
    }

    tracing::info!(tenant = %subdomain, created, "Tenant updated");
    if created {
        StatusCode::CREATED.into_response()
    } else {
        StatusCode::OK.into_response()
    }
}

pub async fn delete_tenant(State(state): State<AdminState>, Path(subdomain): Path<String>) -> Response {
    let subdomain = subdomain.to_ascii_lowercase();
    if state.app.directory.remove(&subdomain).is_none() {
        return error(StatusCode::NOT_FOUND, format!("no tenant {subdomain:?}"));
    }
    if let Err(e) = state.app.directory.persist() {
        tracing::error!(error = %e, "Failed to persist tenant directory");
        return error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
    }

    tracing::info!(tenant = %subdomain, "Tenant removed");
    StatusCode::NO_CONTENT.into_response()
}

/// Dry-run the routing table for a host, path and query.
pub async fn explain(State(state): State<AdminState>, Query(params): Query<ExplainParams>) -> Json<RouteOutcome> {
    let request = RequestContext::new(
        params.host,
        params.path.unwrap_or_else(|| "/".to_string()),
        params.query.unwrap_or_default(),
    );
    Json(state.app.router.explain(&request))
}
