//! Admin API.
//!
//! # Responsibilities
//! - Report gateway status
//! - Manage tenant funnels at runtime
//! - Explain routing decisions without sending traffic
//!
//! # Design Decisions
//! - Served on its own listener, never through host routing
//! - Every route requires the configured bearer key

pub mod auth;
pub mod handlers;

use axum::{
    middleware,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use self::auth::admin_auth_middleware;
use self::handlers::*;
use crate::http::server::AppState;
use crate::lifecycle::shutdown::wait_for;

/// State shared by admin handlers.
#[derive(Clone)]
pub struct AdminState {
    pub app: AppState,
    pub api_key: String,
    pub platform_routes: Vec<String>,
}

pub fn setup_admin_router(state: AdminState) -> Router {
    Router::new()
        .route("/admin/status", get(get_status))
        .route("/admin/tenants", get(list_tenants))
        .route(
            "/admin/tenants/{subdomain}",
            get(get_tenant).put(put_tenant).delete(delete_tenant),
        )
        .route("/admin/explain", get(explain))
        .layer(middleware::from_fn_with_state(state.clone(), admin_auth_middleware))
        .with_state(state)
}

/// Serve the admin API until `shutdown` fires.
pub async fn serve_admin(
    listener: TcpListener,
    state: AdminState,
    shutdown: broadcast::Receiver<()>,
) -> Result<(), std::io::Error> {
    tracing::info!(address = %listener.local_addr()?, "Admin API listening");
    axum::serve(listener, setup_admin_router(state))
        .with_graceful_shutdown(wait_for(shutdown))
        .await
}
