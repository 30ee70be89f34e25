//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Compose host routing, platform routes and tenant content into one app
//! - Wire up middleware (request ID, tracing, timeout, body limit)
//! - Bind to a listener and drain on shutdown
//!
//! # Design Decisions
//! - Host routing wraps the inner router as a service, so a rewrite is
//!   visible to route matching
//! - Layer order, outermost first: request ID, trace, timeout,
//!   request ID propagation, body limit

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{routing::any, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::Layer;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::http::forward::{Upstream, UpstreamError};
use crate::http::middleware::host_routing_middleware;
use crate::http::request::{MakeRequestUuid, X_REQUEST_ID};
use crate::http::tenant::{platform, tenant_or_upstream};
use crate::lifecycle::shutdown::wait_for;
use crate::routing::HostRouter;
use crate::tenants::TenantDirectory;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<HostRouter>,
    pub directory: Arc<dyn TenantDirectory>,
    pub upstream: Arc<Upstream>,
}

/// HTTP server for the tenant gateway.
pub struct HttpServer {
    app: Router,
    state: AppState,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig, directory: Arc<dyn TenantDirectory>) -> Result<Self, UpstreamError> {
        let state = AppState {
            router: Arc::new(HostRouter::new(config.routing.clone())),
            directory,
            upstream: Arc::new(Upstream::new(&config)?),
        };
        let app = Self::build_app(&config, state.clone());
        Ok(Self { app, state, config })
    }

    /// Build the Axum app with all middleware layers.
    #[allow(deprecated)]
    fn build_app(config: &GatewayConfig, state: AppState) -> Router {
        let mut inner = Router::new();
        for prefix in &config.upstream.platform_routes {
            inner = inner
                .route(prefix, any(platform))
                .route(&format!("{prefix}/{{*rest}}"), any(platform));
        }
        let inner = inner.fallback(tenant_or_upstream).with_state(state.clone());

        let routed = axum::middleware::from_fn_with_state(state.router.clone(), host_routing_middleware).layer(inner);

        Router::new()
            .fallback_service(routed)
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
    }

    /// The composed app, for serving or in-process testing.
    pub fn app(&self) -> Router {
        self.app.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(self, listener: TcpListener, shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            base_domain = %self.config.routing.base_domain,
            upstream = %self.state.upstream.authority(),
            "Gateway listening"
        );

        let app = self.app.into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(wait_for(shutdown))
            .await?;

        tracing::info!("Gateway stopped");
        Ok(())
    }
}
