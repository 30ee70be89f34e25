//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::IntoResponse,
    Json, Router,
};
use tokio::net::TcpListener;

use tenant_gateway::config::GatewayConfig;
use tenant_gateway::http::HttpServer;
use tenant_gateway::lifecycle::Shutdown;
use tenant_gateway::tenants::{Funnel, FunnelPage, InMemoryDirectory};

/// Start a backend that echoes what it received as JSON.
pub async fn start_echo_backend() -> SocketAddr {
    let app = Router::new().fallback(|request: Request<Body>| async move {
        let header = |name: &str| {
            request
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        Json(serde_json::json!({
            "method": request.method().as_str(),
            "path": request.uri().path(),
            "query": request.uri().query(),
            "host": header("host"),
            "forwarded_host": header("x-forwarded-host"),
            "forwarded_for": header("x-forwarded-for"),
            "forwarded_proto": header("x-forwarded-proto"),
            "request_id": header("x-request-id"),
        }))
    });
    serve(app).await
}

/// Start a backend whose responses come from `f`.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let app = Router::new().fallback(move || {
        let f = f.clone();
        async move {
            let (status, body) = f().await;
            (StatusCode::from_u16(status).unwrap_or(StatusCode::OK), body).into_response()
        }
    });
    serve(app).await
}

/// An address nothing is listening on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

pub fn page(name: &str, path_name: &str, order: u32) -> FunnelPage {
    FunnelPage {
        name: name.to_string(),
        path_name: path_name.to_string(),
        order,
        content: format!("<h1>{name}</h1>"),
    }
}

/// Config for `example.com` with a published `shop` and an unpublished `draft`.
pub fn test_config(upstream: SocketAddr) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.routing.base_domain = "example.com".into();
    config.upstream.url = format!("http://{upstream}");
    config.retries.base_delay_ms = 10;
    config.retries.max_delay_ms = 50;
    config.tenants = vec![
        Funnel {
            subdomain: "shop".into(),
            name: "Shop".into(),
            published: true,
            pages: vec![page("Offer", "offer", 1), page("Home", "home", 0)],
        },
        Funnel {
            subdomain: "draft".into(),
            name: "Draft".into(),
            published: false,
            pages: vec![page("Home", "", 0)],
        },
    ];
    config
}

pub fn test_server(config: GatewayConfig) -> HttpServer {
    let directory = Arc::new(InMemoryDirectory::from_config(&config).unwrap());
    HttpServer::new(config, directory).unwrap()
}

/// Run the gateway on an ephemeral port. Dropping the `Shutdown` stops it.
pub async fn start_gateway(config: GatewayConfig) -> (SocketAddr, Shutdown) {
    let server = test_server(config);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });
    (addr, shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}
