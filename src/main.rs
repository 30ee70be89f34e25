//! Tenant gateway binary.
//!
//! Loads configuration, installs logging and metrics, then serves the
//! gateway (and optionally the admin API) until SIGINT or SIGTERM.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use tenant_gateway::admin::{serve_admin, AdminState};
use tenant_gateway::config::{load_config, GatewayConfig};
use tenant_gateway::http::HttpServer;
use tenant_gateway::lifecycle::{shutdown_signal, Shutdown};
use tenant_gateway::observability::{logging, metrics};
use tenant_gateway::tenants::{InMemoryDirectory, TenantDirectory};

#[derive(Parser)]
#[command(name = "tenant-gateway")]
#[command(about = "Host-based routing gateway for multi-tenant sites", long_about = None)]
struct Args {
    /// Path to the TOML configuration file. Defaults plus environment when omitted.
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::from_env()?,
    };

    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "tenant-gateway starting");

    if !config.routing.tenant_routing_enabled() {
        tracing::warn!("No base domain configured; tenant routing is disabled");
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(e) => {
                tracing::error!(
                    metrics_address = %config.observability.metrics_address,
                    error = %e,
                    "Failed to parse metrics address"
                );
            }
        }
    }

    let directory = Arc::new(InMemoryDirectory::from_config(&config)?);
    tracing::info!(tenants = directory.len(), "Tenant directory ready");

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(config.clone(), directory.clone())?;

    let shutdown = Shutdown::new();
    let mut tasks = tokio::task::JoinSet::new();

    if config.admin.enabled {
        let admin_listener = TcpListener::bind(&config.admin.bind_address).await?;
        let state = AdminState {
            app: server.state().clone(),
            api_key: config.admin.api_key.clone(),
            platform_routes: config.upstream.platform_routes.clone(),
        };
        tasks.spawn(serve_admin(admin_listener, state, shutdown.subscribe()));
    }
    tasks.spawn(server.run(listener, shutdown.subscribe()));

    tokio::select! {
        _ = shutdown_signal() => {}
        Some(result) = tasks.join_next() => {
            tracing::error!(result = ?result, "Listener exited unexpectedly");
        }
    }

    shutdown.trigger();
    while let Some(result) = tasks.join_next().await {
        if let Ok(Err(e)) = result {
            tracing::error!(error = %e, "Listener failed during shutdown");
        }
    }

    if let Err(e) = directory.persist() {
        tracing::error!(error = %e, "Failed to persist tenant directory");
    }
    tracing::info!("tenant-gateway stopped");
    Ok(())
}
