//! Stand-in for the platform application behind the gateway.
//!
//! Run with `cargo run --example mock_app`, then start the gateway with
//! `UPSTREAM_URL=http://127.0.0.1:3000`.

use axum::{body::Body, http::Request, routing::get, Router};
use std::net::SocketAddr;

async fn describe(request: Request<Body>) -> String {
    let forwarded_host = request
        .headers()
        .get("x-forwarded-host")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");
    format!(
        "platform app: {} {} (host {})\n",
        request.method(),
        request.uri(),
        forwarded_host
    )
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let app = Router::new()
        .route("/site", get(|| async { "Marketing site\n" }))
        .route("/agency/sign-in", get(|| async { "Sign in\n" }))
        .fallback(describe);

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    println!("Platform app listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
