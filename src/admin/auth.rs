//! Bearer authentication for the admin API.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::admin::AdminState;

pub async fn admin_auth_middleware(
    State(state): State<AdminState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match token {
        Some(token) if !state.api_key.is_empty() && token == state.api_key.as_str() => {
            Ok(next.run(request).await)
        }
        _ => {
            tracing::warn!(path = %request.uri().path(), "Rejected admin request");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}
