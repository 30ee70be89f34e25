//! Forwarding to the application upstream.
//!
//! # Responsibilities
//! - Buffer the request body (bounded) so attempts can be replayed
//! - Rewrite the URI onto the upstream authority
//! - Sanitize headers and add X-Forwarded-*
//! - Retry idempotent requests with backoff within the retry budget
//!
//! # Design Decisions
//! - One upstream; load balancing is left to the platform
//! - Network failure after the last attempt is a 502

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::{
    body::{Body, Bytes},
    extract::ConnectInfo,
    http::{
        uri::{Authority, Scheme},
        HeaderValue, Request, StatusCode, Uri, Version,
    },
    response::{IntoResponse, Response},
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use url::Url;

use crate::config::{GatewayConfig, RetryConfig};
use crate::http::request::{request_host, RequestIdExt, X_REQUEST_ID};
use crate::observability::metrics;
use crate::resilience::{calculate_backoff, is_retryable, RetryBudget};
use crate::security::headers::{append_forwarded, strip_hop_by_hop};

/// Errors building the upstream client.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("invalid upstream URL {0:?}")]
    InvalidUrl(String),
}

/// Client for the application upstream.
pub struct Upstream {
    client: Client<HttpConnector, Body>,
    scheme: Scheme,
    authority: Authority,
    retry: RetryConfig,
    budget: RetryBudget,
    max_body_size: usize,
}

impl Upstream {
    pub fn new(config: &GatewayConfig) -> Result<Self, UpstreamError> {
        let invalid = || UpstreamError::InvalidUrl(config.upstream.url.clone());

        let url = Url::parse(&config.upstream.url).map_err(|_| invalid())?;
        let host = url.host_str().ok_or_else(invalid)?;
        let port = url.port_or_known_default().ok_or_else(invalid)?;
        let authority: Authority = format!("{host}:{port}").parse().map_err(|_| invalid())?;

        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(config.timeouts.connect_secs)));
        let client = Client::builder(TokioExecutor::new()).build(connector);

        Ok(Self {
            client,
            scheme: Scheme::HTTP,
            authority,
            retry: config.retries.clone(),
            budget: RetryBudget::new(config.retries.budget_ratio, 10),
            max_body_size: config.security.max_body_size,
        })
    }

    /// Upstream authority as `host:port`.
    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    fn target_uri(&self, uri: &Uri) -> Option<Uri> {
        let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
        Uri::builder()
            .scheme(self.scheme.clone())
            .authority(self.authority.clone())
            .path_and_query(path_and_query)
            .build()
            .ok()
    }

    fn build_attempt(&self, parts: &axum::http::request::Parts, uri: &Uri, body: &Bytes) -> Request<Body> {
        let mut req = Request::new(Body::from(body.clone()));
        *req.method_mut() = parts.method.clone();
        *req.uri_mut() = uri.clone();
        *req.version_mut() = Version::HTTP_11;
        *req.headers_mut() = parts.headers.clone();
        req
    }

    /// Forward `request` and relay the upstream response.
    pub async fn forward(&self, request: Request<Body>) -> Response {
        let start = Instant::now();
        let request_id = request.request_id().to_string();
        let host = request_host(&request).to_string();
        let client_ip = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());

        let (mut parts, body) = request.into_parts();
        let method = parts.method.clone();

        let body = match axum::body::to_bytes(body, self.max_body_size).await {
            Ok(bytes) => bytes,
            Err(_) => {
                return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
            }
        };

        let Some(uri) = self.target_uri(&parts.uri) else {
            return (StatusCode::BAD_REQUEST, "Invalid request URI").into_response();
        };

        strip_hop_by_hop(&mut parts.headers);
        append_forwarded(&mut parts.headers, client_ip, &host, "http");
        if let Ok(value) = HeaderValue::from_str(&request_id) {
            parts.headers.insert(X_REQUEST_ID, value);
        }

        tracing::debug!(request_id = %request_id, method = %method, uri = %uri, "Forwarding to upstream");

        self.budget.record_request();
        let max_attempts = if self.retry.enabled && method.is_idempotent() {
            self.retry.max_attempts.max(1)
        } else {
            1
        };

        let mut attempts = 0;
        loop {
            attempts += 1;
            let req = self.build_attempt(&parts, &uri, &body);

            match self.client.request(req).await {
                Ok(response) => {
                    let status = response.status();

                    if attempts < max_attempts
                        && is_retryable(&method, Some(status), false)
                        && self.budget.can_retry()
                    {
                        let delay = calculate_backoff(attempts, self.retry.base_delay_ms, self.retry.max_delay_ms);
                        tracing::info!(request_id = %request_id, attempt = attempts, delay = ?delay, status = %status, "Retrying request");
                        metrics::record_upstream_retry();
                        tokio::time::sleep(delay).await;
                        continue;
                    }

                    metrics::record_upstream(method.as_str(), status.as_u16(), start);

                    let (mut parts, body) = response.into_parts();
                    strip_hop_by_hop(&mut parts.headers);
                    return Response::from_parts(parts, Body::new(body));
                }
                Err(e) => {
                    tracing::error!(request_id = %request_id, attempt = attempts, error = %e, "Upstream error");

                    if attempts < max_attempts
                        && is_retryable(&method, None, true)
                        && self.budget.can_retry()
                    {
                        let delay = calculate_backoff(attempts, self.retry.base_delay_ms, self.retry.max_delay_ms);
                        tracing::info!(request_id = %request_id, attempt = attempts, delay = ?delay, "Retrying after network error");
                        metrics::record_upstream_retry();
                        tokio::time::sleep(delay).await;
                        continue;
                    }

                    metrics::record_upstream(method.as_str(), 502, start);
                    return (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response();
                }
            }
        }
    }
}
