//! End-to-end routing through the composed app.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use http_body_util::BodyExt;
use tower::ServiceExt;

mod common;

async fn app() -> Router {
    let upstream = common::start_echo_backend().await;
    common::test_server(common::test_config(upstream)).app()
}

async fn get(app: &Router, host: &str, uri: &str) -> Response {
    let req = Request::builder()
        .uri(uri)
        .header(header::HOST, host)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(req).await.unwrap()
}

async fn text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn echoed(response: Response) -> serde_json::Value {
    serde_json::from_str(&text(response).await).unwrap()
}

#[tokio::test]
async fn test_tenant_landing_page() {
    let app = app().await;
    let res = get(&app, "shop.example.com", "/").await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(text(res).await, "<h1>Home</h1>");

    let res = get(&app, "SHOP.example.com:8080", "/").await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_tenant_named_page() {
    let app = app().await;
    let res = get(&app, "shop.example.com", "/offer").await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(text(res).await, "<h1>Offer</h1>");

    let res = get(&app, "shop.example.com", "/offer?utm=ad").await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_tenant_misses_are_not_found() {
    let app = app().await;
    assert_eq!(get(&app, "nobody.example.com", "/").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(get(&app, "draft.example.com", "/").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(get(&app, "shop.example.com", "/missing").await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_tenant_content_is_read_only() {
    let app = app().await;
    let req = Request::builder()
        .method("POST")
        .uri("/")
        .header(header::HOST, "shop.example.com")
        .body(Body::empty())
        .unwrap();
    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_auth_entry_points_redirect() {
    let app = app().await;
    for (host, path) in [
        ("example.com", "/sign-in"),
        ("example.com", "/sign-up"),
        ("shop.example.com", "/sign-in"),
    ] {
        let res = get(&app, host, path).await;
        assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT, "{host}{path}");
        assert_eq!(res.headers()[header::LOCATION], "/agency/sign-in");
    }
}

#[tokio::test]
async fn test_marketing_root_reaches_upstream_site() {
    let app = app().await;
    let res = get(&app, "example.com", "/").await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = echoed(res).await;
    assert_eq!(body["path"], "/site");
    assert_eq!(body["forwarded_host"], "example.com");
}

#[tokio::test]
async fn test_marketing_root_without_site_platform_route() {
    let upstream = common::start_echo_backend().await;
    let mut config = common::test_config(upstream);
    config.upstream.platform_routes = vec!["/agency".into(), "/api".into()];
    let app = common::test_server(config).app();

    let res = get(&app, "example.com", "/").await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(echoed(res).await["path"], "/site");
}

#[tokio::test]
async fn test_skip_list_on_tenant_host_reaches_upstream() {
    let app = app().await;
    let res = get(&app, "shop.example.com", "/api/orders?page=2").await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = echoed(res).await;
    assert_eq!(body["path"], "/api/orders");
    assert_eq!(body["query"], "page=2");
    assert_eq!(body["forwarded_host"], "shop.example.com");
}

#[tokio::test]
async fn test_platform_paths_reach_upstream() {
    let app = app().await;
    for path in ["/agency", "/agency/settings", "/subaccount/42/funnels", "/pricing"] {
        let res = get(&app, "example.com", path).await;
        assert_eq!(res.status(), StatusCode::OK, "{path}");
        assert_eq!(echoed(res).await["path"], path);
    }
}

#[tokio::test]
async fn test_tenant_path_on_base_domain() {
    let app = app().await;
    let res = get(&app, "example.com", "/shop/offer").await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(text(res).await, "<h1>Offer</h1>");
}

#[tokio::test]
async fn test_request_id_generated_and_propagated() {
    let app = app().await;
    let res = get(&app, "example.com", "/pricing").await;
    let id = res.headers()["x-request-id"].to_str().unwrap().to_string();
    assert!(!id.is_empty());
    assert_eq!(echoed(res).await["request_id"], id.as_str());

    let req = Request::builder()
        .uri("/pricing")
        .header(header::HOST, "example.com")
        .header("x-request-id", "client-supplied")
        .body(Body::empty())
        .unwrap();
    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.headers()["x-request-id"], "client-supplied");
}

#[tokio::test]
async fn test_no_base_domain_passes_everything_through() {
    let upstream = common::start_echo_backend().await;
    let mut config = common::test_config(upstream);
    config.routing.base_domain = String::new();
    let app = common::test_server(config).app();

    let res = get(&app, "shop.example.com", "/offer").await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(echoed(res).await["path"], "/offer");
}
