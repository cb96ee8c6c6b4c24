mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn test_health_check_at_root_and_prefix() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));

    let (status, body) = app.get_raw("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_slice::<serde_json::Value>(&body).unwrap()["status"], "ok");
}

#[tokio::test]
async fn test_custom_prefix_is_honoured() {
    let app = TestApp::with_config(|config| config.api_prefix = "/api/v2".to_string()).await;

    let (status, _) = app.get("/jobs", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get_raw("/api/v1/jobs").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = TestApp::new().await;

    let (status, body) = app.get_raw("/api-doc/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    let doc: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(doc["paths"]["/candidate/applications"].is_object());
    assert!(doc["components"]["securitySchemes"]["bearer"].is_object());
    assert_eq!(doc["servers"][0]["url"], "/api/v1");
}

#[tokio::test]
async fn test_malformed_json_is_a_validation_error() {
    let app = TestApp::new().await;

    let request = Request::builder()
        .method("POST")
        .uri(app.api("/auth/login"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"email\": "))
        .unwrap();
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_cors_allows_configured_origin() {
    let app = TestApp::with_config(|config| {
        config.allowed_origins = vec!["http://app.example.com".to_string()];
    })
    .await;

    let request = Request::builder()
        .method("OPTIONS")
        .uri(app.api("/jobs"))
        .header(header::ORIGIN, "http://app.example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .body(Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app.router.clone(), request).await.unwrap();

    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://app.example.com"
    );
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
        "true"
    );
}
