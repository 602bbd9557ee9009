mod helpers;

use axum::http::StatusCode;
use helpers::setup_test_app;
use serde_json::Value;

#[tokio::test]
async fn test_health_check() {
    let app = setup_test_app().await;

    let response = app.client().get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "healthy");
}

#[tokio::test]
async fn test_openapi_spec_is_served() {
    let app = setup_test_app().await;

    let response = app.client().get("/api-docs/openapi.json").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert!(body["paths"]["/api/v0/images"].is_object());
    assert!(body["paths"]["/api/v0/images/{id}/file"].is_object());
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = setup_test_app().await;
    let response = app.client().get("/api/v0/unknown").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}
