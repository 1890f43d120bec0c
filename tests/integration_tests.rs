use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use qrlink::core::config::RenderConfig;
use qrlink::core::models::{FormView, MessageTone, PreviewStatus};
use qrlink::{create_routes, AppState, Color, FormController};
use serde_json::{json, Value};
use tower::util::ServiceExt;
use tower_http::cors::{Any, CorsLayer};

// Helper function to create test app
fn create_test_app() -> Router {
    let controller = FormController::with_default_renderer(&RenderConfig::default());

    // Add CORS layer like in the actual server
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    create_routes(AppState::new(controller)).layer(cors)
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_bytes(response).await)
}

async fn get(app: &Router, uri: &str) -> axum::response::Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.clone().oneshot(request).await.unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();
    let response = get(&app, "/api/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let health_data: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(health_data["status"], "healthy");
    assert_eq!(health_data["service"], "qrlink");
    assert!(health_data["timestamp"].is_string());
    assert!(health_data["version"].is_string());
}

#[tokio::test]
async fn test_index_page_is_served() {
    let app = create_test_app();
    let response = get(&app, "/").await;

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));

    let body = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(body.contains("id=\"qrForm\""));
}

#[tokio::test]
async fn test_generate_scenario_transparent_background() {
    let app = create_test_app();

    let (status, body) = post_json(
        &app,
        "/api/generate",
        json!({ "url": "example.com", "size": 300, "background_enabled": false }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let view: FormView = serde_json::from_slice(&body).unwrap();
    assert_eq!(view.url, "example.com");
    assert_eq!(view.size, 300);
    assert_eq!(view.range_value, 300);
    assert!(!view.background_enabled);
    assert!(!view.background_picker_enabled);
    assert_eq!(view.status, PreviewStatus::Ready);
    assert!(view.download_ready);
    let message = view.message.unwrap();
    assert_eq!(message.tone, MessageTone::Info);
    assert_eq!(message.text, "QR code ready. You can download the PNG.");

    let response = get(&app, "/api/download").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"qrcode.png\""
    );

    let png = image::load_from_memory(&body_bytes(response).await).unwrap().to_rgba8();
    assert_eq!(png.dimensions(), (300, 300));
    // Light modules are fully transparent when the background is off.
    assert!(png.pixels().any(|p| p[3] == 0));
    assert_eq!(png.get_pixel(0, 0)[3], 255);
}

#[tokio::test]
async fn test_generate_with_colors() {
    let app = create_test_app();

    let (_, body) = post_json(
        &app,
        "/api/generate",
        json!({
            "url": "https://example.com",
            "size": "128",
            "foreground": "#ff0000",
            "background_enabled": true,
            "background": "#00ff00"
        }),
    )
    .await;
    let view: FormView = serde_json::from_slice(&body).unwrap();
    assert_eq!(view.foreground, Color::rgb(255, 0, 0));
    assert_eq!(view.background, Color::rgb(0, 255, 0));

    let response = get(&app, "/api/download").await;
    let png = image::load_from_memory(&body_bytes(response).await).unwrap().to_rgba8();
    assert_eq!(png.get_pixel(0, 0).0, [255, 0, 0, 255]);
    assert!(png.pixels().any(|p| p.0 == [0, 255, 0, 255]));
}

#[tokio::test]
async fn test_generate_blank_url_scenario() {
    let app = create_test_app();

    let (status, body) = post_json(&app, "/api/generate", json!({ "url": "   " })).await;
    assert_eq!(status, StatusCode::OK);

    let view: FormView = serde_json::from_slice(&body).unwrap();
    assert_eq!(view.status, PreviewStatus::Failed);
    let message = view.message.unwrap();
    assert_eq!(message.tone, MessageTone::Error);
    assert!(message.text.contains("valid website URL"));
    assert!(view.preview_data_url.is_none());
    assert!(!view.download_ready);

    let response = get(&app, "/api/download").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_scheme_relative_url_is_rejected() {
    let app = create_test_app();

    let (_, body) = post_json(
        &app,
        "/api/generate",
        json!({ "url": "//cdn.example.com", "size": "inf" }),
    )
    .await;

    let view: FormView = serde_json::from_slice(&body).unwrap();
    assert_eq!(view.status, PreviewStatus::Failed);
    assert_eq!(view.url, "//cdn.example.com");
    assert_eq!(view.size, 256);
    assert!(view.message.unwrap().text.contains("valid website URL"));
}

#[tokio::test]
async fn test_clear_after_success_scenario() {
    let app = create_test_app();
    post_json(&app, "/api/generate", json!({ "url": "example.com" })).await;

    let (status, body) = post_json(&app, "/api/clear", json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let view: FormView = serde_json::from_slice(&body).unwrap();
    assert_eq!(view.url, "");
    assert!(view.message.is_none());
    assert!(view.preview_data_url.is_none());
    assert!(!view.download_ready);
    assert_eq!(view.status, PreviewStatus::Empty);

    let response = get(&app, "/api/download").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_state_reflects_last_generate() {
    let app = create_test_app();
    post_json(&app, "/api/generate", json!({ "url": "example.com", "size": "abc" })).await;

    let response = get(&app, "/api/state").await;
    let view: FormView = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(view.size, 256);
    assert_eq!(view.status, PreviewStatus::Ready);
    assert_eq!(view.generation, 1);
}

#[tokio::test]
async fn test_failed_generate_keeps_form_usable() {
    let app = create_test_app();

    // Too much data for a QR code at the highest correction level.
    let long_url = format!("example.com/{}", "a".repeat(3000));
    let (_, body) = post_json(&app, "/api/generate", json!({ "url": long_url })).await;
    let view: FormView = serde_json::from_slice(&body).unwrap();
    assert_eq!(view.status, PreviewStatus::Failed);
    assert!(view.message.unwrap().text.contains("Failed to render"));

    let (_, body) = post_json(&app, "/api/generate", json!({ "url": "example.com" })).await;
    let view: FormView = serde_json::from_slice(&body).unwrap();
    assert_eq!(view.status, PreviewStatus::Ready);
}

#[tokio::test]
async fn test_malformed_body_is_rejected() {
    let app = create_test_app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/generate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert!(response.status().is_client_error());

    // Nothing changed.
    let response = get(&app, "/api/state").await;
    let view: FormView = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(view.status, PreviewStatus::Empty);
}

#[tokio::test]
async fn test_unknown_api_route() {
    let app = create_test_app();
    let response = get(&app, "/api/does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["error"], "API endpoint not found");
}
