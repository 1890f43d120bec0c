use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use tracing::{info, warn};

use crate::core::models::{FormInput, FormView};
use crate::render::download::DOWNLOAD_CONTENT_DISPOSITION;
use crate::web::routes::AppState;

pub async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "service": "qrlink"
    }))
}

pub async fn get_state(State(state): State<AppState>) -> Json<FormView> {
    Json(state.controller.lock().await.view())
}

/// Apply the submitted form and run a generate.
///
/// The controller lock is released while the renderer works and the PNG is
/// encoded, so another submit can start in the meantime; whichever started
/// last decides the final state.
pub async fn generate(
    State(state): State<AppState>,
    Json(input): Json<FormInput>,
) -> Json<FormView> {
    let pending = {
        let mut controller = state.controller.lock().await;
        controller.apply(&input);
        controller.begin_generate()
    };

    if let Some(pending) = pending {
        info!("Rendering QR code for {}", pending.options().text);
        let ticket = pending.wait().await;
        state.controller.lock().await.finish_generate(ticket);
    }

    Json(state.controller.lock().await.view())
}

pub async fn clear_form(State(state): State<AppState>) -> Json<FormView> {
    let mut controller = state.controller.lock().await;
    controller.clear();
    Json(controller.view())
}

pub async fn download_png(State(state): State<AppState>) -> impl IntoResponse {
    let controller = state.controller.lock().await;
    match controller.download() {
        Some(artifact) => {
            info!("QR code downloaded ({} bytes)", artifact.bytes.len());
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "image/png"),
                    (header::CONTENT_DISPOSITION, DOWNLOAD_CONTENT_DISPOSITION),
                ],
                artifact.bytes.clone(),
            )
                .into_response()
        }
        None => {
            warn!("Download requested before a QR code was ready");
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "No QR code has been generated yet" })),
            )
                .into_response()
        }
    }
}

/// Handle 404 errors for API routes
pub async fn api_not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({
        "error": "API endpoint not found"
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::RenderConfig;
    use crate::core::controller::{FormController, READY_MESSAGE};
    use crate::core::models::{MessageTone, PreviewStatus};

    fn create_test_state() -> AppState {
        AppState::new(FormController::with_default_renderer(&RenderConfig::default()))
    }

    fn input(url: &str) -> FormInput {
        FormInput {
            url: Some(url.to_string()),
            ..FormInput::default()
        }
    }

    #[tokio::test]
    async fn test_health_check() {
        let Json(health_data) = health_check().await;

        assert_eq!(health_data["status"], "healthy");
        assert_eq!(health_data["service"], "qrlink");
        assert_eq!(health_data["version"], env!("CARGO_PKG_VERSION"));
        assert!(health_data["timestamp"].is_string());
    }

    #[test]
    fn test_health_check_response_format() {
        tokio_test::block_on(async {
            let Json(data) = health_check().await;

            for field in ["status", "timestamp", "version", "service"] {
                assert!(data[field].is_string(), "{} should be a string", field);
            }
        });
    }

    #[tokio::test]
    async fn test_initial_state() {
        let Json(view) = get_state(State(create_test_state())).await;

        assert_eq!(view.url, "");
        assert_eq!(view.size, 256);
        assert_eq!(view.status, PreviewStatus::Empty);
        assert!(view.message.is_none());
        assert!(!view.download_ready);
    }

    #[tokio::test]
    async fn test_generate_then_download() {
        let state = create_test_state();
        let Json(view) = generate(State(state.clone()), Json(input("example.com"))).await;

        assert_eq!(view.status, PreviewStatus::Ready);
        assert_eq!(view.message.unwrap().text, READY_MESSAGE);
        assert!(view.download_ready);
        assert!(view.preview_data_url.unwrap().starts_with("data:image/png;base64,"));

        let response = download_png(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    }

    #[tokio::test]
    async fn test_generate_invalid_url_reports_error() {
        let Json(view) = generate(State(create_test_state()), Json(input(""))).await;

        assert_eq!(view.status, PreviewStatus::Failed);
        assert_eq!(view.message.unwrap().tone, MessageTone::Error);
        assert!(!view.download_ready);
    }

    #[tokio::test]
    async fn test_download_before_generate_is_not_found() {
        let response = download_png(State(create_test_state())).await.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_clear_resets_form() {
        let state = create_test_state();
        generate(State(state.clone()), Json(input("example.com"))).await;

        let Json(view) = clear_form(State(state)).await;
        assert_eq!(view.url, "");
        assert!(view.message.is_none());
        assert!(!view.download_ready);
        assert!(view.preview_data_url.is_none());
        assert_eq!(view.status, PreviewStatus::Empty);
    }
}
