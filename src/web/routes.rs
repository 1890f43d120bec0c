use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::core::controller::FormController;
use crate::web::handlers::{
    api::{api_not_found, clear_form, download_png, generate, get_state, health_check},
    page::serve_index,
};

/// Shared handle on the one form controller.
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<Mutex<FormController>>,
}

impl AppState {
    pub fn new(controller: FormController) -> Self {
        Self {
            controller: Arc::new(Mutex::new(controller)),
        }
    }
}

pub fn create_routes(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/state", get(get_state))
        .route("/generate", post(generate))
        .route("/clear", post(clear_form))
        .route("/download", get(download_png))
        .fallback(api_not_found)
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .route("/", get(serve_index))
}
