//! qrlink - turn website URLs into downloadable QR codes
//!
//! This crate serves a small web form that normalizes and validates a URL,
//! renders it as a QR code and offers the result as a PNG download.

pub mod core;
pub mod render;
pub mod utils;
pub mod web;
pub mod cli;

// Re-export commonly used types for convenience
pub use crate::core::{
    config::AppConfig,
    controller::{FormController, PendingRender, RenderTicket},
    error::{AppError, AppResult, FormError},
    link::{is_valid_url, normalize_url},
    models::{clamp_size, Color, FormInput, FormState, FormView, PreviewStatus, RenderOptions},
};

pub use render::{DownloadArtifact, PreviewContainer, QrCodeRenderer, QrRenderer};

pub use web::{
    routes::{create_routes, AppState},
    server::WebServer,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
