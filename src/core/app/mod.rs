use anyhow::Result;
use std::net::SocketAddr;
use std::path::Path;
use tokio::signal;
use tracing::{error, info, warn};

use crate::core::config::AppConfig;
use crate::core::controller::FormController;
use crate::core::error::{AppError, AppResult, FormError};
use crate::core::models::FormInput;
use crate::utils::network::{available_port_or_default, parse_host, server_url};
use crate::utils::qrcode::render_terminal_qr;
use crate::web::routes::AppState;
use crate::web::server::WebServer;

pub struct App {
    config: AppConfig,
    prefill: FormInput,
}

/// What a one-shot export produced.
#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub url: String,
    pub size: u32,
    pub bytes_written: usize,
}

impl App {
    pub fn new(config: AppConfig, prefill: FormInput) -> Self {
        Self { config, prefill }
    }

    /// Controller with the prefilled fields applied.
    pub fn build_controller(&self) -> FormController {
        let mut controller = FormController::with_default_renderer(&self.config.render);
        controller.apply(&self.prefill);
        controller
    }

    pub async fn run(&self) -> Result<()> {
        let mut controller = self.build_controller();

        // A prefilled URL is rendered straight away.
        if !controller.state().raw_url_text.is_empty() && !controller.generate().await {
            if let Some(message) = controller.message().filter(|m| m.is_error()) {
                warn!("Prefilled URL could not be rendered: {}", message.text);
            }
        }

        let host = parse_host(&self.config.server.host);
        let port = available_port_or_default(host, self.config.server.port);
        let url = server_url(host, port);
        info!("Web interface available at: {}", url);

        if self.config.ui.terminal_qr {
            match render_terminal_qr(&url, "Scan this QR code to open qrlink:") {
                Ok(qr_code) => println!("{}", qr_code),
                Err(e) => error!("Failed to generate QR code: {}", e),
            }
        }

        if self.config.ui.open_browser {
            if let Err(e) = open::that(&url) {
                error!("Failed to open browser: {}", e);
            }
        }

        let server = WebServer::new(SocketAddr::new(host, port), AppState::new(controller));
        if let Err(e) = server.run(shutdown_signal()).await {
            error!("Server error: {}", e);
            return Err(e);
        }

        info!("Shutdown complete");
        Ok(())
    }

    /// Render the prefilled form once and write the PNG to `output`.
    pub async fn export(&self, output: &Path) -> AppResult<ExportSummary> {
        let mut controller = self.build_controller();
        if !controller.generate().await {
            let err = controller
                .last_error()
                .cloned()
                .unwrap_or(FormError::RenderFailure);
            return Err(AppError::Render(err));
        }

        let artifact = controller
            .download()
            .ok_or(AppError::Render(FormError::DownloadPreparationFailure))?;
        std::fs::write(output, &artifact.bytes)?;
        info!("Wrote {} bytes to {:?}", artifact.bytes.len(), output);

        Ok(ExportSummary {
            url: crate::core::link::normalize_url(&controller.state().raw_url_text),
            size: controller.state().size,
            bytes_written: artifact.bytes.len(),
        })
    }
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down gracefully..."),
        Err(e) => {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
