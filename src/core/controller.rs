use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::core::config::RenderConfig;
use crate::core::error::FormError;
use crate::core::link::{is_valid_url, normalize_url};
use crate::core::models::{
    clamp_range, clamp_size, clamp_size_value, Color, CorrectLevel, FormInput, FormState,
    FormView, PreviewElement, PreviewStatus, RenderOptions, StatusMessage,
};
use crate::render::{
    CompletionOutcome, DownloadArtifact, PreviewContainer, QrCodeRenderer, QrRenderer,
    RenderCompletion,
};

pub const READY_MESSAGE: &str = "QR code ready. You can download the PNG.";

/// A render that has been handed to the renderer but not yet collected.
#[derive(Debug)]
pub struct PendingRender {
    generation: u64,
    options: RenderOptions,
    completion: RenderCompletion,
    container: PreviewContainer,
    timeout: Duration,
}

impl PendingRender {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Wait for the renderer's completion signal, at most the configured
    /// timeout, then encode whatever it mounted on the blocking pool.
    pub async fn wait(self) -> RenderTicket {
        let outcome = self.completion.wait(self.timeout).await;
        let download = match self.container.element_for(self.generation) {
            Some(element) => Some(prepare_download(element).await),
            None => None,
        };
        RenderTicket {
            generation: self.generation,
            outcome,
            download,
        }
    }
}

async fn prepare_download(element: PreviewElement) -> Result<DownloadArtifact, FormError> {
    match tokio::task::spawn_blocking(move || DownloadArtifact::from_element(&element)).await {
        Ok(result) => result,
        Err(e) => {
            error!("Download preparation task failed: {}", e);
            Err(FormError::DownloadPreparationFailure)
        }
    }
}

/// Proof that a pending render has finished waiting, one way or another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTicket {
    pub generation: u64,
    pub outcome: CompletionOutcome,
    /// `None` when nothing was mounted for this generation by the end of the wait.
    pub download: Option<Result<DownloadArtifact, FormError>>,
}

/// Owns the form, drives validation and rendering, and holds the result.
///
/// Every generate attempt and every clear bumps the generation counter.
/// Tickets from older generations are ignored by [`finish_generate`], so when
/// two generates overlap the most recent one always decides the final state.
///
/// [`finish_generate`]: FormController::finish_generate
pub struct FormController {
    state: FormState,
    status: PreviewStatus,
    message: Option<StatusMessage>,
    last_error: Option<FormError>,
    container: PreviewContainer,
    download: Option<DownloadArtifact>,
    generation: u64,
    renderer: Option<Arc<dyn QrRenderer>>,
    render_timeout: Duration,
}

impl FormController {
    pub fn new(config: &RenderConfig, renderer: Option<Arc<dyn QrRenderer>>) -> Self {
        let size = clamp_size_value(f64::from(config.default_size));
        let state = FormState {
            raw_url_text: String::new(),
            size,
            range_value: clamp_range(size),
            foreground: Color::from_picker(&config.foreground, Color::BLACK),
            background_enabled: config.background_enabled,
            background: Color::from_picker(&config.background, Color::WHITE),
        };

        Self {
            state,
            status: PreviewStatus::Empty,
            message: None,
            last_error: None,
            container: PreviewContainer::new(),
            download: None,
            generation: 0,
            renderer,
            render_timeout: Duration::from_millis(config.timeout_ms),
        }
    }

    /// Controller backed by the `qrcode` renderer using the configured surface.
    pub fn with_default_renderer(config: &RenderConfig) -> Self {
        let renderer: Arc<dyn QrRenderer> = Arc::new(QrCodeRenderer::new(config.surface));
        Self::new(config, Some(renderer))
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn status(&self) -> PreviewStatus {
        self.status
    }

    pub fn message(&self) -> Option<&StatusMessage> {
        self.message.as_ref()
    }

    /// Why the latest generate failed, if it did.
    pub fn last_error(&self) -> Option<&FormError> {
        self.last_error.as_ref()
    }

    pub fn download(&self) -> Option<&DownloadArtifact> {
        self.download.as_ref()
    }

    pub fn preview(&self) -> Option<PreviewElement> {
        self.container.element()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn renderer_name(&self) -> Option<&str> {
        self.renderer.as_deref().map(|r| r.name())
    }

    pub fn set_url(&mut self, text: impl Into<String>) {
        self.state.raw_url_text = text.into();
    }

    /// Numeric size field changed; the slider follows within its own range.
    pub fn set_size_from_number(&mut self, text: &str) {
        let size = clamp_size(text);
        self.state.size = size;
        self.state.range_value = clamp_range(size);
    }

    /// Slider moved; the numeric field takes its value.
    pub fn set_size_from_range(&mut self, value: u32) {
        let value = clamp_range(value);
        self.state.range_value = value;
        self.state.size = value;
    }

    pub fn set_foreground(&mut self, text: &str) {
        self.state.foreground = Color::from_picker(text, Color::BLACK);
    }

    pub fn set_background(&mut self, text: &str) {
        self.state.background = Color::from_picker(text, Color::WHITE);
    }

    pub fn set_background_enabled(&mut self, enabled: bool) {
        self.state.background_enabled = enabled;
    }

    /// Apply a submitted form. The numeric size wins over the slider when both are present.
    pub fn apply(&mut self, input: &FormInput) {
        if let Some(url) = &input.url {
            self.set_url(url.clone());
        }
        if let Some(range) = input.range {
            self.set_size_from_range(range);
        }
        if let Some(size) = &input.size {
            self.set_size_from_number(size);
        }
        if let Some(foreground) = &input.foreground {
            self.set_foreground(foreground);
        }
        if let Some(enabled) = input.background_enabled {
            self.set_background_enabled(enabled);
        }
        if let Some(background) = &input.background {
            self.set_background(background);
        }
    }

    /// Options the renderer would be called with for `text` right now.
    pub fn render_options(&self, text: String) -> RenderOptions {
        let size = clamp_size_value(f64::from(self.state.size));
        RenderOptions {
            text,
            width: size,
            height: size,
            color_dark: self.state.foreground,
            color_light: self.state.effective_background(),
            correct_level: CorrectLevel::H,
        }
    }

    /// Validate the form and hand it to the renderer.
    ///
    /// Returns `None` when the attempt already failed; the error has been
    /// reported through the status message.
    pub fn begin_generate(&mut self) -> Option<PendingRender> {
        self.generation += 1;
        self.clear_preview();
        self.message = None;
        self.last_error = None;
        self.status = PreviewStatus::Validating;

        let normalized = normalize_url(&self.state.raw_url_text);
        if normalized.is_empty() || !is_valid_url(&normalized) {
            self.fail(FormError::InvalidUrl);
            return None;
        }

        let Some(renderer) = self.renderer.clone() else {
            self.fail(FormError::DependencyUnavailable);
            return None;
        };

        let options = self.render_options(normalized);
        self.status = PreviewStatus::Rendering;

        match renderer.render(self.container.target(self.generation), &options) {
            Ok(completion) => Some(PendingRender {
                generation: self.generation,
                options,
                completion,
                container: self.container.clone(),
                timeout: self.render_timeout,
            }),
            Err(e) => {
                error!("Renderer {} failed for {}: {}", renderer.name(), options.text, e);
                self.fail(FormError::RenderFailure);
                None
            }
        }
    }

    /// Collect the result of a render once its ticket is in.
    ///
    /// Tickets from superseded generations are dropped and leave the state alone.
    pub fn finish_generate(&mut self, ticket: RenderTicket) -> bool {
        if ticket.generation != self.generation {
            warn!(
                "Ignoring stale render for generation {} (current {})",
                ticket.generation, self.generation
            );
            return false;
        }

        match ticket.outcome {
            CompletionOutcome::Completed => {}
            CompletionOutcome::TimedOut => warn!(
                "Renderer did not signal completion within {:?}",
                self.render_timeout
            ),
            CompletionOutcome::Abandoned => warn!("Renderer dropped its completion signal"),
        }

        let Some(prepared) = ticket.download else {
            // Nothing was drawn in time; whatever this attempt mounts later is refused.
            self.generation += 1;
            self.fail(FormError::RenderFailure);
            return false;
        };

        match prepared {
            Ok(artifact) => {
                info!(
                    "QR code ready ({} bytes PNG, generation {})",
                    artifact.bytes.len(),
                    self.generation
                );
                self.download = Some(artifact);
                self.status = PreviewStatus::Ready;
                self.message = Some(StatusMessage::info(READY_MESSAGE));
                true
            }
            Err(e) => {
                self.fail(e);
                false
            }
        }
    }

    /// Validate, render and prepare the download in one go.
    pub async fn generate(&mut self) -> bool {
        match self.begin_generate() {
            Some(pending) => {
                let ticket = pending.wait().await;
                self.finish_generate(ticket)
            }
            None => false,
        }
    }

    /// Reset the URL, the message and the preview.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.state.raw_url_text.clear();
        self.message = None;
        self.last_error = None;
        self.clear_preview();
        self.status = PreviewStatus::Empty;
    }

    pub fn view(&self) -> FormView {
        FormView {
            url: self.state.raw_url_text.clone(),
            size: self.state.size,
            range_value: self.state.range_value,
            foreground: self.state.foreground,
            background_enabled: self.state.background_enabled,
            background: self.state.background,
            background_picker_enabled: self.state.background_picker_enabled(),
            status: self.status,
            message: self.message.clone(),
            download_ready: self.download.is_some(),
            preview_data_url: self
                .download
                .as_ref()
                .map(|d| d.data_url.clone())
                .or_else(|| self.container.image_src()),
            generation: self.generation,
        }
    }

    fn clear_preview(&mut self) {
        self.container.reset(self.generation);
        self.download = None;
    }

    fn fail(&mut self, err: FormError) {
        warn!("Generate failed: {}", err);
        if err != FormError::DownloadPreparationFailure {
            self.clear_preview();
        }
        self.download = None;
        self.status = PreviewStatus::Failed;
        self.message = Some(StatusMessage::error(err.to_string()));
        self.last_error = Some(err);
    }
}
