//! The QR render capability and the pieces it draws into.
//!
//! A renderer receives a [`MountTarget`] and a set of [`RenderOptions`]. It
//! builds the QR matrix up front (so unencodable input fails immediately),
//! draws the element in the background and signals completion through the
//! returned [`RenderCompletion`].

pub mod container;
pub mod download;

use image::RgbaImage;
use qrcode::{EcLevel, QrCode};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::{debug, error};

pub use container::{MountTarget, PreviewContainer};
pub use download::{DownloadArtifact, DOWNLOAD_FILE_NAME};

use crate::core::models::{CorrectLevel, PreviewElement, RenderOptions, SurfaceKind};

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("QR encoding failed: {0}")]
    Encode(#[from] qrcode::types::QrError),

    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Something that can draw a QR code into the preview container.
pub trait QrRenderer: Send + Sync {
    fn name(&self) -> &str;

    fn render(
        &self,
        target: MountTarget,
        options: &RenderOptions,
    ) -> Result<RenderCompletion, RenderError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    Completed,
    TimedOut,
    /// The renderer went away without signalling.
    Abandoned,
}

/// Receiving half of a renderer's "done drawing" signal.
#[derive(Debug)]
pub struct RenderCompletion {
    rx: oneshot::Receiver<()>,
}

#[derive(Debug)]
pub struct CompletionSignal {
    tx: oneshot::Sender<()>,
}

impl CompletionSignal {
    pub fn complete(self) {
        // Receiver may already have timed out.
        let _ = self.tx.send(());
    }
}

impl RenderCompletion {
    pub fn channel() -> (CompletionSignal, RenderCompletion) {
        let (tx, rx) = oneshot::channel();
        (CompletionSignal { tx }, RenderCompletion { rx })
    }

    /// A completion that has already fired.
    pub fn ready() -> Self {
        let (signal, completion) = Self::channel();
        signal.complete();
        completion
    }

    pub async fn wait(self, timeout: Duration) -> CompletionOutcome {
        match tokio::time::timeout(timeout, self.rx).await {
            Ok(Ok(())) => CompletionOutcome::Completed,
            Ok(Err(_)) => CompletionOutcome::Abandoned,
            Err(_) => CompletionOutcome::TimedOut,
        }
    }
}

impl From<CorrectLevel> for EcLevel {
    fn from(level: CorrectLevel) -> Self {
        match level {
            CorrectLevel::L => EcLevel::L,
            CorrectLevel::M => EcLevel::M,
            CorrectLevel::Q => EcLevel::Q,
            CorrectLevel::H => EcLevel::H,
        }
    }
}

/// Renderer backed by the `qrcode` crate.
#[derive(Debug, Clone, Default)]
pub struct QrCodeRenderer {
    surface: SurfaceKind,
}

impl QrCodeRenderer {
    pub fn new(surface: SurfaceKind) -> Self {
        Self { surface }
    }
}

impl QrRenderer for QrCodeRenderer {
    fn name(&self) -> &str {
        "qrcode"
    }

    fn render(
        &self,
        target: MountTarget,
        options: &RenderOptions,
    ) -> Result<RenderCompletion, RenderError> {
        if options.width == 0 || options.height == 0 {
            return Err(RenderError::InvalidDimensions {
                width: options.width,
                height: options.height,
            });
        }

        let code = QrCode::with_error_correction_level(
            options.text.as_bytes(),
            options.correct_level.into(),
        )?;
        let (signal, completion) = RenderCompletion::channel();
        let options = options.clone();
        let surface = self.surface;

        let job = move || {
            let canvas = rasterize(&code, &options);
            let element = match surface {
                SurfaceKind::Canvas => Some(PreviewElement::Canvas(canvas)),
                SurfaceKind::Image => match download::encode_png(&canvas) {
                    Ok(bytes) => Some(PreviewElement::Image {
                        src: download::png_data_url(&bytes),
                    }),
                    Err(e) => {
                        error!("Failed to encode QR image element: {}", e);
                        None
                    }
                },
            };
            if let Some(element) = element {
                if !target.mount(element) {
                    debug!(
                        "Discarded QR element for superseded generation {}",
                        target.generation()
                    );
                }
            }
            signal.complete();
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(job);
            }
            Err(_) => job(),
        }

        Ok(completion)
    }
}

/// Scale the module grid onto a `width` x `height` canvas.
///
/// Each pixel takes the color of the module it falls in; there is no quiet
/// zone around the symbol.
pub fn rasterize(code: &QrCode, options: &RenderOptions) -> RgbaImage {
    let modules = code.width() as u64;
    let colors = code.to_colors();
    let dark = options.color_dark.to_rgba();
    let light = options.color_light.to_rgba();
    let width = u64::from(options.width.max(1));
    let height = u64::from(options.height.max(1));

    RgbaImage::from_fn(options.width, options.height, |x, y| {
        let mx = (u64::from(x) * modules / width) as usize;
        let my = (u64::from(y) * modules / height) as usize;
        match colors[my * modules as usize + mx] {
            qrcode::Color::Dark => dark,
            qrcode::Color::Light => light,
        }
    })
}
