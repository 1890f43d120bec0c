use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, ImageResult, RgbaImage};
use tracing::error;

use crate::core::error::FormError;
use crate::core::models::PreviewElement;

pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";
pub const DOWNLOAD_FILE_NAME: &str = "qrcode.png";
pub const DOWNLOAD_CONTENT_DISPOSITION: &str = "attachment; filename=\"qrcode.png\"";

/// Encoded PNG ready to be offered as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadArtifact {
    pub bytes: Vec<u8>,
    pub data_url: String,
}

impl DownloadArtifact {
    /// Derive the PNG from whichever element the renderer produced.
    pub fn from_element(element: &PreviewElement) -> Result<Self, FormError> {
        match element {
            PreviewElement::Canvas(canvas) => {
                let bytes = encode_png(canvas).map_err(|e| {
                    error!("Failed to encode canvas as PNG: {}", e);
                    FormError::DownloadPreparationFailure
                })?;
                let data_url = png_data_url(&bytes);
                Ok(Self { bytes, data_url })
            }
            PreviewElement::Image { src } => {
                let bytes = decode_png_data_url(src).ok_or_else(|| {
                    error!("Image element does not carry a PNG data URL");
                    FormError::DownloadPreparationFailure
                })?;
                Ok(Self {
                    bytes,
                    data_url: src.clone(),
                })
            }
        }
    }
}

pub fn encode_png(canvas: &RgbaImage) -> ImageResult<Vec<u8>> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes).write_image(
        canvas.as_raw(),
        canvas.width(),
        canvas.height(),
        ColorType::Rgba8,
    )?;
    Ok(bytes)
}

pub fn png_data_url(bytes: &[u8]) -> String {
    format!("{}{}", PNG_DATA_URL_PREFIX, STANDARD.encode(bytes))
}

pub fn decode_png_data_url(src: &str) -> Option<Vec<u8>> {
    let payload = src.strip_prefix(PNG_DATA_URL_PREFIX)?;
    let bytes = STANDARD.decode(payload).ok()?;
    if bytes.is_empty() {
        return None;
    }
    Some(bytes)
}
