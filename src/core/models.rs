use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_SIZE: u32 = 64;
pub const MAX_SIZE: u32 = 2048;
pub const DEFAULT_SIZE: u32 = 256;
pub const RANGE_MIN: u32 = 128;
pub const RANGE_MAX: u32 = 1024;

/// Clamp a raw size field into `[MIN_SIZE, MAX_SIZE]`.
///
/// The text is read the way a browser number coercion reads it: decimal and
/// exponent forms, `0x` hex, and the exact words `Infinity`/`-Infinity`.
/// Blank, non-numeric, `NaN` and zero input fall back to `DEFAULT_SIZE`.
/// Fractions are truncated to whole pixels.
pub fn clamp_size(input: &str) -> u32 {
    match parse_number(input.trim()) {
        Some(v) if v.is_nan() || v == 0.0 => DEFAULT_SIZE,
        Some(v) => clamp_size_value(v),
        None => DEFAULT_SIZE,
    }
}

fn parse_number(text: &str) -> Option<f64> {
    match text {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        return u64::from_str_radix(hex, 16).ok().map(|v| v as f64);
    }
    // Rust also accepts `inf`, `nan` and friends; those are not numbers here.
    if text.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return None;
    }
    text.parse::<f64>().ok()
}

pub fn clamp_size_value(value: f64) -> u32 {
    if value.is_nan() {
        return DEFAULT_SIZE;
    }
    value.trunc().clamp(MIN_SIZE as f64, MAX_SIZE as f64) as u32
}

/// Clamp a size into the slider's narrower range.
pub fn clamp_range(value: u32) -> u32 {
    value.clamp(RANGE_MIN, RANGE_MAX)
}

/// RGBA color as held by a color picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0 };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#rgb` or `#rrggbb` (the leading `#` is optional).
    pub fn parse_hex(input: &str) -> Option<Self> {
        let hex = input.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match hex.len() {
            3 => {
                let mut channels = hex.chars().map(|c| {
                    let v = c.to_digit(16).unwrap_or(0) as u8;
                    v * 17
                });
                Some(Self::rgb(channels.next()?, channels.next()?, channels.next()?))
            }
            6 => {
                let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
                Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
            }
            _ => None,
        }
    }

    /// Picker value or `fallback` when the picker is blank or unparsable.
    pub fn from_picker(input: &str, fallback: Color) -> Self {
        Self::parse_hex(input).unwrap_or(fallback)
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    pub fn to_rgba(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, self.a])
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_transparent() {
            write!(f, "rgba(0,0,0,0)")
        } else {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        }
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.replace(' ', "") == "rgba(0,0,0,0)" {
            return Ok(Color::TRANSPARENT);
        }
        Color::parse_hex(&value).ok_or_else(|| format!("invalid color: {}", value))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// QR error-correction tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorrectLevel {
    L,
    M,
    Q,
    H,
}

/// Which of the two element kinds a renderer mounts into the preview.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceKind {
    #[default]
    Canvas,
    Image,
}

/// Everything the render capability needs for one QR code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub text: String,
    pub width: u32,
    pub height: u32,
    pub color_dark: Color,
    pub color_light: Color,
    pub correct_level: CorrectLevel,
}

/// Visual element a renderer leaves in the preview container.
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewElement {
    Canvas(RgbaImage),
    Image { src: String },
}

impl PreviewElement {
    pub fn kind(&self) -> SurfaceKind {
        match self {
            PreviewElement::Canvas(_) => SurfaceKind::Canvas,
            PreviewElement::Image { .. } => SurfaceKind::Image,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewStatus {
    Empty,
    Validating,
    Rendering,
    Ready,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageTone {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub text: String,
    pub tone: MessageTone,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self { text: text.into(), tone: MessageTone::Info }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { text: text.into(), tone: MessageTone::Error }
    }

    pub fn is_error(&self) -> bool {
        self.tone == MessageTone::Error
    }
}

/// Values currently held by the form fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub raw_url_text: String,
    pub size: u32,
    pub range_value: u32,
    pub foreground: Color,
    pub background_enabled: bool,
    pub background: Color,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            raw_url_text: String::new(),
            size: DEFAULT_SIZE,
            range_value: clamp_range(DEFAULT_SIZE),
            foreground: Color::BLACK,
            background_enabled: true,
            background: Color::WHITE,
        }
    }
}

impl FormState {
    /// Background passed to the renderer; the picker value only counts when
    /// the toggle is on.
    pub fn effective_background(&self) -> Color {
        if self.background_enabled {
            self.background
        } else {
            Color::TRANSPARENT
        }
    }

    pub fn background_picker_enabled(&self) -> bool {
        self.background_enabled
    }
}

/// A submitted form. Every field is optional so partial updates work.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormInput {
    pub url: Option<String>,
    /// Raw text of the numeric size field; numbers are accepted too.
    #[serde(default, deserialize_with = "deserialize_size_field")]
    pub size: Option<String>,
    pub range: Option<u32>,
    pub foreground: Option<String>,
    pub background_enabled: Option<bool>,
    pub background: Option<String>,
}

fn deserialize_size_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// Snapshot of the form handed to the web page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormView {
    pub url: String,
    pub size: u32,
    pub range_value: u32,
    pub foreground: Color,
    pub background_enabled: bool,
    pub background: Color,
    pub background_picker_enabled: bool,
    pub status: PreviewStatus,
    pub message: Option<StatusMessage>,
    pub download_ready: bool,
    pub preview_data_url: Option<String>,
    pub generation: u64,
}
