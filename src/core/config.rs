use serde::{Deserialize, Serialize};
use anyhow::Result;

use crate::core::models::SurfaceKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_host")]
    pub host: String,
}

/// Initial form values and renderer tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_size")]
    pub default_size: u32,
    #[serde(default = "default_foreground")]
    pub foreground: String,
    #[serde(default = "default_background")]
    pub background: String,
    #[serde(default = "default_true")]
    pub background_enabled: bool,
    /// Upper bound on how long a generate waits for the renderer to finish.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub surface: SurfaceKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub terminal_qr: bool,
    #[serde(default = "default_false")]
    pub open_browser: bool,
}

// Default value functions
fn default_port() -> u16 { 8080 }
fn default_host() -> String { "127.0.0.1".to_string() }
fn default_size() -> u32 { 256 }
fn default_foreground() -> String { "#000000".to_string() }
fn default_background() -> String { "#ffffff".to_string() }
fn default_timeout_ms() -> u64 { 10_000 }
fn default_true() -> bool { true }
fn default_false() -> bool { false }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            default_size: default_size(),
            foreground: default_foreground(),
            background: default_background(),
            background_enabled: default_true(),
            timeout_ms: default_timeout_ms(),
            surface: SurfaceKind::default(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            terminal_qr: default_true(),
            open_browser: default_false(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            render: RenderConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("qrlink.toml").required(false))
            .add_source(config::Environment::with_prefix("QRLINK").separator("__"));

        if let Ok(port) = std::env::var("PORT") {
            builder = builder.set_override("server.port", port)?;
        }
        if let Ok(host) = std::env::var("HOST") {
            builder = builder.set_override("server.host", host)?;
        }

        let settings = builder.build()?;
        let config: AppConfig = settings.try_deserialize()?;
        Ok(config)
    }

    pub fn save_example() -> Result<()> {
        let example_config = AppConfig::default();
        let toml_string = toml::to_string_pretty(&example_config)?;
        std::fs::write("qrlink.example.toml", toml_string)?;
        Ok(())
    }

    pub fn from_toml(toml_content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(toml_content)?;
        Ok(config)
    }
}
