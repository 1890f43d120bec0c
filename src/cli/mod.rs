use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use crate::core::app::App;
use crate::core::config::AppConfig;
use crate::core::models::FormInput;
use crate::utils::qrcode::render_terminal_qr;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Port to listen on (will find next available port if this one is in use)
    #[arg(short, long)]
    port: Option<u16>,

    /// Address to bind the web interface to
    #[arg(long)]
    host: Option<String>,

    /// Prefill the form with this URL and render it right away
    #[arg(short, long)]
    url: Option<String>,

    /// QR code size in pixels (64-2048)
    #[arg(short, long)]
    size: Option<String>,

    /// Foreground color, e.g. "#000000"
    #[arg(long)]
    fg: Option<String>,

    /// Background color, e.g. "#ffffff"
    #[arg(long)]
    bg: Option<String>,

    /// Use a transparent background
    #[arg(long)]
    transparent: bool,

    /// Render the URL to this PNG file and exit instead of serving the form
    #[arg(short, long, requires = "url")]
    output: Option<PathBuf>,

    /// Disable the terminal QR code banner
    #[arg(long)]
    no_qr: bool,

    /// Open web browser automatically
    #[arg(long)]
    open: bool,

    /// Generate example configuration file
    #[arg(long)]
    generate_config: bool,
}

impl Cli {
    pub async fn run(&self) -> Result<()> {
        if self.generate_config {
            AppConfig::save_example()?;
            println!("Generated example configuration file: qrlink.example.toml");
            return Ok(());
        }

        let mut config = AppConfig::load().unwrap_or_else(|e| {
            info!("Using default configuration ({})", e);
            AppConfig::default()
        });

        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(ref host) = self.host {
            config.server.host = host.clone();
        }
        if self.no_qr {
            config.ui.terminal_qr = false;
        }
        if self.open {
            config.ui.open_browser = true;
        }

        let app = App::new(config, self.form_input());

        if let Some(ref output) = self.output {
            let summary = app.export(output).await?;
            println!(
                "Saved {}x{} QR code for {} to {}",
                summary.size,
                summary.size,
                summary.url,
                output.display()
            );
            if !self.no_qr {
                println!("{}", render_terminal_qr(&summary.url, "Preview:")?);
            }
            return Ok(());
        }

        app.run().await
    }

    /// Form fields given on the command line.
    pub fn form_input(&self) -> FormInput {
        FormInput {
            url: self.url.clone(),
            size: self.size.clone(),
            range: None,
            foreground: self.fg.clone(),
            background_enabled: self.transparent.then_some(false),
            background: self.bg.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_export_flags() {
        let cli = Cli::try_parse_from([
            "qrlink",
            "--url",
            "example.com",
            "--size",
            "300",
            "--transparent",
            "--output",
            "qr.png",
        ])
        .unwrap();

        let input = cli.form_input();
        assert_eq!(input.url.as_deref(), Some("example.com"));
        assert_eq!(input.size.as_deref(), Some("300"));
        assert_eq!(input.background_enabled, Some(false));
        assert_eq!(cli.output, Some(PathBuf::from("qr.png")));
    }

    #[test]
    fn test_output_requires_url() {
        assert!(Cli::try_parse_from(["qrlink", "--output", "qr.png"]).is_err());
    }

    #[test]
    fn test_defaults_leave_form_untouched() {
        let cli = Cli::try_parse_from(["qrlink"]).unwrap();
        let input = cli.form_input();
        assert!(input.url.is_none());
        assert!(input.size.is_none());
        assert!(input.background_enabled.is_none());
        assert!(!cli.generate_config);
    }
}
