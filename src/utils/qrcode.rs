use anyhow::Result;
use qrcode::render::unicode;
use qrcode::{EcLevel, QrCode};

/// Render `url` as a block-character QR code for the terminal.
pub fn render_terminal_qr(url: &str, caption: &str) -> Result<String> {
    let code = QrCode::with_error_correction_level(url.as_bytes(), EcLevel::H)?;
    let qr = code.render::<unicode::Dense1x2>()
        .dark_color(unicode::Dense1x2::Light)
        .light_color(unicode::Dense1x2::Dark)
        .build();

    let mut output = String::new();
    output.push('\n');
    output.push_str(caption);
    output.push('\n');
    output.push_str(&qr);
    output.push('\n');
    output.push_str(&format!("Or open: {}\n", url));

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_qr_contains_caption_and_url() {
        let output = render_terminal_qr("https://example.com", "Scan me:").unwrap();
        assert!(output.starts_with("\nScan me:\n"));
        assert!(output.ends_with("Or open: https://example.com\n"));
        assert!(output.lines().count() > 10);
    }

    #[test]
    fn test_terminal_qr_rejects_oversized_input() {
        let url = format!("https://example.com/{}", "a".repeat(4000));
        assert!(render_terminal_qr(&url, "").is_err());
    }
}
