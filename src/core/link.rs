//! URL clean-up and validation for the link field.

use tracing::debug;
use url::Url;

const DEFAULT_SCHEME: &str = "https://";

/// Trim the input and add `https://` when no scheme was typed.
///
/// Returns an empty string for blank input. Input starting with `http://`,
/// `https://` or a bare `//` (any case) is left alone, so a scheme-relative
/// `//host` reaches validation as typed and is rejected there.
pub fn normalize_url(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    if has_scheme_prefix(trimmed) {
        return trimmed.to_string();
    }

    let normalized = format!("{}{}", DEFAULT_SCHEME, trimmed);
    debug!("Normalized {:?} to {:?}", trimmed, normalized);
    normalized
}

fn has_scheme_prefix(input: &str) -> bool {
    let lower = input
        .get(..8)
        .unwrap_or(input)
        .to_ascii_lowercase();
    lower.starts_with("//") || lower.starts_with("http://") || lower.starts_with("https://")
}

/// A URL is usable when it parses and carries both a scheme and a host.
pub fn is_valid_url(input: &str) -> bool {
    match Url::parse(input) {
        Ok(url) => !url.scheme().is_empty() && url.host_str().map_or(false, |h| !h.is_empty()),
        Err(e) => {
            debug!("Rejected URL {:?}: {}", input, e);
            false
        }
    }
}
