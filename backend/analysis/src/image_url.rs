//! Image URL eligibility.

use url::Url;

/// Path suffixes accepted as images (compared lowercase).
pub const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".webp", ".bmp"];

/// Whether `candidate` is an http(s) URL whose path ends in a known image extension.
///
/// Never fails: anything unparseable is simply not an image URL. Query strings
/// and fragments are ignored for the extension check.
pub fn is_valid_image_url(candidate: &str) -> bool {
    let candidate = candidate.trim();
    if candidate.is_empty() || candidate.to_ascii_lowercase().starts_with("data:") {
        return false;
    }

    let Ok(parsed) = Url::parse(candidate) else {
        return false;
    };
    if !matches!(parsed.scheme(), "http" | "https") {
        return false;
    }

    let path = parsed.path().to_ascii_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// Host (plus explicit port) of a URL, without credentials.
pub fn domain_of(candidate: &str) -> Option<String> {
    let parsed = Url::parse(candidate.trim()).ok()?;
    let host = parsed.host_str()?;
    Some(match parsed.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// Deterministic alt-text used when no AI description is available.
pub fn fallback_alt_text(image_url: &str) -> String {
    format!("Image from {}", domain_of(image_url).unwrap_or_default())
}
