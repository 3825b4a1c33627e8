use url::Url;

/// Resolves a menu href to an absolute HTTP(S) URL
///
/// Returns `None` for links that cannot be seeds: empty hrefs, fragment-only
/// anchors, `javascript:`, `mailto:`, `tel:` and `data:` links, and anything
/// that does not resolve to http or https.
pub fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    const SKIPPED_SCHEMES: [&str; 4] = ["javascript:", "mailto:", "tel:", "data:"];
    let lowered = href.to_ascii_lowercase();
    if SKIPPED_SCHEMES.iter().any(|s| lowered.starts_with(s)) {
        return None;
    }

    let absolute = base_url.join(href).ok()?;
    match absolute.scheme() {
        "http" | "https" => Some(absolute.to_string()),
        _ => None,
    }
}
