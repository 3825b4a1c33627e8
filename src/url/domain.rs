use url::Url;

/// Extracts the lowercase host of a parsed URL
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Parses `url` and returns its lowercase host
///
/// Returns `None` for unparsable URLs and URLs without a host.
///
/// # Examples
///
/// ```
/// use seedline::url::domain_of;
///
/// assert_eq!(domain_of("http://Docs.Example.com/guides"), Some("docs.example.com".to_string()));
/// assert_eq!(domain_of("not a url"), None);
/// ```
pub fn domain_of(url: &str) -> Option<String> {
    Url::parse(url).ok().as_ref().and_then(extract_domain)
}

/// Checks a domain against an `allowed_domains` pattern
///
/// `"example.com"` matches only itself; `"*.example.com"` matches the bare
/// domain and any subdomain of it.
///
/// # Examples
///
/// ```
/// use seedline::url::matches_wildcard;
///
/// assert!(matches_wildcard("*.example.com", "docs.example.com"));
/// assert!(matches_wildcard("*.example.com", "example.com"));
/// assert!(!matches_wildcard("example.com", "docs.example.com"));
/// ```
pub fn matches_wildcard(pattern: &str, candidate: &str) -> bool {
    match pattern.strip_prefix("*.") {
        Some(base) => {
            candidate == base
                || candidate
                    .strip_suffix(base)
                    .is_some_and(|prefix| prefix.ends_with('.'))
        }
        None => candidate == pattern,
    }
}
