use url::Url;

/// Extracts the domain from a URL string
///
/// This function retrieves the host portion of a URL and converts it to
/// lowercase. Returns None when the string does not parse as an absolute URL
/// or has no host.
///
/// # Examples
///
/// ```
/// use storescout::url::extract_domain;
///
/// assert_eq!(
///     extract_domain("https://example.com/path"),
///     Some("example.com".to_string())
/// );
/// assert_eq!(
///     extract_domain("https://SHOP.Example.COM/"),
///     Some("shop.example.com".to_string())
/// );
/// assert_eq!(extract_domain("not a url"), None);
/// ```
pub fn extract_domain(link: &str) -> Option<String> {
    let parsed = Url::parse(link).ok()?;
    parsed.host_str().map(|h| h.to_lowercase())
}
