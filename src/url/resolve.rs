use crate::{UrlError, UrlResult};
use url::Url;

/// Resolves an href against the crawl's base domain
///
/// Relative hrefs are concatenated onto the base domain. An href that names a
/// different host yields [`UrlError::DomainMismatch`], which keeps the crawl
/// single-site. Results without a scheme are forced to `https`.
///
/// `base` may be given as a bare domain (`"a.com"`) or a root URL
/// (`"https://a.com"`).
///
/// # Examples
///
/// ```
/// use storescout::url::to_absolute_url;
///
/// assert_eq!(
///     to_absolute_url("https://a.com", "/products/5").unwrap(),
///     "https://a.com/products/5"
/// );
/// assert!(to_absolute_url("https://a.com", "https://other.com/x").is_err());
/// ```
pub fn to_absolute_url(base: &str, href: &str) -> UrlResult<String> {
    let base_host = base_host(base)?;
    let href = href.trim();

    if href.is_empty() {
        return Err(UrlError::Parse("empty href".to_string()));
    }

    // Protocol-relative hrefs carry an explicit host without a scheme
    if let Some(rest) = href.strip_prefix("//") {
        return resolve_absolute(&base_host, &format!("https://{}", rest));
    }

    match Url::parse(href) {
        Ok(parsed) if parsed.host_str().is_some() => resolve_absolute(&base_host, href),
        Ok(parsed) => Err(UrlError::Parse(format!(
            "unsupported scheme {} in {}",
            parsed.scheme(),
            href
        ))),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            if href.starts_with('/') {
                Ok(format!("https://{}{}", base_host, href))
            } else {
                Ok(format!("https://{}/{}", base_host, href))
            }
        }
        Err(e) => Err(UrlError::Parse(e.to_string())),
    }
}

/// Checks a fully-qualified href against the base host
fn resolve_absolute(base_host: &str, href: &str) -> UrlResult<String> {
    let parsed = Url::parse(href).map_err(|e| UrlError::Parse(e.to_string()))?;

    match parsed.host_str() {
        Some(host) if host.eq_ignore_ascii_case(base_host) => Ok(href.to_string()),
        Some(_) => Err(UrlError::DomainMismatch(href.to_string())),
        None => Err(UrlError::Parse(format!("missing host in {}", href))),
    }
}

/// Normalizes the base argument to a bare lowercase host
fn base_host(base: &str) -> UrlResult<String> {
    if base.contains("://") {
        let parsed = Url::parse(base).map_err(|e| UrlError::Parse(e.to_string()))?;
        parsed
            .host_str()
            .map(|h| h.to_lowercase())
            .ok_or_else(|| UrlError::Parse(format!("missing host in base {}", base)))
    } else {
        Ok(base.trim_matches('/').to_lowercase())
    }
}
