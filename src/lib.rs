//! Storescout: product-page discovery for e-commerce storefronts
//!
//! This crate discovers product pages on storefront sites. It first tries the
//! cheap static path (the site's published XML sitemaps) and only escalates to
//! a rendered, bounded-concurrency crawl when the sitemaps yield nothing.

pub mod config;
pub mod crawler;
pub mod output;
pub mod proxy;
pub mod render;
pub mod sitemap;
pub mod url;

use thiserror::Error;

/// Main error type for storescout operations
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Sitemap error: {0}")]
    Sitemap(#[from] SitemapError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure classes surfaced by a render session.
///
/// Classification happens once, at the render boundary: the engine
/// implementation maps whatever its backend reports onto these variants, and
/// the fetch adapter picks a recovery strategy from the variant alone.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("proxy connection failed")]
    ProxyConnection,

    #[error("tunnel connection failed")]
    TunnelConnection,

    #[error("navigation timed out")]
    Timeout,

    #[error("empty response from server")]
    EmptyResponse,

    #[error("navigation aborted")]
    Aborted,

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("script evaluation failed: {0}")]
    Script(String),

    #[error("session error: {0}")]
    Session(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("failed to parse URL: {0}")]
    Parse(String),

    #[error("domain does not match crawl root: {0}")]
    DomainMismatch(String),
}

/// Sitemap discovery errors
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("could not fetch robots.txt: {0}")]
    Robots(String),

    #[error("no sitemap directive in robots.txt")]
    NoDirective,

    #[error("could not fetch sitemap: {0}")]
    Fetch(String),

    #[error("could not decompress sitemap: {0}")]
    Gzip(String),

    #[error("unsupported sitemap format")]
    UnsupportedFormat,
}

/// Result type alias for storescout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::{Config, CrawlConfig};
pub use crawler::{crawl_site, CrawlOutcome};
pub use self::url::{extract_domain, is_product_url, is_useful_url, to_absolute_url};
