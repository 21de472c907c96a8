//! Static sitemap discovery
//!
//! The cheap path: instead of rendering anything, read the site's
//! `robots.txt` for a `Sitemap:` directive, walk the referenced sitemap
//! (recursing through sitemap indexes, preferring children whose location
//! hints at products), and keep every URL the classifier accepts. When this
//! returns a non-empty set the dynamic crawl engine is skipped entirely.

mod parser;

pub use parser::{parse_sitemap, SitemapDocument};

use crate::url::is_product_url;
use crate::SitemapError;
use flate2::read::GzDecoder;
use futures::future::BoxFuture;
use reqwest::Client;
use std::collections::HashSet;
use std::io::Read;
use std::time::Duration;

/// Builds the HTTP client used for robots.txt and sitemap retrieval
pub fn build_http_client(user_agent: &str) -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Discovers product URLs through the site's published sitemaps
///
/// Returns the (possibly empty) set of product URLs. Errors mean the static
/// path is unavailable for this site; callers fall back to the dynamic
/// crawl rather than failing the job.
pub async fn discover_products(
    client: &Client,
    root_url: &str,
) -> std::result::Result<HashSet<String>, SitemapError> {
    let sitemap_url = fetch_sitemap_url(client, root_url).await?;
    tracing::info!("sitemap for {}: {}", root_url, sitemap_url);
    fetch_product_urls(client, &sitemap_url).await
}

/// Locates the `Sitemap:` directive via the site's robots.txt
async fn fetch_sitemap_url(
    client: &Client,
    root_url: &str,
) -> std::result::Result<String, SitemapError> {
    let robots_url = format!("{}/robots.txt", root_url.trim_end_matches('/'));

    let response = client
        .get(&robots_url)
        .send()
        .await
        .map_err(|e| SitemapError::Robots(e.to_string()))?;

    if !response.status().is_success() {
        return Err(SitemapError::Robots(format!(
            "HTTP {} for {}",
            response.status(),
            robots_url
        )));
    }

    let body = response
        .text()
        .await
        .map_err(|e| SitemapError::Robots(e.to_string()))?;

    sitemap_directive(&body).ok_or(SitemapError::NoDirective)
}

/// Scans robots.txt lines for the first `Sitemap:` directive
fn sitemap_directive(robots: &str) -> Option<String> {
    for line in robots.lines() {
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if let Some((key, value)) = trimmed.split_once(':') {
            if key.trim().eq_ignore_ascii_case("sitemap") {
                let value = value.trim();
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }

    None
}

/// Walks a sitemap document, recursing through indexes
///
/// For an index, children whose location hints at products are tried first;
/// when they yield nothing, every child is tried. Failing children are
/// skipped, never fatal.
pub fn fetch_product_urls<'a>(
    client: &'a Client,
    sitemap_url: &'a str,
) -> BoxFuture<'a, std::result::Result<HashSet<String>, SitemapError>> {
    Box::pin(async move {
        let body = fetch_sitemap_body(client, sitemap_url).await?;

        match parse_sitemap(&body)? {
            SitemapDocument::UrlSet(locations) => Ok(locations
                .into_iter()
                .filter(|location| is_product_url(location))
                .collect()),
            SitemapDocument::Index(children) => {
                let hinted: Vec<&String> = children
                    .iter()
                    .filter(|location| location.contains("product"))
                    .collect();

                let mut product_urls = collect_children(client, &hinted).await;

                if product_urls.is_empty() {
                    let all: Vec<&String> = children.iter().collect();
                    product_urls = collect_children(client, &all).await;
                }

                Ok(product_urls)
            }
        }
    })
}

async fn collect_children(client: &Client, children: &[&String]) -> HashSet<String> {
    let mut product_urls = HashSet::new();

    for location in children {
        match fetch_product_urls(client, location).await {
            Ok(urls) => product_urls.extend(urls),
            Err(e) => tracing::debug!("skipping child sitemap {}: {}", location, e),
        }
    }

    product_urls
}

/// Fetches a sitemap document, transparently decompressing `.xml.gz`
async fn fetch_sitemap_body(
    client: &Client,
    sitemap_url: &str,
) -> std::result::Result<String, SitemapError> {
    let response = client
        .get(sitemap_url)
        .send()
        .await
        .map_err(|e| SitemapError::Fetch(e.to_string()))?;

    if !response.status().is_success() {
        return Err(SitemapError::Fetch(format!(
            "HTTP {} for {}",
            response.status(),
            sitemap_url
        )));
    }

    if sitemap_url.ends_with(".xml.gz") {
        tracing::debug!("decompressing {}", sitemap_url);
        let bytes = response
            .bytes()
            .await
            .map_err(|e| SitemapError::Fetch(e.to_string()))?;

        let mut decoder = GzDecoder::new(bytes.as_ref());
        let mut body = String::new();
        decoder
            .read_to_string(&mut body)
            .map_err(|e| SitemapError::Gzip(e.to_string()))?;
        Ok(body)
    } else {
        response
            .text()
            .await
            .map_err(|e| SitemapError::Fetch(e.to_string()))
    }
}
