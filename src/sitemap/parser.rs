//! Sitemap XML parsing
//!
//! Sitemaps come in two shapes: an index of child sitemaps, or a url-set of
//! page locations. Both carry their payload in `<loc>` elements, so a
//! lightweight scan is enough; anything malformed simply yields fewer
//! locations.

use crate::SitemapError;

/// A parsed sitemap document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// A sitemap index: locations of child sitemaps
    Index(Vec<String>),

    /// A url-set: locations of site pages
    UrlSet(Vec<String>),
}

/// Parses sitemap XML into an index or a url-set
pub fn parse_sitemap(xml: &str) -> std::result::Result<SitemapDocument, SitemapError> {
    if xml.contains("<sitemapindex") {
        Ok(SitemapDocument::Index(extract_locations(xml)))
    } else if xml.contains("<urlset") {
        Ok(SitemapDocument::UrlSet(extract_locations(xml)))
    } else {
        Err(SitemapError::UnsupportedFormat)
    }
}

/// Pulls every `<loc>` value out of the document
fn extract_locations(xml: &str) -> Vec<String> {
    let mut locations = Vec::new();
    let mut rest = xml;

    while let Some(open) = rest.find("<loc>") {
        rest = &rest[open + "<loc>".len()..];

        let Some(close) = rest.find("</loc>") else {
            break;
        };

        let raw = rest[..close].trim();
        let location = raw
            .strip_prefix("<![CDATA[")
            .and_then(|inner| inner.strip_suffix("]]>"))
            .map(str::trim)
            .unwrap_or(raw);

        if !location.is_empty() {
            locations.push(location.replace("&amp;", "&"));
        }

        rest = &rest[close + "</loc>".len()..];
    }

    locations
}
