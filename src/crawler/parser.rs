//! Anchor extraction from rendered HTML
//!
//! The crawl only cares about `<a href>` values; classification and
//! resolution happen later, per worker. Parse failures are treated as a
//! page with zero links.

use scraper::{Html, Selector};

/// Extracts the raw href of every anchor in the document
///
/// Hrefs with schemes that can never be crawled (`javascript:`, `mailto:`,
/// `tel:`, `data:`) are dropped here; everything else is returned untouched
/// for the classifier to judge.
///
/// # Example
///
/// ```
/// use storescout::crawler::extract_hrefs;
///
/// let html = r#"<html><body><a href="/products/1">Buy</a></body></html>"#;
/// assert_eq!(extract_hrefs(html), vec!["/products/1".to_string()]);
/// ```
pub fn extract_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .filter(|href| {
            !href.starts_with("javascript:")
                && !href.starts_with("mailto:")
                && !href.starts_with("tel:")
                && !href.starts_with("data:")
        })
        .map(str::to_string)
        .collect()
}
