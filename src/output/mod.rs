//! Output sink for discovered product URLs
//!
//! One plain-text artifact per crawled domain: the newline-joined list of
//! product URLs, in arbitrary order, named after the domain.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Writes the product URLs for a domain to `<output_dir>/<domain>.txt`
///
/// # Arguments
///
/// * `output_dir` - Directory receiving the file
/// * `domain` - The crawled base domain, used as the file stem
/// * `product_urls` - The URLs to write, one per line
///
/// # Returns
///
/// The path of the written file.
pub fn write_product_urls(
    output_dir: &Path,
    domain: &str,
    product_urls: &HashSet<String>,
) -> std::io::Result<PathBuf> {
    let path = output_dir.join(format!("{}.txt", domain));

    let combined = product_urls
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n");

    std::fs::write(&path, combined)?;
    Ok(path)
}
