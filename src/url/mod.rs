//! URL handling module for storescout
//!
//! This module provides the link classifier: pure predicates that decide
//! whether a discovered href is worth visiting, whether it points at a
//! product page, and how to resolve it against the crawl's base domain.

mod classify;
mod domain;
mod resolve;

// Re-export main functions
pub use classify::{is_image_url, is_product_url, is_useful_url};
pub use domain::extract_domain;
pub use resolve::to_absolute_url;
