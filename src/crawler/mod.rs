//! Dynamic crawl engine
//!
//! This module contains the core crawling logic, including:
//! - The bounded frontier shared by all workers
//! - Rendered fetching with retry and proxy rotation
//! - Anchor extraction from rendered snapshots
//! - Worker pool coordination and exactly-once termination

mod coordinator;
mod fetcher;
mod frontier;
mod parser;

pub use coordinator::{crawl_site, CrawlOutcome};
pub use fetcher::{classify, ErrorKind, FetchOutcome, Fetcher};
pub use frontier::Frontier;
pub use parser::extract_hrefs;
