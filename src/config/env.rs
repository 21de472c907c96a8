use crate::config::types::{Config, CrawlConfig};
use std::path::PathBuf;

/// Outer parallelism across seed URLs
const INPUT_LINK_HANDLING_WORKERS: &str = "INPUT_LINK_HANDLING_WORKERS";

/// Crawl workers per site
const HEADLESS_BROWSING_WORKERS: &str = "HEADLESS_BROWSING_WORKERS";

/// Target product-link count per site
const LINKS_LIMIT_FOR_HEADLESS_BROWSER: &str = "LINKS_LIMIT_FOR_HEADLESS_BROWSER";

/// Proxy-source endpoint returning a JSON proxy list
const PROXY_SOURCE_URL: &str = "PROXY_SOURCE_URL";

/// Directory receiving per-domain output files
const OUTPUT_DIR: &str = "OUTPUT_DIR";

impl Config {
    /// Builds a configuration from the process environment
    ///
    /// Unset, unparsable, or non-positive values fall back to their defaults
    /// without raising an error.
    pub fn from_env() -> Self {
        let defaults = Config::default();
        let crawl_defaults = CrawlConfig::default();

        Self {
            outer_workers: positive_count(
                std::env::var(INPUT_LINK_HANDLING_WORKERS).ok().as_deref(),
            )
            .unwrap_or(defaults.outer_workers),
            crawl: CrawlConfig {
                workers: positive_count(std::env::var(HEADLESS_BROWSING_WORKERS).ok().as_deref())
                    .unwrap_or(crawl_defaults.workers),
                target_links: positive_count(
                    std::env::var(LINKS_LIMIT_FOR_HEADLESS_BROWSER).ok().as_deref(),
                )
                .unwrap_or(crawl_defaults.target_links),
                ..crawl_defaults
            },
            proxy_source_url: std::env::var(PROXY_SOURCE_URL)
                .ok()
                .filter(|value| !value.trim().is_empty()),
            output_dir: std::env::var(OUTPUT_DIR)
                .ok()
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            user_agent: defaults.user_agent,
        }
    }
}

/// Parses a strictly positive count, rejecting anything else
fn positive_count(raw: Option<&str>) -> Option<usize> {
    raw?.trim().parse::<usize>().ok().filter(|n| *n > 0)
}
