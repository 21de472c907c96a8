use std::path::PathBuf;
use std::time::Duration;

/// User agent presented to storefronts for robots.txt and sitemap requests
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Main configuration structure for storescout
#[derive(Debug, Clone)]
pub struct Config {
    /// Number of seed URLs processed in parallel
    pub outer_workers: usize,

    /// Per-site dynamic crawl configuration
    pub crawl: CrawlConfig,

    /// Optional proxy-source endpoint; None means "no proxy"
    pub proxy_source_url: Option<String>,

    /// Directory receiving the per-domain output files
    pub output_dir: PathBuf,

    /// User agent for plain HTTP requests
    pub user_agent: String,
}

/// Dynamic crawl behavior configuration
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Number of concurrent crawl workers per site
    pub workers: usize,

    /// Stop once this many product links have been collected
    pub target_links: usize,

    /// Maximum number of pending URLs held by the frontier
    pub frontier_capacity: usize,

    /// Lower bound of the politeness delay before each fetch attempt
    pub min_delay: Duration,

    /// Upper bound of the politeness delay before each fetch attempt
    pub max_delay: Duration,

    /// Fixed wait after navigation before the document is captured
    pub settle_delay: Duration,

    /// Wait between scroll-to-bottom triggers in the content-reveal loop
    pub scroll_delay: Duration,

    /// Consecutive no-growth scrolls tolerated before the reveal loop stops
    pub scroll_stall_retries: u32,

    /// Hard cap on successful scrolls per page
    pub max_scrolls: u32,

    /// Fetch attempts per URL before it is abandoned
    pub max_attempts: u32,

    /// Overall cap on a single navigate-and-capture attempt
    pub navigation_timeout: Duration,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            workers: 3,
            target_links: 200,
            frontier_capacity: 2000,
            min_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(3),
            settle_delay: Duration::from_secs(5),
            scroll_delay: Duration::from_secs(3),
            scroll_stall_retries: 2,
            max_scrolls: 5,
            max_attempts: 3,
            navigation_timeout: Duration::from_secs(30),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            outer_workers: 2,
            crawl: CrawlConfig::default(),
            proxy_source_url: None,
            output_dir: PathBuf::from("."),
            user_agent: USER_AGENT.to_string(),
        }
    }
}
