//! Configuration module for storescout
//!
//! Configuration is read from the process environment. Every knob has a
//! default, and unset or invalid values silently fall back to it, so a bare
//! environment always yields a runnable configuration.
//!
//! # Example
//!
//! ```
//! use storescout::config::Config;
//!
//! let config = Config::from_env();
//! println!("Crawl workers: {}", config.crawl.workers);
//! ```

mod env;
mod types;

// Re-export types
pub use types::{Config, CrawlConfig, USER_AGENT};
