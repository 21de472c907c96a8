//! Integration tests for storescout
//!
//! The dynamic crawl engine is exercised end to end against deterministic
//! fake render engines; the HTTP-facing paths (sitemap discovery, proxy
//! source) run against wiremock servers.

mod crawl_tests;
mod proxy_tests;
mod sitemap_tests;
