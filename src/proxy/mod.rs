//! Proxy pool for render sessions
//!
//! The pool is fetched once per crawl job from an optional HTTP JSON
//! endpoint and is read-only afterwards. A missing or failing endpoint
//! degrades to an empty pool, which means "no proxy" rather than an error:
//! one unreachable proxy source must never take down a multi-site batch.

use rand::Rng;
use serde::Deserialize;

/// At most this many endpoints are kept from the proxy source
pub const MAX_PROXIES: usize = 5;

#[derive(Debug, Deserialize)]
struct ProxySourceResponse {
    proxies: Vec<ProxySourceEntry>,
}

#[derive(Debug, Deserialize)]
struct ProxySourceEntry {
    proxy: String,
}

/// Read-only list of proxy endpoints for one crawl job
#[derive(Debug, Clone, Default)]
pub struct ProxyPool {
    endpoints: Vec<String>,
}

impl ProxyPool {
    /// Creates an empty pool ("no proxy")
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a pool from explicit endpoints, keeping at most [`MAX_PROXIES`]
    pub fn from_endpoints(mut endpoints: Vec<String>) -> Self {
        endpoints.truncate(MAX_PROXIES);
        Self { endpoints }
    }

    /// Fetches the pool from the configured source endpoint
    ///
    /// Any failure (no endpoint configured, unreachable source, bad payload)
    /// degrades to an empty pool with a warning.
    pub async fn fetch(client: &reqwest::Client, source_url: Option<&str>) -> Self {
        let Some(source_url) = source_url else {
            return Self::empty();
        };

        let response = match client.get(source_url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("proxy source unreachable, continuing without proxies: {}", e);
                return Self::empty();
            }
        };

        match response.json::<ProxySourceResponse>().await {
            Ok(payload) => {
                let pool = Self::from_endpoints(
                    payload.proxies.into_iter().map(|entry| entry.proxy).collect(),
                );
                tracing::info!("fetched {} proxies", pool.len());
                pool
            }
            Err(e) => {
                tracing::warn!("bad proxy source payload, continuing without proxies: {}", e);
                Self::empty()
            }
        }
    }

    /// Draws a uniformly random endpoint, or None when the pool is empty
    pub fn pick(&self) -> Option<&str> {
        if self.endpoints.is_empty() {
            return None;
        }
        let index = rand::thread_rng().gen_range(0..self.endpoints.len());
        Some(&self.endpoints[index])
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}
