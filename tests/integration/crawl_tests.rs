//! End-to-end tests for the dynamic crawl engine
//!
//! A deterministic fake render engine serves fixed HTML per URL, so the
//! full worker/frontier/termination cycle runs without a browser.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use storescout::config::CrawlConfig;
use storescout::crawler::crawl_site;
use storescout::proxy::ProxyPool;
use storescout::render::{RenderEngine, RenderSession};
use storescout::RenderError;

fn create_test_config(target_links: usize) -> CrawlConfig {
    CrawlConfig {
        target_links,
        min_delay: Duration::ZERO,
        max_delay: Duration::ZERO,
        settle_delay: Duration::ZERO,
        scroll_delay: Duration::ZERO,
        navigation_timeout: Duration::from_secs(5),
        ..CrawlConfig::default()
    }
}

/// Builds a minimal HTML page whose body is just the given anchors
fn page(hrefs: &[&str]) -> String {
    let anchors: String = hrefs
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    format!(
        "<html><head><title>Page</title></head><body>{}</body></html>",
        anchors
    )
}

/// Fake engine serving fixed HTML per URL, counting every navigation
struct FakeStore {
    pages: Arc<HashMap<String, String>>,
    fetches: Arc<Mutex<HashMap<String, usize>>>,
}

impl FakeStore {
    fn new(pages: HashMap<String, String>) -> Self {
        Self {
            pages: Arc::new(pages),
            fetches: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl RenderEngine for FakeStore {
    async fn new_session(
        &self,
        _proxy: Option<&str>,
    ) -> Result<Box<dyn RenderSession>, RenderError> {
        Ok(Box::new(FakeStoreSession {
            pages: self.pages.clone(),
            fetches: self.fetches.clone(),
            current: None,
        }))
    }
}

struct FakeStoreSession {
    pages: Arc<HashMap<String, String>>,
    fetches: Arc<Mutex<HashMap<String, usize>>>,
    current: Option<String>,
}

#[async_trait]
impl RenderSession for FakeStoreSession {
    async fn navigate(&mut self, url: &str) -> Result<(), RenderError> {
        *self.fetches.lock().unwrap().entry(url.to_string()).or_insert(0) += 1;
        self.current = Some(url.to_string());
        Ok(())
    }

    async fn evaluate(&mut self, _script: &str) -> Result<serde_json::Value, RenderError> {
        // Constant height: the reveal loop stalls out immediately
        Ok(serde_json::json!(1000))
    }

    async fn document(&mut self) -> Result<String, RenderError> {
        let current = self.current.as_deref().unwrap_or_default();
        Ok(self
            .pages
            .get(current)
            .cloned()
            .unwrap_or_else(|| "<html><body></body></html>".to_string()))
    }

    async fn close(&mut self) {}
}

/// A storefront with 5 product pages and 10 non-product pages in two hops
fn storefront_pages() -> HashMap<String, String> {
    let mut pages = HashMap::new();

    pages.insert(
        "https://shop.test/".to_string(),
        page(&[
            "/products/1",
            "/products/2",
            "/collections/a",
            "/collections/b",
            "/collections/c",
            "/collections/d",
            "/collections/e",
            "/about-us",
            "#MainContent",
            "/cdn/hero.jpg",
        ]),
    );
    pages.insert(
        "https://shop.test/collections/a".to_string(),
        page(&["/products/3", "/products/4", "/collections/f", "/collections/g"]),
    );
    pages.insert(
        "https://shop.test/collections/b".to_string(),
        page(&[
            "/p/5",
            "/collections/h",
            "/collections/i",
            "https://other.com/products/99",
            "/products/1",
        ]),
    );

    for name in ["c", "d", "e", "f", "g", "h", "i"] {
        pages.insert(
            format!("https://shop.test/collections/{}", name),
            page(&[]),
        );
    }
    for id in 1..=4 {
        pages.insert(format!("https://shop.test/products/{}", id), page(&[]));
    }
    pages.insert("https://shop.test/p/5".to_string(), page(&[]));

    pages
}

#[tokio::test]
async fn test_crawl_collects_exactly_the_product_pages() {
    let engine = FakeStore::new(storefront_pages());
    let fetches = engine.fetches.clone();

    let outcome = tokio::time::timeout(
        Duration::from_secs(30),
        crawl_site(
            "https://shop.test/",
            Arc::new(engine),
            create_test_config(5),
            ProxyPool::empty(),
        ),
    )
    .await
    .expect("crawl did not terminate")
    .expect("crawl failed");

    assert_eq!(outcome.domain, "shop.test");

    let expected: HashSet<String> = [
        "https://shop.test/products/1",
        "https://shop.test/products/2",
        "https://shop.test/products/3",
        "https://shop.test/products/4",
        "https://shop.test/p/5",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    assert_eq!(outcome.product_urls, expected);

    // No URL is fetched twice, even though /products/1 is linked from two pages
    for (url, count) in fetches.lock().unwrap().iter() {
        assert_eq!(*count, 1, "{} was fetched {} times", url, count);
    }
}

#[tokio::test]
async fn test_crawl_never_leaves_the_base_domain() {
    let engine = FakeStore::new(storefront_pages());
    let fetches = engine.fetches.clone();

    tokio::time::timeout(
        Duration::from_secs(30),
        crawl_site(
            "https://shop.test/",
            Arc::new(engine),
            create_test_config(1000),
            ProxyPool::empty(),
        ),
    )
    .await
    .expect("crawl did not terminate")
    .expect("crawl failed");

    let fetches = fetches.lock().unwrap();
    assert!(!fetches.contains_key("https://other.com/products/99"));
    // Denylisted, fragment-only, and asset links are never visited either
    assert!(!fetches.contains_key("https://shop.test/about-us"));
    assert!(!fetches.keys().any(|url| url.contains("hero.jpg")));
}

#[tokio::test]
async fn test_crawl_terminates_by_draining_when_target_is_unreachable() {
    // Plenty of headroom in the target; the site runs dry first
    let engine = FakeStore::new(storefront_pages());

    let outcome = tokio::time::timeout(
        Duration::from_secs(30),
        crawl_site(
            "https://shop.test/",
            Arc::new(engine),
            create_test_config(1000),
            ProxyPool::empty(),
        ),
    )
    .await
    .expect("crawl did not terminate")
    .expect("crawl failed");

    // Everything reachable was still collected
    assert_eq!(outcome.product_urls.len(), 5);
}

#[tokio::test]
async fn test_crawl_survives_a_tiny_frontier() {
    let engine = FakeStore::new(storefront_pages());

    let config = CrawlConfig {
        frontier_capacity: 2,
        ..create_test_config(1000)
    };

    let outcome = tokio::time::timeout(
        Duration::from_secs(30),
        crawl_site(
            "https://shop.test/",
            Arc::new(engine),
            config,
            ProxyPool::empty(),
        ),
    )
    .await
    .expect("crawl did not terminate")
    .expect("crawl failed");

    // Overflowing enqueues are dropped, never block, and the job still ends
    assert!(outcome.product_urls.len() <= 5);
}

/// Engine whose sessions always fail with a rotate-class error
struct BrokenStore {
    sessions: Arc<AtomicUsize>,
    navigations: Arc<AtomicUsize>,
}

#[async_trait]
impl RenderEngine for BrokenStore {
    async fn new_session(
        &self,
        _proxy: Option<&str>,
    ) -> Result<Box<dyn RenderSession>, RenderError> {
        self.sessions.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(BrokenSession {
            navigations: self.navigations.clone(),
        }))
    }
}

struct BrokenSession {
    navigations: Arc<AtomicUsize>,
}

#[async_trait]
impl RenderSession for BrokenSession {
    async fn navigate(&mut self, _url: &str) -> Result<(), RenderError> {
        self.navigations.fetch_add(1, Ordering::SeqCst);
        Err(RenderError::TunnelConnection)
    }

    async fn evaluate(&mut self, _script: &str) -> Result<serde_json::Value, RenderError> {
        Err(RenderError::Session("no page".to_string()))
    }

    async fn document(&mut self) -> Result<String, RenderError> {
        Err(RenderError::EmptyResponse)
    }

    async fn close(&mut self) {}
}

#[tokio::test]
async fn test_unreachable_site_exhausts_and_terminates() {
    let sessions = Arc::new(AtomicUsize::new(0));
    let navigations = Arc::new(AtomicUsize::new(0));
    let engine = BrokenStore {
        sessions: sessions.clone(),
        navigations: navigations.clone(),
    };

    let outcome = tokio::time::timeout(
        Duration::from_secs(30),
        crawl_site(
            "https://shop.test/",
            Arc::new(engine),
            create_test_config(5),
            ProxyPool::from_endpoints(vec![
                "http://proxy0:8080".to_string(),
                "http://proxy1:8080".to_string(),
            ]),
        ),
    )
    .await
    .expect("crawl deadlocked on an unreachable site")
    .expect("crawl failed");

    assert!(outcome.product_urls.is_empty());

    // Exactly 3 attempts on the seed, with 2 rotations after the initial session
    assert_eq!(navigations.load(Ordering::SeqCst), 3);
    assert_eq!(sessions.load(Ordering::SeqCst), 3);
}
