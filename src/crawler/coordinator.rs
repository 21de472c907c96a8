//! Crawl coordination - worker pool and termination
//!
//! One crawl job owns a frontier, a visited set, a result set, and a fixed
//! pool of workers. Workers drain the frontier, fetch through the render
//! adapter, classify every discovered href, and re-feed the frontier. A
//! single termination task consumes the result stream and is the only
//! writer of the terminal transition: workers report "found a product" or
//! "the frontier just drained", and never close shared state themselves,
//! so the shutdown action runs exactly once no matter how many conditions
//! become true concurrently.

use crate::config::CrawlConfig;
use crate::crawler::fetcher::{FetchOutcome, Fetcher};
use crate::crawler::frontier::Frontier;
use crate::crawler::parser::extract_hrefs;
use crate::proxy::ProxyPool;
use crate::render::RenderEngine;
use crate::url::{extract_domain, is_product_url, is_useful_url, to_absolute_url};
use crate::{ScoutError, UrlError};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot, Semaphore};
use tokio::task::JoinSet;

/// Final result of one crawl job
#[derive(Debug)]
pub struct CrawlOutcome {
    /// Base domain the crawl was pinned to
    pub domain: String,

    /// Product URLs collected before the job went terminal
    pub product_urls: HashSet<String>,
}

/// Messages from workers to the termination task
enum CrawlEvent {
    /// A deduplicated product URL was discovered
    ProductFound(String),

    /// The frontier drained with no in-flight work left
    Idle,
}

/// State shared by the workers and the termination task of one job
struct JobState {
    visited: Mutex<HashSet<String>>,
    results: Mutex<HashSet<String>>,
    terminal: AtomicBool,
}

impl JobState {
    fn new() -> Self {
        Self {
            visited: Mutex::new(HashSet::new()),
            results: Mutex::new(HashSet::new()),
            terminal: AtomicBool::new(false),
        }
    }

    fn is_terminal(&self) -> bool {
        self.terminal.load(Ordering::Acquire)
    }

    fn result_count(&self) -> usize {
        self.results.lock().unwrap().len()
    }
}

/// Crawls one storefront until the target is reached or the site runs dry
///
/// Blocks (cooperatively) until the termination task fires the terminal
/// signal, then returns the base domain and the collected product URLs.
/// In-flight fetches are allowed to run to completion; their late results
/// are simply dropped.
pub async fn crawl_site(
    seed_url: &str,
    engine: Arc<dyn RenderEngine>,
    config: CrawlConfig,
    proxies: ProxyPool,
) -> Result<CrawlOutcome, ScoutError> {
    let base_domain = extract_domain(seed_url)
        .ok_or_else(|| UrlError::Parse(format!("seed URL has no host: {}", seed_url)))?;

    tracing::info!(
        "starting dynamic crawl of {} ({} workers, target {})",
        base_domain,
        config.workers,
        config.target_links
    );

    let state = Arc::new(JobState::new());
    let frontier = Arc::new(Frontier::new(config.frontier_capacity));

    // The seed is visited-and-enqueued before any worker starts
    state
        .visited
        .lock()
        .unwrap()
        .insert(seed_url.to_string());
    frontier.push(seed_url.to_string());

    let (event_tx, event_rx) = mpsc::channel(100);
    let (done_tx, done_rx) = oneshot::channel();

    let termination = tokio::spawn(run_termination(
        event_rx,
        state.clone(),
        frontier.clone(),
        done_tx,
        config.target_links,
        base_domain.clone(),
    ));

    let fetcher = Arc::new(Fetcher::new(engine, proxies, config.clone()));
    let permits = Arc::new(Semaphore::new(config.workers));

    let mut workers = JoinSet::new();
    for worker_id in 0..config.workers {
        workers.spawn(worker_loop(
            worker_id,
            state.clone(),
            frontier.clone(),
            fetcher.clone(),
            permits.clone(),
            event_tx.clone(),
            base_domain.clone(),
            config.target_links,
        ));
    }
    drop(event_tx);

    // Block until the termination task declares the job terminal
    let _ = done_rx.await;

    // Let workers drain and exit their loops
    while workers.join_next().await.is_some() {}
    let _ = termination.await;

    let product_urls = std::mem::take(&mut *state.results.lock().unwrap());
    tracing::info!(
        "crawl of {} finished with {} product links",
        base_domain,
        product_urls.len()
    );

    Ok(CrawlOutcome {
        domain: base_domain,
        product_urls,
    })
}

/// The single authority over the terminal transition
///
/// Consumes the result stream; when the target count is reached, or a
/// worker reports the frontier drained, performs the one-and-only
/// shutdown: mark terminal, close the frontier, fire the done signal.
async fn run_termination(
    mut events: mpsc::Receiver<CrawlEvent>,
    state: Arc<JobState>,
    frontier: Arc<Frontier>,
    done: oneshot::Sender<()>,
    target: usize,
    domain: String,
) {
    while let Some(event) = events.recv().await {
        match event {
            CrawlEvent::ProductFound(url) => {
                let reached = {
                    let mut results = state.results.lock().unwrap();
                    let inserted = results.len() < target && results.insert(url);
                    if inserted && results.len() % 100 == 0 {
                        tracing::info!("{} product links fetched for {}", results.len(), domain);
                    }
                    results.len() >= target
                };
                if reached {
                    tracing::debug!("target of {} product links reached for {}", target, domain);
                    break;
                }
            }
            CrawlEvent::Idle => {
                tracing::debug!("frontier drained for {}", domain);
                break;
            }
        }
    }

    // Exactly-once shutdown: this task is the only writer of the terminal
    // transition, and it gets here exactly once per job.
    state.terminal.store(true, Ordering::Release);
    tracing::info!("closing frontier for {}", domain);
    frontier.close();
    let _ = done.send(());
}

/// One worker: drain the frontier, fetch, classify, re-feed
#[allow(clippy::too_many_arguments)]
async fn worker_loop(
    worker_id: usize,
    state: Arc<JobState>,
    frontier: Arc<Frontier>,
    fetcher: Arc<Fetcher>,
    permits: Arc<Semaphore>,
    events: mpsc::Sender<CrawlEvent>,
    base_domain: String,
    target: usize,
) {
    while let Some(url) = frontier.pop().await {
        if state.is_terminal() {
            frontier.complete();
            break;
        }

        let permit = match permits.acquire().await {
            Ok(permit) => permit,
            Err(_) => break,
        };

        tracing::debug!(worker_id, "visiting {}", url);
        let outcome = fetcher.fetch(&url).await;

        if let FetchOutcome::Snapshot(html) = outcome {
            handle_snapshot(&state, &frontier, &events, &base_domain, target, &html).await;
        }

        drop(permit);

        // This URL is done; if it was the last in-flight one, the frontier
        // has durably drained and the termination task takes over.
        if frontier.complete() && !state.is_terminal() {
            let _ = events.send(CrawlEvent::Idle).await;
        }

        if state.is_terminal() {
            break;
        }
    }

    tracing::debug!(worker_id, "worker exiting");
}

/// Classifies every href in a snapshot and feeds dedup, results, frontier
async fn handle_snapshot(
    state: &JobState,
    frontier: &Frontier,
    events: &mpsc::Sender<CrawlEvent>,
    base_domain: &str,
    target: usize,
    html: &str,
) {
    let hrefs = extract_hrefs(html);
    tracing::debug!("extracted {} hrefs", hrefs.len());

    for href in hrefs {
        // Early exit once the job has what it needs
        if state.result_count() >= target {
            break;
        }

        if !is_useful_url(&href) {
            continue;
        }

        let absolute = match to_absolute_url(base_domain, &href) {
            Ok(absolute) => absolute,
            Err(UrlError::DomainMismatch(_)) => continue,
            Err(e) => {
                tracing::debug!("skipping unresolvable href {}: {}", href, e);
                continue;
            }
        };

        // At-most-once per URL: mark visited before recording or enqueueing
        {
            let mut visited = state.visited.lock().unwrap();
            if !visited.insert(absolute.clone()) {
                continue;
            }
        }

        if is_product_url(&absolute) && state.result_count() < target {
            let _ = events.send(CrawlEvent::ProductFound(absolute.clone())).await;
        }

        // Product pages may link onward; enqueue them too
        frontier.push(absolute);
    }
}
