//! Rendered fetch adapter
//!
//! Performs one rendered fetch of a URL through a proxy-bound render
//! session, with bounded retries and error-class-driven proxy rotation.
//! The adapter owns the session for the whole fetch: it creates it, swaps
//! it out on rotation, and closes it on every exit path.
//!
//! # Retry logic
//!
//! | Failure class | Action |
//! |---------------|--------|
//! | Proxy/tunnel failure, timeout, empty response, abort | Close session, draw a new random proxy, fresh session, retry |
//! | Any other navigation failure | Extra delay, retry on the same session |
//! | Third failed attempt | URL abandoned for this crawl |

use crate::config::CrawlConfig;
use crate::proxy::ProxyPool;
use crate::render::{RenderEngine, RenderSession};
use crate::RenderError;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};

/// Result of a rendered fetch
#[derive(Debug)]
pub enum FetchOutcome {
    /// The rendered document, captured after the content-reveal loop
    Snapshot(String),

    /// All attempts failed; the URL is abandoned for this crawl
    Exhausted,
}

/// Recovery strategy for a failed attempt, decided once per error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rotate the proxy and recreate the session before retrying
    TransientRotate,

    /// Retry on the same session after a delay
    TransientRetry,
}

/// Picks the recovery strategy for a render error
pub fn classify(error: &RenderError) -> ErrorKind {
    match error {
        RenderError::ProxyConnection
        | RenderError::TunnelConnection
        | RenderError::Timeout
        | RenderError::EmptyResponse
        | RenderError::Aborted => ErrorKind::TransientRotate,
        _ => ErrorKind::TransientRetry,
    }
}

/// Fetches URLs through render sessions with retry and rotation
pub struct Fetcher {
    engine: Arc<dyn RenderEngine>,
    proxies: ProxyPool,
    config: CrawlConfig,
}

impl Fetcher {
    pub fn new(engine: Arc<dyn RenderEngine>, proxies: ProxyPool, config: CrawlConfig) -> Self {
        Self {
            engine,
            proxies,
            config,
        }
    }

    /// Fetches `url`, returning the rendered snapshot or [`FetchOutcome::Exhausted`]
    pub async fn fetch(&self, url: &str) -> FetchOutcome {
        let mut session = match self.open_session().await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("could not open render session for {}: {}", url, e);
                return FetchOutcome::Exhausted;
            }
        };

        for attempt in 1..=self.config.max_attempts {
            // Politeness pacing before every attempt
            sleep(self.pacing_delay()).await;

            match self.attempt(url, session.as_mut()).await {
                Ok(snapshot) => {
                    session.close().await;
                    return FetchOutcome::Snapshot(snapshot);
                }
                Err(error) => {
                    if attempt == self.config.max_attempts {
                        tracing::warn!(
                            "failed to load {} after {} attempts: {}",
                            url,
                            attempt,
                            error
                        );
                        break;
                    }

                    match classify(&error) {
                        ErrorKind::TransientRotate => {
                            tracing::debug!("retrying {} on a fresh session: {}", url, error);
                            session.close().await;
                            session = match self.open_session().await {
                                Ok(session) => session,
                                Err(e) => {
                                    tracing::warn!(
                                        "could not open replacement session for {}: {}",
                                        url,
                                        e
                                    );
                                    return FetchOutcome::Exhausted;
                                }
                            };
                        }
                        ErrorKind::TransientRetry => {
                            tracing::debug!("retrying {}: {}", url, error);
                            sleep(self.pacing_delay()).await;
                        }
                    }
                }
            }
        }

        session.close().await;
        FetchOutcome::Exhausted
    }

    /// One navigate-settle-capture attempt followed by the reveal loop
    async fn attempt(
        &self,
        url: &str,
        session: &mut dyn RenderSession,
    ) -> std::result::Result<String, RenderError> {
        let capture = async {
            session.navigate(url).await?;
            sleep(self.config.settle_delay).await;
            session.document().await
        };

        let snapshot = match timeout(self.config.navigation_timeout, capture).await {
            Ok(result) => result?,
            Err(_) => return Err(RenderError::Timeout),
        };

        Ok(self.reveal_content(session, snapshot).await)
    }

    /// Runs the content-reveal loop and re-captures the grown document
    ///
    /// Failures here are non-fatal: whatever HTML was captured last is used.
    async fn reveal_content(&self, session: &mut dyn RenderSession, initial: String) -> String {
        match self.scroll_to_reveal(session).await {
            Ok(()) => match session.document().await {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    tracing::debug!("re-capture after scrolling failed: {}", e);
                    initial
                }
            },
            Err(e) => {
                tracing::warn!("content-reveal scrolling failed: {}", e);
                initial
            }
        }
    }

    /// Scrolls to the bottom until growth stalls or the scroll cap is hit
    ///
    /// Stall detection only compares heights measured on this page, starting
    /// from the first measurement after load.
    async fn scroll_to_reveal(
        &self,
        session: &mut dyn RenderSession,
    ) -> std::result::Result<(), RenderError> {
        let mut stalls = 0;
        let mut scrolls = 0;
        let mut height = self.page_height(session).await?;

        while stalls < self.config.scroll_stall_retries && scrolls < self.config.max_scrolls {
            session
                .evaluate("window.scrollTo(0, document.body.scrollHeight);")
                .await?;
            sleep(self.config.scroll_delay).await;

            let new_height = self.page_height(session).await?;
            if new_height > height {
                scrolls += 1;
                stalls = 0;
                height = new_height;
            } else {
                stalls += 1;
            }
        }

        Ok(())
    }

    async fn page_height(
        &self,
        session: &mut dyn RenderSession,
    ) -> std::result::Result<i64, RenderError> {
        let value = session.evaluate("document.body.scrollHeight").await?;
        Ok(value.as_i64().unwrap_or_default())
    }

    /// Jittered politeness delay uniformly sampled from the configured range
    fn pacing_delay(&self) -> Duration {
        let min = self.config.min_delay.as_millis() as u64;
        let max = self.config.max_delay.as_millis() as u64;
        if max <= min {
            return self.config.min_delay;
        }
        let millis = rand::thread_rng().gen_range(min..=max);
        Duration::from_millis(millis)
    }

    /// Opens a session bound to a randomly drawn proxy (or none)
    async fn open_session(&self) -> std::result::Result<Box<dyn RenderSession>, RenderError> {
        let proxy = self.proxies.pick();
        if let Some(proxy) = proxy {
            tracing::debug!("using proxy {}", proxy);
        }
        self.engine.new_session(proxy).await
    }
}
