//! Chromium-backed render sessions
//!
//! Each session launches its own browser process so that the proxy binding
//! (a launch argument) can change between sessions. Chrome's `net::ERR_*`
//! strings are mapped onto the typed [`RenderError`] variants here, at the
//! boundary; nothing downstream matches on error text.

use crate::render::{RenderEngine, RenderSession};
use crate::RenderError;
use async_trait::async_trait;
use chromiumoxide::error::CdpError;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::time::Duration;

/// Render engine backed by headless Chromium
pub struct ChromeEngine {
    request_timeout: Duration,
}

impl ChromeEngine {
    /// Creates an engine whose sessions use the given CDP request timeout
    pub fn new(request_timeout: Duration) -> Self {
        Self { request_timeout }
    }
}

#[async_trait]
impl RenderEngine for ChromeEngine {
    async fn new_session(
        &self,
        proxy: Option<&str>,
    ) -> std::result::Result<Box<dyn RenderSession>, RenderError> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .request_timeout(self.request_timeout)
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage");

        if let Some(proxy) = proxy {
            tracing::debug!("binding render session to proxy {}", proxy);
            builder = builder.arg(format!("--proxy-server={}", proxy));
        }

        let config = builder
            .build()
            .map_err(RenderError::Session)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| RenderError::Session(e.to_string()))?;

        // Drain browser events for the lifetime of this session
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| RenderError::Session(e.to_string()))?;

        Ok(Box::new(ChromeSession { browser, page }))
    }
}

/// One browser process plus the page it renders into
struct ChromeSession {
    browser: Browser,
    page: Page,
}

#[async_trait]
impl RenderSession for ChromeSession {
    async fn navigate(&mut self, url: &str) -> std::result::Result<(), RenderError> {
        // goto waits for the load event before resolving
        self.page
            .goto(url)
            .await
            .map_err(classify_navigation_error)?;
        Ok(())
    }

    async fn evaluate(
        &mut self,
        script: &str,
    ) -> std::result::Result<serde_json::Value, RenderError> {
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| RenderError::Script(e.to_string()))?;
        Ok(result.value().cloned().unwrap_or(serde_json::Value::Null))
    }

    async fn document(&mut self) -> std::result::Result<String, RenderError> {
        self.page
            .content()
            .await
            .map_err(classify_navigation_error)
    }

    async fn close(&mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::debug!("error closing browser: {}", e);
        }
    }
}

/// Maps a CDP error onto the typed render taxonomy
fn classify_navigation_error(err: CdpError) -> RenderError {
    if matches!(err, CdpError::Timeout) {
        return RenderError::Timeout;
    }
    classify_chrome_message(&err.to_string())
}

/// Maps Chrome's `net::ERR_*` message strings onto the typed taxonomy
fn classify_chrome_message(message: &str) -> RenderError {
    if message.contains("net::ERR_TUNNEL_CONNECTION_FAILED") {
        RenderError::TunnelConnection
    } else if message.contains("net::ERR_PROXY_CONNECTION_FAILED") {
        RenderError::ProxyConnection
    } else if message.contains("net::ERR_TIMED_OUT") {
        RenderError::Timeout
    } else if message.contains("net::ERR_EMPTY_RESPONSE") {
        RenderError::EmptyResponse
    } else if message.contains("net::ERR_ABORTED") {
        RenderError::Aborted
    } else {
        RenderError::Navigation(message.to_string())
    }
}
