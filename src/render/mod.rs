//! Render capability boundary
//!
//! The crawl engine never talks to a browser directly. It drives the two
//! traits below: an engine that opens proxy-bound sessions, and a session
//! that can navigate, evaluate script, and snapshot the rendered document.
//! The production implementation is [`ChromeEngine`]; tests substitute
//! deterministic fakes.

mod chrome;

pub use chrome::ChromeEngine;

use crate::RenderError;
use async_trait::async_trait;

/// Opens render sessions, each bound to at most one proxy endpoint
#[async_trait]
pub trait RenderEngine: Send + Sync {
    /// Creates a fresh session routed through `proxy` (or directly when None)
    async fn new_session(
        &self,
        proxy: Option<&str>,
    ) -> std::result::Result<Box<dyn RenderSession>, RenderError>;
}

/// A stateful handle onto one rendered page at a time
///
/// A session is exclusively owned by the worker that created it and must be
/// closed on every exit path of a fetch attempt.
#[async_trait]
pub trait RenderSession: Send {
    /// Navigates to `url` and waits for basic page readiness
    async fn navigate(&mut self, url: &str) -> std::result::Result<(), RenderError>;

    /// Evaluates a script in the page and returns its value
    async fn evaluate(&mut self, script: &str)
        -> std::result::Result<serde_json::Value, RenderError>;

    /// Captures the full rendered document
    async fn document(&mut self) -> std::result::Result<String, RenderError>;

    /// Releases the session; best effort, never fails the caller
    async fn close(&mut self);
}
