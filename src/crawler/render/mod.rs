//! Rendered-page collaborator
//!
//! A [`Renderer`] opens isolated [`RenderSession`]s. A session can navigate,
//! evaluate a script and hand back its JSON result, and list the resolved
//! `href`s of anchors in the live document. Everything else the rendered
//! phase does (waiting for quiet, scrolling, classifying) is driven from Rust
//! through this narrow surface so it can run against a mock.

mod chromium;
mod idle;
mod scroll;

pub use chromium::ChromiumRenderer;
pub use idle::NetworkIdle;
pub use scroll::{
    read_scroll_height, scroll_until_stable, ScrollOutcome, SCROLL_HEIGHT_SCRIPT,
    SCROLL_TO_BOTTOM_SCRIPT,
};

use crate::config::RenderConfig;
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

/// When a freshly navigated page counts as ready
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadySignal {
    /// Requests allowed in flight while the network counts as quiet
    pub max_inflight: usize,

    /// How long the network must stay quiet
    pub idle_window: Duration,

    /// Upper bound on navigation plus the quiet wait
    pub timeout: Duration,
}

impl From<&RenderConfig> for ReadySignal {
    fn from(config: &RenderConfig) -> Self {
        Self {
            max_inflight: config.max_inflight_requests,
            idle_window: config.idle_window(),
            timeout: config.navigation_timeout(),
        }
    }
}

/// An isolated, exclusively owned rendering context
///
/// Errors are plain reasons; callers attach the seed URL.
#[async_trait]
pub trait RenderSession: Send {
    /// Navigates to `url` and returns once `ready` is satisfied
    async fn navigate(&mut self, url: &Url, ready: &ReadySignal) -> Result<(), String>;

    /// Evaluates a script expression and returns its JSON value
    ///
    /// Expressions without a value (e.g. `undefined`) yield `Value::Null`.
    async fn evaluate(&mut self, script: &str) -> Result<serde_json::Value, String>;

    /// Returns the resolved `href` of every element matching `selector`
    async fn query_hrefs(&mut self, selector: &str) -> Result<Vec<String>, String>;

    /// Tears the session down
    async fn close(self: Box<Self>) -> Result<(), String>;
}

/// Factory for rendering sessions
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn open_session(&self) -> Result<Box<dyn RenderSession>, String>;
}
