//! In-memory collaborators for unit tests

use crate::crawler::fetcher::{FetchedPage, PageFetcher};
use crate::crawler::render::{ReadySignal, RenderSession, Renderer, SCROLL_TO_BOTTOM_SCRIPT};
use crate::ExtractError;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Fetcher serving canned responses; unknown URLs fail with HTTP 404
#[derive(Default)]
pub struct MockFetcher {
    pages: HashMap<String, FetchedPage>,
    panics: HashSet<String>,
    delay: Duration,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, url: &str, body: &str) -> Self {
        self.with_response(url, Some("text/html; charset=utf-8"), body)
    }

    pub fn with_response(mut self, url: &str, content_type: Option<&str>, body: &str) -> Self {
        self.pages.insert(
            url.to_string(),
            FetchedPage {
                final_url: url.to_string(),
                status_code: 200,
                content_type: content_type.map(str::to_string),
                body: body.to_string(),
            },
        );
        self
    }

    /// Makes fetching `url` panic, simulating an unexpected internal fault
    pub fn panicking_on(mut self, url: &str) -> Self {
        self.panics.insert(url.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, ExtractError> {
        tokio::time::sleep(self.delay).await;

        if self.panics.contains(url.as_str()) {
            panic!("simulated fault fetching {}", url);
        }

        self.pages
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| ExtractError::fetch(url.as_str(), "HTTP 404"))
    }
}

#[derive(Default)]
struct Counters {
    opened: AtomicUsize,
    closed: AtomicUsize,
    scrolls: AtomicUsize,
    active: AtomicUsize,
    max_active: AtomicUsize,
}

#[derive(Default, Clone)]
struct Behavior {
    heights: Vec<u64>,
    links: HashMap<String, Vec<String>>,
    hold: Duration,
    fail_open: bool,
    fail_navigation: bool,
    fail_scripts: bool,
    fail_close: bool,
}

/// Renderer whose sessions replay scripted heights and links
///
/// Counts opened/closed sessions, scroll actions, and the peak number of
/// sessions open at once.
#[derive(Default, Clone)]
pub struct MockRenderer {
    behavior: Behavior,
    counters: Arc<Counters>,
}

impl MockRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_heights(mut self, heights: &[u64]) -> Self {
        self.behavior.heights = heights.to_vec();
        self
    }

    pub fn with_links(mut self, url: &str, links: &[&str]) -> Self {
        self.behavior
            .links
            .insert(url.to_string(), links.iter().map(|l| l.to_string()).collect());
        self
    }

    /// Keeps each session busy for `hold` during navigation
    pub fn holding(mut self, hold: Duration) -> Self {
        self.behavior.hold = hold;
        self
    }

    pub fn failing_open(mut self) -> Self {
        self.behavior.fail_open = true;
        self
    }

    pub fn failing_navigation(mut self) -> Self {
        self.behavior.fail_navigation = true;
        self
    }

    pub fn failing_scripts(mut self) -> Self {
        self.behavior.fail_scripts = true;
        self
    }

    pub fn failing_close(mut self) -> Self {
        self.behavior.fail_close = true;
        self
    }

    pub fn opened(&self) -> usize {
        self.counters.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.counters.closed.load(Ordering::SeqCst)
    }

    pub fn scrolls(&self) -> usize {
        self.counters.scrolls.load(Ordering::SeqCst)
    }

    pub fn max_active(&self) -> usize {
        self.counters.max_active.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Renderer for MockRenderer {
    async fn open_session(&self) -> Result<Box<dyn RenderSession>, String> {
        if self.behavior.fail_open {
            return Err("browser failed to launch".to_string());
        }

        self.counters.opened.fetch_add(1, Ordering::SeqCst);
        let active = self.counters.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters.max_active.fetch_max(active, Ordering::SeqCst);

        Ok(Box::new(MockSession {
            behavior: self.behavior.clone(),
            heights: self.behavior.heights.iter().copied().collect(),
            last_height: 0,
            url: None,
            counters: Arc::clone(&self.counters),
        }))
    }
}

struct MockSession {
    behavior: Behavior,
    heights: VecDeque<u64>,
    last_height: u64,
    url: Option<String>,
    counters: Arc<Counters>,
}

#[async_trait]
impl RenderSession for MockSession {
    async fn navigate(&mut self, url: &Url, _ready: &ReadySignal) -> Result<(), String> {
        tokio::time::sleep(self.behavior.hold).await;
        if self.behavior.fail_navigation {
            return Err("net::ERR_NAME_NOT_RESOLVED".to_string());
        }
        self.url = Some(url.to_string());
        Ok(())
    }

    async fn evaluate(&mut self, script: &str) -> Result<Value, String> {
        if self.behavior.fail_scripts {
            return Err("Execution context was destroyed".to_string());
        }
        if script == SCROLL_TO_BOTTOM_SCRIPT {
            self.counters.scrolls.fetch_add(1, Ordering::SeqCst);
            return Ok(Value::Null);
        }
        if let Some(height) = self.heights.pop_front() {
            self.last_height = height;
        }
        Ok(json!(self.last_height))
    }

    async fn query_hrefs(&mut self, _selector: &str) -> Result<Vec<String>, String> {
        Ok(self
            .url
            .as_ref()
            .and_then(|url| self.behavior.links.get(url))
            .cloned()
            .unwrap_or_default())
    }

    async fn close(self: Box<Self>) -> Result<(), String> {
        self.counters.active.fetch_sub(1, Ordering::SeqCst);
        self.counters.closed.fetch_add(1, Ordering::SeqCst);
        if self.behavior.fail_close {
            return Err("browser already gone".to_string());
        }
        Ok(())
    }
}
