//! Headless Chromium sessions over the DevTools protocol
//!
//! Every session launches its own browser process so no cookies, storage or
//! cache leak between sites. The process is torn down in [`RenderSession::close`].

use crate::config::{RenderConfig, UserAgentConfig};
use crate::crawler::render::{NetworkIdle, ReadySignal, RenderSession, Renderer};
use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::network::{
    EventLoadingFailed, EventLoadingFinished, EventRequestWillBeSent,
};
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::time::Instant;
use tokio::task::JoinHandle;
use url::Url;

/// [`Renderer`] launching a fresh headless Chromium per session
#[derive(Debug, Clone)]
pub struct ChromiumRenderer {
    headless: bool,
    navigation_timeout: std::time::Duration,
    user_agent: Option<String>,
}

impl ChromiumRenderer {
    pub fn new(render: &RenderConfig, user_agent: &UserAgentConfig) -> Self {
        Self {
            headless: render.headless,
            navigation_timeout: render.navigation_timeout(),
            user_agent: user_agent.custom().map(str::to_string),
        }
    }

    fn browser_config(&self) -> Result<BrowserConfig, String> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .request_timeout(self.navigation_timeout)
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage");

        if !self.headless {
            builder = builder.with_head();
        }

        builder.build()
    }
}

#[async_trait]
impl Renderer for ChromiumRenderer {
    async fn open_session(&self) -> Result<Box<dyn RenderSession>, String> {
        let (mut browser, mut handler) = Browser::launch(self.browser_config()?)
            .await
            .map_err(|e| format!("failed to launch browser: {}", e))?;

        // Drive browser events until the connection drops
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = match new_page(&browser, self.user_agent.as_deref()).await {
            Ok(page) => page,
            Err(e) => {
                let _ = browser.close().await;
                let _ = browser.wait().await;
                handler_task.abort();
                return Err(e);
            }
        };

        tracing::debug!("Opened browser session");

        Ok(Box::new(ChromiumSession {
            browser,
            page,
            handler_task,
        }))
    }
}

async fn new_page(browser: &Browser, user_agent: Option<&str>) -> Result<Page, String> {
    let page = browser
        .new_page("about:blank")
        .await
        .map_err(|e| format!("failed to open page: {}", e))?;

    if let Some(user_agent) = user_agent {
        page.set_user_agent(user_agent)
            .await
            .map_err(|e| format!("failed to set user agent: {}", e))?;
    }

    Ok(page)
}

struct ChromiumSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
}

/// Navigates and waits until the page's network traffic settles
///
/// Listeners are attached before navigation so the requests the page issues
/// while loading are counted.
async fn navigate_until_idle(page: &Page, url: &Url, ready: &ReadySignal) -> Result<(), String> {
    let deadline = tokio::time::Instant::now() + ready.timeout;

    let listener_error = |e: chromiumoxide::error::CdpError| format!("network listener: {}", e);
    let mut started = page
        .event_listener::<EventRequestWillBeSent>()
        .await
        .map_err(listener_error)?;
    let mut finished = page
        .event_listener::<EventLoadingFinished>()
        .await
        .map_err(listener_error)?;
    let mut failed = page
        .event_listener::<EventLoadingFailed>()
        .await
        .map_err(listener_error)?;

    tokio::time::timeout_at(deadline, page.goto(url.as_str()))
        .await
        .map_err(|_| format!("navigation timed out after {:?}", ready.timeout))?
        .map_err(|e| format!("navigation failed: {}", e))?;

    let mut idle = NetworkIdle::new(ready, Instant::now());
    loop {
        let now = Instant::now();
        if idle.is_idle(now) {
            tracing::debug!("Network idle for {} ({} in flight)", url, idle.inflight());
            return Ok(());
        }
        if tokio::time::Instant::now() >= deadline {
            return Err(format!(
                "network did not settle within {:?} ({} requests in flight)",
                ready.timeout,
                idle.inflight()
            ));
        }

        let nap = idle.time_until_idle(now).unwrap_or(ready.idle_window);
        let wake = (tokio::time::Instant::now() + nap).min(deadline);

        tokio::select! {
            Some(event) = started.next() => {
                idle.request_started(event.request_id.inner(), Instant::now());
            }
            Some(event) = finished.next() => {
                idle.request_finished(event.request_id.inner(), Instant::now());
            }
            Some(event) = failed.next() => {
                idle.request_finished(event.request_id.inner(), Instant::now());
            }
            _ = tokio::time::sleep_until(wake) => {}
        }
    }
}

#[async_trait]
impl RenderSession for ChromiumSession {
    async fn navigate(&mut self, url: &Url, ready: &ReadySignal) -> Result<(), String> {
        navigate_until_idle(&self.page, url, ready).await
    }

    async fn evaluate(&mut self, script: &str) -> Result<serde_json::Value, String> {
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| format!("script evaluation failed: {}", e))?;

        Ok(result.value().cloned().unwrap_or(serde_json::Value::Null))
    }

    async fn query_hrefs(&mut self, selector: &str) -> Result<Vec<String>, String> {
        let selector = serde_json::to_string(selector).map_err(|e| e.to_string())?;
        let script = format!(
            "Array.from(document.querySelectorAll({}), a => typeof a.href === 'string' ? a.href : a.getAttribute('href'))",
            selector
        );

        let value = self.evaluate(&script).await?;
        let hrefs: Vec<Option<String>> =
            serde_json::from_value(value).map_err(|e| format!("unexpected anchor list: {}", e))?;

        Ok(hrefs.into_iter().flatten().collect())
    }

    async fn close(mut self: Box<Self>) -> Result<(), String> {
        let closed = self
            .browser
            .close()
            .await
            .map(|_| ())
            .map_err(|e| format!("failed to close browser: {}", e));

        if closed.is_err() {
            let _ = self.browser.kill().await;
        }
        let _ = self.browser.wait().await;
        self.handler_task.abort();

        tracing::debug!("Closed browser session");
        closed
    }
}
