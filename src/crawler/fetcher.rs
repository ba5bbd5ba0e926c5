//! HTTP fetcher implementation
//!
//! This module handles the single outbound request the static phase makes per
//! site:
//! - Building the HTTP client with the configured user agent and timeout
//! - GET requests following the client's redirect policy
//! - Error classification into [`ExtractError::Fetch`]

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::ExtractError;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: String,

    /// HTTP status code
    pub status_code: u16,

    /// Content-Type header value, if the server sent one
    pub content_type: Option<String>,

    /// Page body content
    pub body: String,
}

/// Retrieves raw page bodies
///
/// Implementations fail with [`ExtractError::Fetch`] on transport errors and
/// non-2xx responses.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, ExtractError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `crawler` - Supplies the request timeout
/// * `user_agent` - Custom user agent, applied only when enabled
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use product_trawler::config::{CrawlerConfig, UserAgentConfig};
/// use product_trawler::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlerConfig::default(), &UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    crawler: &CrawlerConfig,
    user_agent: &UserAgentConfig,
) -> Result<Client, reqwest::Error> {
    let user_agent = user_agent
        .custom()
        .map(str::to_string)
        .unwrap_or_else(|| format!("product-trawler/{}", env!("CARGO_PKG_VERSION")));

    Client::builder()
        .user_agent(user_agent)
        .timeout(crawler.request_timeout())
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`PageFetcher`] backed by a `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_config(
        crawler: &CrawlerConfig,
        user_agent: &UserAgentConfig,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(crawler, user_agent)?))
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    /// Fetches a URL and classifies failures
    ///
    /// | Condition | Reason |
    /// |-----------|--------|
    /// | Non-2xx status | `HTTP <code>` |
    /// | Timeout | `Request timeout` |
    /// | Connection failure | `Connection failed: ...` |
    /// | Body read failure | the transport error |
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, ExtractError> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| ExtractError::fetch(url.as_str(), classify_transport_error(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractError::fetch(
                url.as_str(),
                format!("HTTP {}", status.as_u16()),
            ));
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response
            .text()
            .await
            .map_err(|e| ExtractError::fetch(url.as_str(), classify_transport_error(&e)))?;

        Ok(FetchedPage {
            final_url,
            status_code: status.as_u16(),
            content_type,
            body,
        })
    }
}

fn classify_transport_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "Request timeout".to_string()
    } else if error.is_connect() {
        format!("Connection failed: {}", error)
    } else if error.is_redirect() {
        format!("Redirect error: {}", error)
    } else {
        error.to_string()
    }
}
