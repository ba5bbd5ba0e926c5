use serde::Deserialize;
use std::time::Duration;

/// Default user agent, mimicking desktop Chrome
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Main configuration structure for Product-Trawler
///
/// Every section is optional; a missing section takes its defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seed URLs to crawl
    pub seeds: Vec<String>,

    pub crawler: CrawlerConfig,

    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,

    pub classifier: ClassifierConfig,

    pub render: RenderConfig,
}

/// Crawl scheduling configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of sites crawled at the same time
    pub concurrency: u32,

    /// Whether the rendered (headless browser) phase runs
    pub render: bool,

    /// Timeout for the static HTTP fetch (milliseconds)
    #[serde(rename = "request-timeout")]
    pub request_timeout: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            concurrency: 5,
            render: true,
            request_timeout: 30_000,
        }
    }
}

impl CrawlerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout)
    }
}

/// User agent presented by both the HTTP client and the browser
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// When false, the HTTP client and browser keep their own user agent
    pub enabled: bool,

    /// The user agent string
    pub value: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            value: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl UserAgentConfig {
    /// The custom user agent, if one should be applied
    pub fn custom(&self) -> Option<&str> {
        self.enabled.then_some(self.value.as_str())
    }
}

/// Product URL heuristic configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Path segment patterns; a URL must match at least one
    pub patterns: Vec<String>,

    /// Substrings that disqualify a URL
    pub exclusions: Vec<String>,

    /// Whether the exclusion list is applied at all
    #[serde(rename = "exclusions-enabled")]
    pub exclusions_enabled: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            patterns: ["*product*", "*item*", "p", "*products*"]
                .into_iter()
                .map(String::from)
                .collect(),
            exclusions: ["privacy", "terms"].into_iter().map(String::from).collect(),
            exclusions_enabled: true,
        }
    }
}

/// Rendered-phase timing configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Upper bound on navigation plus the network-idle wait (milliseconds)
    #[serde(rename = "navigation-timeout")]
    pub navigation_timeout: u64,

    /// How long the network must stay quiet to count as ready (milliseconds)
    #[serde(rename = "idle-window")]
    pub idle_window: u64,

    /// Requests allowed in flight while still considered quiet
    #[serde(rename = "max-inflight-requests")]
    pub max_inflight_requests: usize,

    /// Pause after each scroll for lazy content to load (milliseconds)
    #[serde(rename = "settle-interval")]
    pub settle_interval: u64,

    /// Upper bound on scroll actions per page
    #[serde(rename = "max-scroll-iterations")]
    pub max_scroll_iterations: u32,

    /// Run the browser without a window
    pub headless: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            navigation_timeout: 30_000,
            idle_window: 500,
            max_inflight_requests: 2,
            settle_interval: 2_000,
            max_scroll_iterations: 30,
            headless: true,
        }
    }
}

impl RenderConfig {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout)
    }

    pub fn idle_window(&self) -> Duration {
        Duration::from_millis(self.idle_window)
    }

    pub fn settle_interval(&self) -> Duration {
        Duration::from_millis(self.settle_interval)
    }
}
