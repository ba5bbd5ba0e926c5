//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and a scripted
//! in-process renderer to exercise the full crawl cycle end-to-end.

use async_trait::async_trait;
use product_trawler::config::{Config, CrawlerConfig, RenderConfig, UserAgentConfig};
use product_trawler::crawler::{
    crawl, extract_static, Coordinator, HttpFetcher, PageFetcher, ReadySignal, RenderSession,
    Renderer, SiteCrawler,
};
use product_trawler::output::{render_report, ReportFormat};
use product_trawler::{ExtractError, ProductClassifier, ProductUrlSet};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HOME_PAGE: &str = r#"<html><head><title>Shop</title></head><body>
    <a href="/product/1">One</a>
    <a href="/about">About</a>
    <a href="/item/2?ref=home">Two</a>
    <a href="/privacy-policy/p/3">Privacy</a>
    <a href="mailto:sales@shop.test">Mail</a>
</body></html>"#;

/// Renderer whose pages grow twice, then expose a fixed set of links
#[derive(Default)]
struct ScriptedRenderer {
    links: HashMap<String, Vec<String>>,
    fail: bool,
    hold: Duration,
    active: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
    closed: Arc<AtomicUsize>,
}

impl ScriptedRenderer {
    fn with_links(mut self, page: &str, links: &[&str]) -> Self {
        self.links
            .insert(page.to_string(), links.iter().map(|l| l.to_string()).collect());
        self
    }
}

#[async_trait]
impl Renderer for ScriptedRenderer {
    async fn open_session(&self) -> Result<Box<dyn RenderSession>, String> {
        if self.fail {
            return Err("chromium not installed".to_string());
        }
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        Ok(Box::new(ScriptedSession {
            links: self.links.clone(),
            heights: vec![800, 1600, 1600],
            hold: self.hold,
            current: None,
            active: Arc::clone(&self.active),
            closed: Arc::clone(&self.closed),
        }))
    }
}

struct ScriptedSession {
    links: HashMap<String, Vec<String>>,
    heights: Vec<u64>,
    hold: Duration,
    current: Option<String>,
    active: Arc<AtomicUsize>,
    closed: Arc<AtomicUsize>,
}

#[async_trait]
impl RenderSession for ScriptedSession {
    async fn navigate(&mut self, url: &Url, _ready: &ReadySignal) -> Result<(), String> {
        tokio::time::sleep(self.hold).await;
        self.current = Some(url.to_string());
        Ok(())
    }

    async fn evaluate(&mut self, script: &str) -> Result<serde_json::Value, String> {
        if script.contains("scrollTo") {
            return Ok(serde_json::Value::Null);
        }
        let height = if self.heights.len() > 1 {
            self.heights.remove(0)
        } else {
            self.heights.first().copied().unwrap_or(0)
        };
        Ok(serde_json::json!(height))
    }

    async fn query_hrefs(&mut self, _selector: &str) -> Result<Vec<String>, String> {
        Ok(self
            .current
            .as_ref()
            .and_then(|page| self.links.get(page))
            .cloned()
            .unwrap_or_default())
    }

    async fn close(self: Box<Self>) -> Result<(), String> {
        self.active.fetch_sub(1, Ordering::SeqCst);
        self.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn fast_render() -> RenderConfig {
    RenderConfig {
        settle_interval: 0,
        ..RenderConfig::default()
    }
}

fn http_fetcher() -> HttpFetcher {
    let crawler = CrawlerConfig {
        request_timeout: 5_000,
        ..CrawlerConfig::default()
    };
    HttpFetcher::from_config(&crawler, &UserAgentConfig::default()).expect("Failed to build client")
}

fn site_crawler(renderer: Option<ScriptedRenderer>) -> SiteCrawler {
    SiteCrawler::new(
        Arc::new(http_fetcher()),
        renderer.map(|r| Arc::new(r) as Arc<dyn Renderer>),
        ProductClassifier::default(),
        fast_render(),
    )
}

async fn mount_home(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8"))
        .mount(server)
        .await;
}

fn url_set(urls: &[String]) -> ProductUrlSet {
    urls.iter().cloned().collect()
}

#[tokio::test]
async fn test_http_fetcher_sends_custom_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "TrawlerTest/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(HOME_PAGE, "text/html"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let crawler = CrawlerConfig::default();
    let user_agent = UserAgentConfig {
        enabled: true,
        value: "TrawlerTest/1.0".to_string(),
    };
    let fetcher = HttpFetcher::from_config(&crawler, &user_agent).unwrap();

    let seed = Url::parse(&mock_server.uri()).unwrap();
    let page = fetcher.fetch(&seed).await.unwrap();

    assert_eq!(page.status_code, 200);
    assert_eq!(page.content_type.as_deref(), Some("text/html"));
    assert!(page.body.contains("/product/1"));
}

#[tokio::test]
async fn test_static_phase_against_http_server() {
    let mock_server = MockServer::start().await;
    mount_home(&mock_server, HOME_PAGE).await;
    let base = mock_server.uri();

    let seed = Url::parse(&base).unwrap();
    let urls = extract_static(&http_fetcher(), &ProductClassifier::default(), &seed)
        .await
        .unwrap();

    assert_eq!(
        urls,
        url_set(&[format!("{}/item/2?ref=home", base), format!("{}/product/1", base)])
    );
}

#[tokio::test]
async fn test_static_phase_http_error_is_fetch_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let seed = Url::parse(&mock_server.uri()).unwrap();
    let result = extract_static(&http_fetcher(), &ProductClassifier::default(), &seed).await;

    match result {
        Err(ExtractError::Fetch { reason, .. }) => assert_eq!(reason, "HTTP 503"),
        other => panic!("expected fetch error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_static_phase_non_html_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("%PDF-1.4", "application/pdf"))
        .mount(&mock_server)
        .await;

    let seed = Url::parse(&mock_server.uri()).unwrap();
    let result = extract_static(&http_fetcher(), &ProductClassifier::default(), &seed).await;

    assert!(matches!(result, Err(ExtractError::Parse { .. })));
}

#[tokio::test]
async fn test_site_crawl_merges_both_phases() {
    let mock_server = MockServer::start().await;
    mount_home(&mock_server, HOME_PAGE).await;
    let base = mock_server.uri();
    let seed = Url::parse(&base).unwrap();

    let renderer = ScriptedRenderer::default().with_links(
        seed.as_str(),
        &[
            &format!("{}/product/1", base),
            &format!("{}/products/lazy-loaded", base),
            &format!("{}/terms", base),
        ],
    );

    let urls = site_crawler(Some(renderer)).crawl_site(&seed).await;

    assert_eq!(
        urls,
        url_set(&[
            format!("{}/item/2?ref=home", base),
            format!("{}/product/1", base),
            format!("{}/products/lazy-loaded", base),
        ])
    );
}

#[tokio::test]
async fn test_site_crawl_survives_renderer_failure() {
    let mock_server = MockServer::start().await;
    mount_home(&mock_server, HOME_PAGE).await;
    let seed = Url::parse(&mock_server.uri()).unwrap();

    let renderer = ScriptedRenderer {
        fail: true,
        ..ScriptedRenderer::default()
    };

    let urls = site_crawler(Some(renderer)).crawl_site(&seed).await;

    assert_eq!(urls.len(), 2);
}

#[tokio::test]
async fn test_site_crawl_survives_http_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let base = mock_server.uri();
    let seed = Url::parse(&base).unwrap();
    let renderer =
        ScriptedRenderer::default().with_links(seed.as_str(), &[&format!("{}/p/99", base)]);

    let urls = site_crawler(Some(renderer)).crawl_site(&seed).await;

    assert_eq!(urls, url_set(&[format!("{}/p/99", base)]));
}

#[tokio::test]
async fn test_batch_reports_every_seed() {
    let healthy = MockServer::start().await;
    mount_home(&healthy, HOME_PAGE).await;

    let broken = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&broken)
        .await;

    let coordinator = Coordinator::new(site_crawler(None), 2).unwrap();
    let seeds = vec![healthy.uri(), broken.uri()];

    let result = coordinator.crawl_all(&seeds).await.unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(result.get(&healthy.uri()).map(|u| u.len()), Some(2));
    assert_eq!(result.get(&broken.uri()), Some(&ProductUrlSet::new()));
}

#[tokio::test]
async fn test_batch_respects_concurrency_cap() {
    let mut servers = Vec::new();
    for _ in 0..5 {
        let server = MockServer::start().await;
        mount_home(&server, HOME_PAGE).await;
        servers.push(server);
    }

    let peak = Arc::new(AtomicUsize::new(0));
    let closed = Arc::new(AtomicUsize::new(0));
    let renderer = ScriptedRenderer {
        hold: Duration::from_millis(50),
        peak: Arc::clone(&peak),
        closed: Arc::clone(&closed),
        ..ScriptedRenderer::default()
    };

    let coordinator = Coordinator::new(site_crawler(Some(renderer)), 2).unwrap();
    let seeds: Vec<String> = servers.iter().map(|s| s.uri()).collect();

    let result = coordinator.crawl_all(&seeds).await.unwrap();

    assert_eq!(result.len(), 5);
    assert!(peak.load(Ordering::SeqCst) <= 2);
    assert_eq!(closed.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn test_full_crawl_from_config() {
    let mock_server = MockServer::start().await;
    mount_home(&mock_server, HOME_PAGE).await;
    let base = mock_server.uri();

    let mut config = Config::default();
    config.seeds = vec![base.clone()];
    config.crawler.render = false;
    config.classifier.exclusions_enabled = false;

    let result = crawl(&config).await.unwrap();

    // With exclusions off the privacy link is kept
    assert_eq!(
        result.get(&base),
        Some(&url_set(&[
            format!("{}/item/2?ref=home", base),
            format!("{}/privacy-policy/p/3", base),
            format!("{}/product/1", base),
        ]))
    );

    let report = render_report(&result, ReportFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&report).unwrap();
    assert_eq!(value[&base].as_array().map(|a| a.len()), Some(3));
}

#[tokio::test]
async fn test_full_crawl_rejects_invalid_seed() {
    let mut config = Config::default();
    config.seeds = vec!["ftp://files.example.com".to_string()];
    config.crawler.render = false;

    assert!(crawl(&config).await.is_err());
}

#[tokio::test]
async fn test_full_crawl_keys_every_seed_spelling() {
    let mock_server = MockServer::start().await;
    mount_home(&mock_server, HOME_PAGE).await;
    let base = mock_server.uri();
    let with_slash = format!("{}/", base);

    let mut config = Config::default();
    config.seeds = vec![base.clone(), with_slash.clone()];
    config.crawler.render = false;

    let result = crawl(&config).await.unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(result.get(&base).map(|u| u.len()), Some(2));
    assert_eq!(result.get(&base), result.get(&with_slash));
}
