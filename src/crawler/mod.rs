//! Crawler module for product URL discovery
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching and static HTML link extraction
//! - Browser rendering with scroll-until-stable
//! - Per-site phase merging with failure isolation
//! - Overall batch coordination under a concurrency cap

mod coordinator;
mod extract;
mod fetcher;
#[cfg(test)]
mod mock;
mod parser;
pub mod render;
mod result;
mod site;

pub use coordinator::{prepare_seeds, Coordinator, Seed};
pub use extract::{collect_product_urls, extract_rendered, extract_static};
pub use fetcher::{build_http_client, FetchedPage, HttpFetcher, PageFetcher};
pub use parser::{extract_anchor_hrefs, is_html_content_type, ANCHOR_SELECTOR};
pub use render::{ChromiumRenderer, ReadySignal, RenderSession, Renderer};
pub use result::CrawlResult;
pub use site::{merge_outcomes, Phase, PhaseOutcome, SiteCrawler};

use crate::config::Config;
use crate::Result;
use std::collections::BTreeSet;

/// Absolute product URLs found for one seed
///
/// Ordered so reports are deterministic regardless of phase completion order.
pub type ProductUrlSet = BTreeSet<String>;

/// Runs a complete crawl operation
///
/// This is the main entry point for a batch. It will:
/// 1. Build the HTTP client, classifier, and (if enabled) browser renderer
/// 2. Validate and de-duplicate the configured seeds
/// 3. Crawl every seed, at most `crawler.concurrency` at a time
/// 4. Return one entry per seed
///
/// # Arguments
///
/// * `config` - The crawler configuration, seeds included
///
/// # Returns
///
/// * `Ok(CrawlResult)` - Every seed has an entry, possibly empty
/// * `Err(TrawlerError)` - Setup failed or the seed list was invalid
pub async fn crawl(config: &Config) -> Result<CrawlResult> {
    let site_crawler = SiteCrawler::from_config(config)?;
    let coordinator = Coordinator::new(site_crawler, config.crawler.concurrency as usize)?;
    coordinator.crawl_all(&config.seeds).await
}
