//! Crawler coordinator - batch orchestration across seeds
//!
//! This module fans site crawls out over a seed list:
//! - Validating seeds and grouping spellings of the same URL
//! - Bounding concurrent site crawls with a semaphore
//! - Containing panics so every seed still gets a result
//! - Collecting the per-seed results in input order

use crate::crawler::{CrawlResult, ProductUrlSet, SiteCrawler};
use crate::url::parse_seed;
use crate::{Result, TrawlerError};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use url::Url;

/// A distinct seed URL and every spelling of it the user gave
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seed {
    pub url: Url,

    /// Trimmed seed strings that parse to `url`, in input order
    pub labels: Vec<String>,
}

/// Validates seeds and groups those that resolve to the same URL
///
/// Groups keep the order of their first occurrence. A seed repeated verbatim
/// contributes a single label.
///
/// # Errors
///
/// * `TrawlerError::NoSeeds` - the list is empty
/// * `TrawlerError::InvalidSeed` - a seed is not an absolute HTTP(S) URL
pub fn prepare_seeds<S: AsRef<str>>(seeds: &[S]) -> Result<Vec<Seed>> {
    if seeds.is_empty() {
        return Err(TrawlerError::NoSeeds);
    }

    let mut index: HashMap<Url, usize> = HashMap::new();
    let mut prepared: Vec<Seed> = Vec::with_capacity(seeds.len());

    for raw in seeds {
        let label = raw.as_ref().trim().to_string();
        let url = parse_seed(&label).map_err(|source| TrawlerError::InvalidSeed {
            url: label.clone(),
            source,
        })?;

        match index.get(&url) {
            Some(&i) => {
                let seed = &mut prepared[i];
                if !seed.labels.contains(&label) {
                    tracing::debug!("Seed {} shares a crawl with {}", label, seed.labels[0]);
                    seed.labels.push(label);
                }
            }
            None => {
                index.insert(url.clone(), prepared.len());
                prepared.push(Seed {
                    url,
                    labels: vec![label],
                });
            }
        }
    }

    Ok(prepared)
}

/// Main crawler coordinator structure
///
/// Owns the concurrency limiter; a permit is held for the whole of each site
/// crawl, both phases included.
pub struct Coordinator {
    site_crawler: Arc<SiteCrawler>,
    semaphore: Arc<Semaphore>,
    concurrency: usize,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `site_crawler` - Crawls a single seed
    /// * `concurrency` - Maximum number of site crawls in progress at once
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(TrawlerError::ZeroConcurrency)` - `concurrency` was zero
    pub fn new(site_crawler: SiteCrawler, concurrency: usize) -> Result<Self> {
        if concurrency == 0 {
            return Err(TrawlerError::ZeroConcurrency);
        }

        Ok(Self {
            site_crawler: Arc::new(site_crawler),
            semaphore: Arc::new(Semaphore::new(concurrency)),
            concurrency,
        })
    }

    /// Crawls every seed and returns exactly one entry per input seed
    ///
    /// Seeds are validated up front; nothing is scheduled if any is invalid.
    /// Each distinct URL runs in its own task, and every spelling of it gets
    /// an entry holding the same set. A task that panics is logged and
    /// recorded as an empty set, so one fault never costs the other seeds
    /// their results. Returns once every seed has an entry.
    pub async fn crawl_all<S: AsRef<str>>(&self, seeds: &[S]) -> Result<CrawlResult> {
        let labels: Vec<&str> = seeds.iter().map(|s| s.as_ref().trim()).collect();
        let seeds = prepare_seeds(seeds)?;
        let start_time = Instant::now();

        tracing::info!(
            "Crawling {} sites, at most {} at a time",
            seeds.len(),
            self.concurrency
        );

        let mut handles = Vec::with_capacity(seeds.len());
        for seed in seeds {
            let site_crawler = Arc::clone(&self.site_crawler);
            let semaphore = Arc::clone(&self.semaphore);
            let url = seed.url.clone();

            let handle = tokio::spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    tracing::error!("Concurrency limiter closed before crawling {}", url);
                    return ProductUrlSet::new();
                };

                tracing::info!("Crawling: {}", url);
                let site_start = Instant::now();
                let urls = site_crawler.crawl_site(&url).await;
                tracing::info!(
                    "Finished {}: {} product URLs in {:?}",
                    url,
                    urls.len(),
                    site_start.elapsed()
                );
                urls
            });

            handles.push((seed, handle));
        }

        let mut by_label = HashMap::with_capacity(labels.len());
        for (seed, handle) in handles {
            let urls = match handle.await {
                Ok(urls) => urls,
                Err(e) => {
                    tracing::error!("Error crawling {}: {}", seed.url, e);
                    ProductUrlSet::new()
                }
            };
            for label in seed.labels {
                by_label.insert(label, urls.clone());
            }
        }

        let mut result = CrawlResult::with_capacity(labels.len());
        for label in labels {
            if let Some(urls) = by_label.get(label) {
                result.insert(label, urls.clone());
            }
        }

        tracing::info!(
            "Crawling completed: {} sites, {} product URLs in {:?}",
            result.len(),
            result.total_urls(),
            start_time.elapsed()
        );

        Ok(result)
    }
}
