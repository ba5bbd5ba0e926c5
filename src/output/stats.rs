//! Batch statistics derived from a crawl result

use crate::crawler::CrawlResult;

/// Crawl statistics summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Number of seeds crawled
    pub seeds: usize,

    /// Seeds with at least one product URL
    pub seeds_with_urls: usize,

    /// Product URLs across all seeds
    pub total_urls: usize,
}

impl CrawlStatistics {
    pub fn from_result(result: &CrawlResult) -> Self {
        Self {
            seeds: result.len(),
            seeds_with_urls: result.iter().filter(|(_, urls)| !urls.is_empty()).count(),
            total_urls: result.total_urls(),
        }
    }

    /// Percentage of seeds that yielded at least one URL
    pub fn hit_rate(&self) -> f64 {
        if self.seeds > 0 {
            (self.seeds_with_urls as f64 / self.seeds as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Emits the statistics as a single info-level log line
pub fn log_statistics(stats: &CrawlStatistics) {
    tracing::info!(
        "Seeds: {}, with product URLs: {} ({:.1}%), total product URLs: {}",
        stats.seeds,
        stats.seeds_with_urls,
        stats.hit_rate(),
        stats.total_urls
    );
}
