//! Product-page URL heuristic
//!
//! A URL is a product candidate when at least one of its path segments
//! matches a configured [`SegmentPattern`] and none of the configured
//! exclusion substrings appear anywhere in it.

use crate::config::ClassifierConfig;
use crate::url::{CandidateLink, SegmentPattern};
use crate::ConfigResult;
use url::Url;

/// Decides whether a URL points at a product detail page
#[derive(Debug, Clone)]
pub struct ProductClassifier {
    patterns: Vec<SegmentPattern>,
    exclusions: Vec<String>,
}

impl ProductClassifier {
    /// Builds a classifier from ordered patterns and exclusion substrings
    pub fn new(patterns: Vec<SegmentPattern>, exclusions: Vec<String>) -> Self {
        Self {
            patterns,
            exclusions: exclusions.into_iter().map(|e| e.to_lowercase()).collect(),
        }
    }

    /// Builds a classifier from configuration
    ///
    /// When `exclusions_enabled` is false the exclusion list is ignored.
    pub fn from_config(config: &ClassifierConfig) -> ConfigResult<Self> {
        let patterns = config
            .patterns
            .iter()
            .map(|p| SegmentPattern::parse(p))
            .collect::<Result<Vec<_>, _>>()?;

        let exclusions = if config.exclusions_enabled {
            config.exclusions.clone()
        } else {
            Vec::new()
        };

        Ok(Self::new(patterns, exclusions))
    }

    /// Returns true if the URL looks like a product page
    ///
    /// # Examples
    ///
    /// ```
    /// use product_trawler::url::ProductClassifier;
    ///
    /// let classifier = ProductClassifier::default();
    /// assert!(classifier.is_product_url("https://x.com/product/123"));
    /// assert!(!classifier.is_product_url("https://x.com/products/privacy-policy"));
    /// assert!(!classifier.is_product_url("https://x.com/about"));
    /// ```
    pub fn is_product_url(&self, url: &str) -> bool {
        let lowered = url.to_lowercase();
        if self.exclusions.iter().any(|e| lowered.contains(e.as_str())) {
            return false;
        }

        path_segments(url)
            .iter()
            .any(|segment| self.patterns.iter().any(|p| p.matches(segment)))
    }

    /// Resolves a candidate link and keeps it only if it is a product URL
    pub fn classify(&self, link: &CandidateLink<'_>) -> Option<Url> {
        link.resolve()
            .filter(|resolved| self.is_product_url(resolved.as_str()))
    }
}

impl Default for ProductClassifier {
    /// Same heuristic as [`ClassifierConfig::default`]
    fn default() -> Self {
        Self::new(
            vec![
                SegmentPattern::Contains("product".to_string()),
                SegmentPattern::Contains("item".to_string()),
                SegmentPattern::Exact("p".to_string()),
                SegmentPattern::Contains("products".to_string()),
            ],
            vec!["privacy".to_string(), "terms".to_string()],
        )
    }
}

/// Splits the path of a URL into its non-empty segments
///
/// Strings that do not parse as absolute URLs are treated as a bare path.
fn path_segments(url: &str) -> Vec<String> {
    match Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()
            .map(|segments| {
                segments
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default(),
        Err(_) => {
            let path = url.split(['?', '#']).next().unwrap_or_default();
            path.split('/')
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        }
    }
}
