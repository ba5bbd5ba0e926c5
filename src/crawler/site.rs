//! Per-site crawl: both extraction phases merged into one URL set

use crate::config::{Config, RenderConfig};
use crate::crawler::extract::{extract_rendered, extract_static};
use crate::crawler::fetcher::{HttpFetcher, PageFetcher};
use crate::crawler::render::{ChromiumRenderer, Renderer};
use crate::crawler::ProductUrlSet;
use crate::url::ProductClassifier;
use crate::{ExtractError, ExtractResult, Result};
use std::fmt;
use std::sync::Arc;
use url::Url;

/// Which extraction phase produced an outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Static,
    Rendered,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static => write!(f, "static"),
            Self::Rendered => write!(f, "rendered"),
        }
    }
}

/// Result of one extraction phase for one site
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseOutcome {
    /// The phase ran and found these product URLs (possibly none)
    Found(ProductUrlSet),

    /// The phase failed; it contributes nothing
    Failed(ExtractError),

    /// The phase is disabled by configuration
    Skipped,
}

impl From<ExtractResult<ProductUrlSet>> for PhaseOutcome {
    fn from(result: ExtractResult<ProductUrlSet>) -> Self {
        match result {
            Ok(urls) => Self::Found(urls),
            Err(e) => Self::Failed(e),
        }
    }
}

/// Folds phase outcomes into a single set, logging failures
///
/// The union is order-independent.
pub fn merge_outcomes(
    seed: &Url,
    outcomes: impl IntoIterator<Item = (Phase, PhaseOutcome)>,
) -> ProductUrlSet {
    let mut urls = ProductUrlSet::new();

    for (phase, outcome) in outcomes {
        match outcome {
            PhaseOutcome::Found(found) => {
                tracing::debug!("{} phase found {} product URLs on {}", phase, found.len(), seed);
                urls.extend(found);
            }
            PhaseOutcome::Failed(error) => {
                tracing::warn!("{} phase failed for {}: {}", phase, seed, error);
            }
            PhaseOutcome::Skipped => {
                tracing::trace!("{} phase skipped for {}", phase, seed);
            }
        }
    }

    urls
}

/// Crawls one seed with both phases and isolates their failures
pub struct SiteCrawler {
    fetcher: Arc<dyn PageFetcher>,
    renderer: Option<Arc<dyn Renderer>>,
    classifier: ProductClassifier,
    render: RenderConfig,
}

impl SiteCrawler {
    /// Creates a site crawler from its collaborators
    ///
    /// With `renderer` set to `None` only the static phase runs.
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        renderer: Option<Arc<dyn Renderer>>,
        classifier: ProductClassifier,
        render: RenderConfig,
    ) -> Self {
        Self {
            fetcher,
            renderer,
            classifier,
            render,
        }
    }

    /// Creates a site crawler backed by `reqwest` and headless Chromium
    pub fn from_config(config: &Config) -> Result<Self> {
        let fetcher = HttpFetcher::from_config(&config.crawler, &config.user_agent)?;
        let renderer: Option<Arc<dyn Renderer>> = if config.crawler.render {
            Some(Arc::new(ChromiumRenderer::new(&config.render, &config.user_agent)))
        } else {
            None
        };
        let classifier = ProductClassifier::from_config(&config.classifier)?;

        Ok(Self::new(
            Arc::new(fetcher),
            renderer,
            classifier,
            config.render.clone(),
        ))
    }

    /// Runs both phases for `seed` and returns the merged product URLs
    ///
    /// Never fails: a failed phase is logged and contributes no URLs. The
    /// phases run concurrently and the result is available once both resolve.
    pub async fn crawl_site(&self, seed: &Url) -> ProductUrlSet {
        let static_phase = async {
            PhaseOutcome::from(extract_static(self.fetcher.as_ref(), &self.classifier, seed).await)
        };

        let rendered_phase = async {
            let Some(renderer) = &self.renderer else {
                return PhaseOutcome::Skipped;
            };
            extract_rendered(renderer.as_ref(), &self.classifier, &self.render, seed)
                .await
                .into()
        };

        let (static_outcome, rendered_outcome) = tokio::join!(static_phase, rendered_phase);

        merge_outcomes(
            seed,
            [
                (Phase::Static, static_outcome),
                (Phase::Rendered, rendered_outcome),
            ],
        )
    }
}
