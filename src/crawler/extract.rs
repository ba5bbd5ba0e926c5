//! The two extraction phases run against every seed
//!
//! - Static: one HTTP fetch, anchors read from the server's HTML
//! - Rendered: a browser session that waits for the network to settle,
//!   scrolls until the page stops growing, then reads anchors from the
//!   live document
//!
//! Both resolve every href against the seed and keep only product URLs.

use crate::config::RenderConfig;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::parser::{extract_anchor_hrefs, is_html_content_type, ANCHOR_SELECTOR};
use crate::crawler::render::{scroll_until_stable, ReadySignal, RenderSession, Renderer};
use crate::crawler::ProductUrlSet;
use crate::url::{CandidateLink, ProductClassifier};
use crate::{ExtractError, ExtractResult};
use url::Url;

/// Resolves and classifies hrefs found on `base`, collecting product URLs
pub fn collect_product_urls<'a>(
    classifier: &ProductClassifier,
    base: &Url,
    hrefs: impl IntoIterator<Item = &'a str>,
) -> ProductUrlSet {
    hrefs
        .into_iter()
        .filter_map(|href| classifier.classify(&CandidateLink::new(href, base)))
        .map(String::from)
        .collect()
}

/// Static phase: fetch the seed's HTML and extract product links
///
/// # Errors
///
/// * `ExtractError::Fetch` - transport failure or non-2xx response
/// * `ExtractError::Parse` - non-HTML content type or empty body
pub async fn extract_static(
    fetcher: &dyn PageFetcher,
    classifier: &ProductClassifier,
    seed: &Url,
) -> ExtractResult<ProductUrlSet> {
    let page = fetcher.fetch(seed).await?;

    if let Some(content_type) = page.content_type.as_deref() {
        if !is_html_content_type(content_type) {
            return Err(ExtractError::parse(
                seed.as_str(),
                format!("expected HTML, got {}", content_type),
            ));
        }
    }

    let hrefs =
        extract_anchor_hrefs(&page.body).map_err(|e| ExtractError::parse(seed.as_str(), e))?;
    let urls = collect_product_urls(classifier, seed, hrefs.iter().map(String::as_str));

    tracing::debug!(
        "Static phase for {}: {} anchors, {} product URLs (HTTP {}, final URL {})",
        seed,
        hrefs.len(),
        urls.len(),
        page.status_code,
        page.final_url
    );

    Ok(urls)
}

/// Rendered phase: load the seed in a browser session and extract product links
///
/// The session is closed on every path out of this function once it has been
/// opened; a failure to close is logged and does not change the result.
///
/// # Errors
///
/// * `ExtractError::Render` - session creation, navigation, or script failure
pub async fn extract_rendered(
    renderer: &dyn Renderer,
    classifier: &ProductClassifier,
    render: &RenderConfig,
    seed: &Url,
) -> ExtractResult<ProductUrlSet> {
    let mut session = renderer.open_session().await.map_err(|e| {
        ExtractError::render(seed.as_str(), format!("could not open session: {}", e))
    })?;

    let outcome = drive_session(session.as_mut(), classifier, render, seed).await;

    if let Err(e) = session.close().await {
        tracing::warn!("Failed to close rendering session for {}: {}", seed, e);
    }

    outcome
}

async fn drive_session(
    session: &mut dyn RenderSession,
    classifier: &ProductClassifier,
    render: &RenderConfig,
    seed: &Url,
) -> ExtractResult<ProductUrlSet> {
    let render_error = |e: String| ExtractError::render(seed.as_str(), e);

    session
        .navigate(seed, &ReadySignal::from(render))
        .await
        .map_err(render_error)?;

    let scroll = scroll_until_stable(
        session,
        render.settle_interval(),
        render.max_scroll_iterations,
    )
    .await
    .map_err(render_error)?;

    let hrefs = session
        .query_hrefs(ANCHOR_SELECTOR)
        .await
        .map_err(render_error)?;
    let urls = collect_product_urls(classifier, seed, hrefs.iter().map(String::as_str));

    tracing::debug!(
        "Rendered phase for {}: {} scrolls (final height {}), {} anchors, {} product URLs",
        seed,
        scroll.scrolls,
        scroll.final_height,
        hrefs.len(),
        urls.len()
    );

    Ok(urls)
}
