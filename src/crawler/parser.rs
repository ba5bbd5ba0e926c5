//! HTML query for anchor targets
//!
//! The static phase only needs the raw `href` value of every `<a href>`;
//! resolution and classification happen afterwards.

use scraper::{Html, Selector};

/// Selector used by both extraction phases
pub const ANCHOR_SELECTOR: &str = "a[href]";

/// Parses HTML content and returns the raw `href` of every anchor
///
/// # Returns
///
/// * `Ok(Vec<String>)` - hrefs in document order (may be empty)
/// * `Err(String)` - the body is empty or the selector is invalid
///
/// # Example
///
/// ```
/// use product_trawler::crawler::extract_anchor_hrefs;
///
/// let html = r#"<html><body><a href="/product/1">One</a><a>none</a></body></html>"#;
/// assert_eq!(extract_anchor_hrefs(html).unwrap(), vec!["/product/1".to_string()]);
/// ```
pub fn extract_anchor_hrefs(html: &str) -> Result<Vec<String>, String> {
    if html.trim().is_empty() {
        return Err("empty document".to_string());
    }

    let selector = Selector::parse(ANCHOR_SELECTOR)
        .map_err(|e| format!("invalid selector '{}': {:?}", ANCHOR_SELECTOR, e))?;

    let document = Html::parse_document(html);
    let hrefs = document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect();

    Ok(hrefs)
}

/// Returns true if a Content-Type header denotes an HTML document
pub fn is_html_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "text/html" || mime == "application/xhtml+xml"
}
