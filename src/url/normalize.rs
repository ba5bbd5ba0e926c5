use crate::{UrlError, UrlResult};
use url::Url;

/// Parses a seed URL, accepting only absolute HTTP(S) URLs with a host
///
/// # Examples
///
/// ```
/// use product_trawler::url::parse_seed;
///
/// let seed = parse_seed("https://shop.test").unwrap();
/// assert_eq!(seed.as_str(), "https://shop.test/");
/// assert!(parse_seed("shop.test").is_err());
/// ```
pub fn parse_seed(seed: &str) -> UrlResult<Url> {
    let url = Url::parse(seed.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    Ok(url)
}

/// A raw `href` together with the page URL it was found on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateLink<'a> {
    pub href: &'a str,
    pub base: &'a Url,
}

impl<'a> CandidateLink<'a> {
    pub fn new(href: &'a str, base: &'a Url) -> Self {
        Self { href, base }
    }

    /// Resolves the href to an absolute URL
    ///
    /// Returns None if the link should be excluded:
    /// - empty or fragment-only hrefs (same page anchors)
    /// - javascript:, mailto:, tel:, data: schemes
    /// - hrefs that fail to resolve
    /// - non-HTTP(S) URLs after resolution
    ///
    /// The fragment of the resolved URL is dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use product_trawler::url::CandidateLink;
    /// use url::Url;
    ///
    /// let base = Url::parse("https://shop.test/catalog/").unwrap();
    /// let link = CandidateLink::new("../product/1#reviews", &base);
    /// assert_eq!(link.resolve().unwrap().as_str(), "https://shop.test/product/1");
    /// ```
    pub fn resolve(&self) -> Option<Url> {
        let href = self.href.trim();

        if href.is_empty() || href.starts_with('#') {
            return None;
        }

        let lowered = href.to_ascii_lowercase();
        if lowered.starts_with("javascript:")
            || lowered.starts_with("mailto:")
            || lowered.starts_with("tel:")
            || lowered.starts_with("data:")
        {
            return None;
        }

        let mut absolute = self.base.join(href).ok()?;
        if absolute.scheme() != "http" && absolute.scheme() != "https" {
            return None;
        }

        absolute.set_fragment(None);
        Some(absolute)
    }
}
