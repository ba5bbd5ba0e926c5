use crate::{ConfigError, ConfigResult};

/// A compiled path-segment pattern
///
/// Patterns use a small wildcard syntax where `*` may appear only at the
/// start and/or end:
///
/// 1. Exact: `"p"` matches only the segment `p`
/// 2. Prefix: `"product*"` matches `product`, `products`, `product-123`
/// 3. Suffix: `"*-item"` matches `sale-item`
/// 4. Contains: `"*product*"` matches `all-products`, `product`
///
/// Matching is case-insensitive.
///
/// # Examples
///
/// ```
/// use product_trawler::url::SegmentPattern;
///
/// let pattern = SegmentPattern::parse("*product*").unwrap();
/// assert!(pattern.matches("Featured-Products"));
/// assert!(!pattern.matches("about"));
///
/// let exact = SegmentPattern::parse("p").unwrap();
/// assert!(exact.matches("p"));
/// assert!(!exact.matches("pages"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentPattern {
    Exact(String),
    Prefix(String),
    Suffix(String),
    Contains(String),
}

impl SegmentPattern {
    /// Parses a wildcard pattern string
    ///
    /// # Returns
    ///
    /// * `Ok(SegmentPattern)` - The compiled pattern
    /// * `Err(ConfigError::InvalidPattern)` - Empty pattern, a bare `*`,
    ///   an interior `*`, or a `/` (patterns apply to single segments)
    pub fn parse(pattern: &str) -> ConfigResult<Self> {
        let lowered = pattern.trim().to_lowercase();

        if lowered.contains('/') {
            return Err(ConfigError::InvalidPattern(format!(
                "'{}' must describe a single path segment (no '/')",
                pattern
            )));
        }

        let (leading, rest) = match lowered.strip_prefix('*') {
            Some(rest) => (true, rest),
            None => (false, lowered.as_str()),
        };
        let (trailing, core) = match rest.strip_suffix('*') {
            Some(core) => (true, core),
            None => (false, rest),
        };

        if core.is_empty() {
            return Err(ConfigError::InvalidPattern(format!(
                "'{}' has no literal text to match",
                pattern
            )));
        }

        if core.contains('*') {
            return Err(ConfigError::InvalidPattern(format!(
                "'{}' may only use '*' at its start or end",
                pattern
            )));
        }

        let core = core.to_string();
        Ok(match (leading, trailing) {
            (false, false) => Self::Exact(core),
            (false, true) => Self::Prefix(core),
            (true, false) => Self::Suffix(core),
            (true, true) => Self::Contains(core),
        })
    }

    /// Checks whether a single path segment matches this pattern
    pub fn matches(&self, segment: &str) -> bool {
        let segment = segment.to_lowercase();
        match self {
            Self::Exact(text) => segment == *text,
            Self::Prefix(text) => segment.starts_with(text.as_str()),
            Self::Suffix(text) => segment.ends_with(text.as_str()),
            Self::Contains(text) => segment.contains(text.as_str()),
        }
    }
}
