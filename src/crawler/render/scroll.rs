use crate::crawler::render::RenderSession;
use std::time::Duration;

/// Script returning the current document height
pub const SCROLL_HEIGHT_SCRIPT: &str = "document.body ? document.body.scrollHeight : 0";

/// Script scrolling the viewport to the bottom of the document
pub const SCROLL_TO_BOTTOM_SCRIPT: &str =
    "window.scrollTo(0, document.body ? document.body.scrollHeight : 0)";

/// How a scroll-until-stable pass ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollOutcome {
    /// Scroll actions performed
    pub scrolls: u32,

    /// Document height after the last scroll
    pub final_height: u64,

    /// False when the iteration cap stopped a still-growing page
    pub stabilized: bool,
}

/// Reads the document height through the session
pub async fn read_scroll_height(session: &mut dyn RenderSession) -> Result<u64, String> {
    let value = session.evaluate(SCROLL_HEIGHT_SCRIPT).await?;
    match value {
        serde_json::Value::Null => Ok(0),
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .ok_or_else(|| format!("scroll height is not a non-negative number: {}", n)),
        other => Err(format!("unexpected scroll height value: {}", other)),
    }
}

/// Scrolls to the bottom until the document stops growing
///
/// Each iteration scrolls, waits `settle` for lazy content, and compares the
/// new height against the previous reading; the post-scroll reading becomes
/// the next baseline. A height sequence of `[100, 300, 300]` therefore takes
/// exactly two scrolls. After `max_scrolls` scrolls the page is treated as
/// stable and a warning is logged.
pub async fn scroll_until_stable(
    session: &mut dyn RenderSession,
    settle: Duration,
    max_scrolls: u32,
) -> Result<ScrollOutcome, String> {
    let mut height = read_scroll_height(session).await?;
    let mut scrolls = 0;

    while scrolls < max_scrolls {
        session.evaluate(SCROLL_TO_BOTTOM_SCRIPT).await?;
        scrolls += 1;

        tokio::time::sleep(settle).await;

        let next = read_scroll_height(session).await?;
        tracing::trace!("Scroll {}: height {} -> {}", scrolls, height, next);

        if next == height {
            return Ok(ScrollOutcome {
                scrolls,
                final_height: next,
                stabilized: true,
            });
        }
        height = next;
    }

    tracing::warn!(
        "Page still growing after {} scrolls (height {}), treating as stable",
        max_scrolls,
        height
    );

    Ok(ScrollOutcome {
        scrolls,
        final_height: height,
        stabilized: false,
    })
}
