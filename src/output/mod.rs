//! Output module for crawl reports
//!
//! This module handles:
//! - Rendering the per-seed result map as JSON or plain text
//! - Summarizing batch statistics

mod report;
pub mod stats;

pub use report::{render_report, ReportFormat};
pub use stats::{log_statistics, CrawlStatistics};
