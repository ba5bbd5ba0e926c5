//! URL handling module for Product-Trawler
//!
//! This module provides seed parsing, link resolution, segment wildcard
//! matching, and the product-page classifier.

mod classifier;
mod matcher;
mod normalize;

pub use classifier::ProductClassifier;
pub use matcher::SegmentPattern;
pub use normalize::{parse_seed, CandidateLink};
