use crate::crawler::ProductUrlSet;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

/// Discovered product URLs for every seed of a batch
///
/// Entries keep the order the seeds were given in. Serializes as a JSON
/// object mapping each seed to an array of URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlResult {
    entries: Vec<(String, ProductUrlSet)>,
    index: HashMap<String, usize>,
}

impl CrawlResult {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Records the URLs for `seed`, replacing any earlier entry
    pub fn insert(&mut self, seed: impl Into<String>, urls: ProductUrlSet) {
        let seed = seed.into();
        match self.index.get(&seed) {
            Some(&i) => self.entries[i].1 = urls,
            None => {
                self.index.insert(seed.clone(), self.entries.len());
                self.entries.push((seed, urls));
            }
        }
    }

    pub fn get(&self, seed: &str) -> Option<&ProductUrlSet> {
        self.index.get(seed).map(|&i| &self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProductUrlSet)> {
        self.entries.iter().map(|(seed, urls)| (seed.as_str(), urls))
    }

    pub fn seeds(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(seed, _)| seed.as_str())
    }

    /// Total URLs across all seeds (a URL found under two seeds counts twice)
    pub fn total_urls(&self) -> usize {
        self.entries.iter().map(|(_, urls)| urls.len()).sum()
    }
}

impl Serialize for CrawlResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (seed, urls) in &self.entries {
            map.serialize_entry(seed, urls)?;
        }
        map.end()
    }
}
