// SPDX-License-Identifier: MPL-2.0

//! Resource loading pipeline: parse, fetch, cache, resolve.

pub mod cache;
pub mod fetcher;
pub mod parser;
pub mod resolver;

pub use cache::{CacheManager, ResourceKind};
pub use fetcher::{FileSource, HttpSource, MemorySource, ResourceFetcher, ResourceSource};
pub use parser::parse_resource;
pub use resolver::FallbackResolver;

use std::collections::HashMap;

/// Flat mapping of translation keys to strings.
///
/// Used both for a single resource file (common or per-locale) and for the
/// merged view published to lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceSet(HashMap<String, String>);

impl ResourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Build a new set with `top` laid over `self`; `top` wins on collision.
    pub fn overlay(&self, top: &ResourceSet) -> ResourceSet {
        let mut merged = self.0.clone();
        merged.extend(top.0.iter().map(|(k, v)| (k.clone(), v.clone())));
        ResourceSet(merged)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ResourceSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        ResourceSet(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
