// SPDX-License-Identifier: MPL-2.0

//! # Resource Fetching
//!
//! Retrieves raw `.lang` payloads from a backing source and parses them.
//!
//! ## Naming Convention
//!
//! ```text
//! <base>/env.lang           common strings, shared by every locale
//! <base>/env.<locale>.lang  per-locale strings (e.g. env.ja-JP.lang)
//! ```
//!
//! ## Sources
//!
//! - [`HttpSource`]: `GET` against a base URL, non-2xx is a failure
//! - [`FileSource`]: reads from a local directory
//! - [`MemorySource`]: in-process payloads, counts every fetch
//!
//! The fetcher performs exactly one retrieval per call. It neither retries
//! nor caches; the resolver owns both concerns.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use super::{parse_resource, ResourceSet};
use crate::error::{Error, Result};

/// File name of the common resource set.
pub const COMMON_RESOURCE: &str = "env.lang";

/// File name of the resource set for `locale`.
pub fn locale_resource_name(locale: &str) -> String {
    format!("env.{}.lang", locale)
}

// ============================================================================
// Backing Sources
// ============================================================================

/// Something that can hand out raw resource payloads by file name.
#[async_trait]
pub trait ResourceSource: Send + Sync {
    /// Retrieve the text of `name`.
    async fn fetch(&self, name: &str) -> Result<String>;
}

/// Fetches resources over HTTP from a base URL.
pub struct HttpSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpSource {
    /// Create a source rooted at `base_url` (e.g., `https://example.com/data/lang`).
    ///
    /// Requests time out after `timeout` so a stalled server cannot hold a
    /// resolution open indefinitely.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url_for(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, name)
    }
}

#[async_trait]
impl ResourceSource for HttpSource {
    async fn fetch(&self, name: &str) -> Result<String> {
        let url = self.url_for(name);
        log::debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                name: name.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

/// Reads resources from a directory on disk.
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ResourceSource for FileSource {
    async fn fetch(&self, name: &str) -> Result<String> {
        let path = self.root.join(name);
        log::debug!("Reading {:?}", path);
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| Error::Io { path, source })
    }
}

/// In-memory payloads keyed by file name.
///
/// Missing names answer like an HTTP 404. Every call is counted, which
/// makes it easy to observe cache behaviour from the outside.
#[derive(Default)]
pub struct MemorySource {
    payloads: Mutex<HashMap<String, String>>,
    fetches: Mutex<HashMap<String, usize>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert of a payload.
    pub fn with(self, name: &str, payload: &str) -> Self {
        self.insert(name, payload);
        self
    }

    pub fn insert(&self, name: &str, payload: &str) {
        lock(&self.payloads).insert(name.to_string(), payload.to_string());
    }

    /// Number of times `name` has been requested, successful or not.
    pub fn fetch_count(&self, name: &str) -> usize {
        lock(&self.fetches).get(name).copied().unwrap_or(0)
    }

    pub fn total_fetches(&self) -> usize {
        lock(&self.fetches).values().sum()
    }
}

#[async_trait]
impl ResourceSource for MemorySource {
    async fn fetch(&self, name: &str) -> Result<String> {
        *lock(&self.fetches).entry(name.to_string()).or_insert(0) += 1;
        lock(&self.payloads)
            .get(name)
            .cloned()
            .ok_or_else(|| Error::Status {
                name: name.to_string(),
                status: 404,
            })
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

// ============================================================================
// Fetcher
// ============================================================================

/// Retrieves and parses the common and per-locale resource sets.
#[derive(Clone)]
pub struct ResourceFetcher {
    source: Arc<dyn ResourceSource>,
}

impl ResourceFetcher {
    pub fn new(source: Arc<dyn ResourceSource>) -> Self {
        Self { source }
    }

    pub async fn fetch_common(&self) -> Result<ResourceSet> {
        self.fetch_named(COMMON_RESOURCE).await
    }

    pub async fn fetch_locale(&self, locale: &str) -> Result<ResourceSet> {
        self.fetch_named(&locale_resource_name(locale)).await
    }

    async fn fetch_named(&self, name: &str) -> Result<ResourceSet> {
        let payload = self.source.fetch(name).await?;
        if payload.trim().is_empty() {
            return Err(Error::EmptyPayload(name.to_string()));
        }

        let set = parse_resource(&payload);
        if set.is_empty() {
            // Content without a single usable line still counts as loaded
            log::warn!("Resource {} contained no entries", name);
        } else {
            log::debug!("Parsed {} entries from {}", set.len(), name);
        }
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher(source: MemorySource) -> (ResourceFetcher, Arc<MemorySource>) {
        let source = Arc::new(source);
        (ResourceFetcher::new(source.clone()), source)
    }

    #[test]
    fn resource_names_follow_convention() {
        assert_eq!(COMMON_RESOURCE, "env.lang");
        assert_eq!(locale_resource_name("en-GB"), "env.en-GB.lang");
    }

    #[tokio::test]
    async fn fetches_and_parses_locale() {
        let (fetcher, source) = fetcher(MemorySource::new().with("env.ja-JP.lang", "hello = こんにちは"));

        let set = fetcher.fetch_locale("ja-JP").await.expect("locale should load");

        assert_eq!(set.get("hello"), Some("こんにちは"));
        assert_eq!(source.fetch_count("env.ja-JP.lang"), 1);
    }

    #[tokio::test]
    async fn missing_resource_is_status_failure() {
        let (fetcher, _) = fetcher(MemorySource::new());

        let err = fetcher.fetch_common().await.unwrap_err();

        assert!(matches!(err, Error::Status { status: 404, .. }));
        assert!(err.is_retrieval());
    }

    #[tokio::test]
    async fn blank_payload_is_failure() {
        let (fetcher, _) = fetcher(MemorySource::new().with("env.lang", "  \n\n"));
        assert!(matches!(fetcher.fetch_common().await, Err(Error::EmptyPayload(_))));
    }

    #[tokio::test]
    async fn comment_only_payload_is_empty_success() {
        let (fetcher, _) = fetcher(MemorySource::new().with("env.lang", "# nothing yet\n"));
        let set = fetcher.fetch_common().await.expect("comments are valid content");
        assert!(set.is_empty());
    }

    #[tokio::test]
    async fn file_source_reads_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("env.lang"), "site = Portfolio\n").expect("write");
        let fetcher = ResourceFetcher::new(Arc::new(FileSource::new(dir.path())));

        let set = fetcher.fetch_common().await.expect("file should load");
        assert_eq!(set.get("site"), Some("Portfolio"));

        let err = fetcher.fetch_locale("ro-RO").await.unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn http_source_joins_base_and_name() {
        let source = HttpSource::new("http://localhost/data/lang/", Duration::from_secs(1))
            .expect("client should build");
        assert_eq!(source.url_for("env.lang"), "http://localhost/data/lang/env.lang");
    }
}
