// SPDX-License-Identifier: MPL-2.0

//! # Resource Cache
//!
//! Two independent memoization tables for parsed resource sets:
//!
//! - **Common**: a single entry under the key `"common"`
//! - **Locale**: one entry per locale identifier
//!
//! Entries are write-once. Once a set is stored for a key it is never
//! refetched or replaced until [`CacheManager::clear`] evicts everything.
//!
//! # Thread Safety
//!
//! Each key owns a `tokio::sync::OnceCell` slot. Concurrent misses on the
//! same key share one in-flight fetch. A failed fetch caches nothing and
//! its empty slot is dropped, so the next caller tries again. The table locks are plain `std` mutexes
//! and are never held across an `.await`.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::OnceCell;

use super::ResourceSet;
use crate::error::Result;

/// Cache key of the singleton common entry.
pub const COMMON_KEY: &str = "common";

/// Which table an entry lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Common,
    Locale,
}

type Slot = Arc<OnceCell<Arc<ResourceSet>>>;
type Table = Mutex<HashMap<String, Slot>>;

/// Process-scoped store of parsed resource sets.
#[derive(Default)]
pub struct CacheManager {
    common: Table,
    locales: Table,
}

impl CacheManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self, kind: ResourceKind) -> MutexGuard<'_, HashMap<String, Slot>> {
        let table = match kind {
            ResourceKind::Common => &self.common,
            ResourceKind::Locale => &self.locales,
        };
        table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn slot(&self, kind: ResourceKind, key: &str) -> Slot {
        self.table(kind).entry(key.to_string()).or_default().clone()
    }

    /// Cached set for `key`, if one has been stored.
    pub fn get(&self, kind: ResourceKind, key: &str) -> Option<Arc<ResourceSet>> {
        self.table(kind).get(key).and_then(|slot| slot.get().cloned())
    }

    /// Store `set` under `key` unless an entry already exists.
    ///
    /// A second `put` for the same key is ignored, so racing writers cannot
    /// replace an entry another reader may already hold.
    pub fn put(&self, kind: ResourceKind, key: &str, set: ResourceSet) {
        if self.slot(kind, key).set(Arc::new(set)).is_err() {
            log::trace!("{:?} entry {} already cached, keeping existing", kind, key);
        }
    }

    /// Return the cached set for `key`, or run `fetch` and cache its result.
    ///
    /// Callers that miss while a fetch for the same key is in flight wait for
    /// that fetch instead of issuing their own. Errors are returned to every
    /// waiter that ran the failing fetch and are not cached.
    pub async fn get_or_fetch<F, Fut>(&self, kind: ResourceKind, key: &str, fetch: F) -> Result<Arc<ResourceSet>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<ResourceSet>>,
    {
        let slot = self.slot(kind, key);
        if let Some(set) = slot.get() {
            log::trace!("Cache hit: {:?} {}", kind, key);
            return Ok(set.clone());
        }

        let fetched = slot
            .get_or_try_init(move || async move { fetch().await.map(Arc::new) })
            .await
            .cloned();

        if fetched.is_err() {
            self.discard_empty(kind, key, &slot);
        }
        fetched
    }

    /// Drop the slot for `key` after a failed fetch.
    ///
    /// Only removed while it is still the table's slot, still empty and not
    /// held by another waiter (table + `slot` are the only references).
    fn discard_empty(&self, kind: ResourceKind, key: &str, slot: &Slot) {
        let mut table = self.table(kind);
        let unused = table.get(key).is_some_and(|current| {
            Arc::ptr_eq(current, slot) && !current.initialized() && Arc::strong_count(current) == 2
        });
        if unused {
            table.remove(key);
        }
    }

    /// Number of stored entries of `kind`.
    pub fn len(&self, kind: ResourceKind) -> usize {
        self.table(kind).values().filter(|slot| slot.initialized()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len(ResourceKind::Common) == 0 && self.len(ResourceKind::Locale) == 0
    }

    /// Evict every entry of both kinds.
    ///
    /// A fetch still in flight completes into its detached slot and is not
    /// visible afterwards.
    pub fn clear(&self) {
        self.table(ResourceKind::Common).clear();
        self.table(ResourceKind::Locale).clear();
        log::debug!("Resource cache cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn set(pairs: &[(&str, &str)]) -> ResourceSet {
        pairs.iter().copied().collect()
    }

    #[test]
    fn put_is_write_once() {
        let cache = CacheManager::new();
        cache.put(ResourceKind::Locale, "en-US", set(&[("k", "first")]));
        cache.put(ResourceKind::Locale, "en-US", set(&[("k", "second")]));

        let stored = cache.get(ResourceKind::Locale, "en-US").expect("entry");
        assert_eq!(stored.get("k"), Some("first"));
    }

    #[test]
    fn kinds_are_independent() {
        let cache = CacheManager::new();
        cache.put(ResourceKind::Common, COMMON_KEY, set(&[("a", "1")]));

        assert!(cache.get(ResourceKind::Locale, COMMON_KEY).is_none());
        assert_eq!(cache.len(ResourceKind::Common), 1);
        assert_eq!(cache.len(ResourceKind::Locale), 0);
    }

    #[test]
    fn clear_evicts_both_tables() {
        let cache = CacheManager::new();
        cache.put(ResourceKind::Common, COMMON_KEY, set(&[("a", "1")]));
        cache.put(ResourceKind::Locale, "ar", set(&[("b", "2")]));

        cache.clear();

        assert!(cache.is_empty());
        assert!(cache.get(ResourceKind::Common, COMMON_KEY).is_none());
    }

    #[tokio::test]
    async fn get_or_fetch_runs_fetch_once() {
        let cache = CacheManager::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let stored = cache
                .get_or_fetch(ResourceKind::Locale, "ja-JP", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(set(&[("k", "v")]))
                })
                .await
                .expect("fetch succeeds");
            assert_eq!(stored.get("k"), Some("v"));
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_fetch_is_not_cached() {
        let cache = CacheManager::new();

        let first = cache
            .get_or_fetch(ResourceKind::Locale, "ro-RO", || async {
                Err(Error::EmptyPayload("env.ro-RO.lang".into()))
            })
            .await;
        assert!(first.is_err());
        assert!(cache.get(ResourceKind::Locale, "ro-RO").is_none());
        assert_eq!(cache.len(ResourceKind::Locale), 0);

        let second = cache
            .get_or_fetch(ResourceKind::Locale, "ro-RO", || async { Ok(set(&[("k", "v")])) })
            .await;
        assert!(second.is_ok());
    }

    #[tokio::test]
    async fn failed_fetches_leave_no_slots_behind() {
        let cache = CacheManager::new();

        for i in 0..1000 {
            let key = format!("xx-{}", i);
            let result = cache
                .get_or_fetch(ResourceKind::Locale, &key, || async {
                    Err(Error::EmptyPayload("env.xx.lang".into()))
                })
                .await;
            assert!(result.is_err());
        }

        assert_eq!(cache.len(ResourceKind::Locale), 0);
        assert_eq!(cache.table(ResourceKind::Locale).len(), 0);
    }

    #[tokio::test]
    async fn failed_fetch_keeps_slot_held_by_another_waiter() {
        let cache = CacheManager::new();
        let held = cache.slot(ResourceKind::Locale, "ar");

        let result = cache
            .get_or_fetch(ResourceKind::Locale, "ar", || async {
                Err(Error::EmptyPayload("env.ar.lang".into()))
            })
            .await;

        assert!(result.is_err());
        assert_eq!(cache.table(ResourceKind::Locale).len(), 1);
        drop(held);
    }

    #[tokio::test]
    async fn concurrent_misses_share_one_fetch() {
        let cache = Arc::new(CacheManager::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = cache.clone();
            let calls = calls.clone();
            handles.push(tokio::spawn(async move {
                cache
                    .get_or_fetch(ResourceKind::Common, COMMON_KEY, || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
                        Ok(set(&[("shared", "yes")]))
                    })
                    .await
            }));
        }

        for handle in handles {
            let stored = handle.await.expect("task").expect("fetch");
            assert_eq!(stored.get("shared"), Some("yes"));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
