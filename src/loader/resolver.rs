// SPDX-License-Identifier: MPL-2.0

//! # Fallback Resolution
//!
//! Turns a locale identifier into merged translation data:
//!
//! ```text
//! common (cache or fetch)  ──┐
//!                            ├── overlay ──► merged data
//! locale (cache or fetch)  ──┘
//!    │ failure
//!    ▼
//! default locale (cache or fetch, only if requested != default)
//!    │ failure
//!    ▼
//! common only
//! ```
//!
//! Resolution never fails. A missing common set degrades to an empty one,
//! a missing per-locale set substitutes the default locale once, and a
//! missing default leaves only the common strings.

use std::sync::Arc;

use futures_util::future::join;

use super::cache::{CacheManager, ResourceKind, COMMON_KEY};
use super::{ResourceFetcher, ResourceSet};

/// Resolves locales to merged data through the shared cache.
pub struct FallbackResolver {
    fetcher: ResourceFetcher,
    cache: Arc<CacheManager>,
    default_locale: String,
}

impl FallbackResolver {
    pub fn new(fetcher: ResourceFetcher, cache: Arc<CacheManager>, default_locale: &str) -> Self {
        Self {
            fetcher,
            cache,
            default_locale: default_locale.to_string(),
        }
    }

    pub fn cache(&self) -> &Arc<CacheManager> {
        &self.cache
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// Resolve `requested` into common strings overlaid by per-locale strings.
    ///
    /// Performs at most one per-locale attempt for `requested` and at most one
    /// for the default locale. The default locale never retries itself.
    pub async fn resolve(&self, requested: &str) -> ResourceSet {
        let (common, mut locale) = join(self.common_data(), self.locale_data(requested)).await;

        if locale.is_none() && requested != self.default_locale {
            log::warn!("Falling back from {} to default locale {}", requested, self.default_locale);
            locale = self.locale_data(&self.default_locale).await;
        }

        match locale {
            Some(locale) => common.overlay(&locale),
            None => {
                log::warn!("No per-locale data available for {}, using common strings only", requested);
                (*common).clone()
            }
        }
    }

    /// Merged data for `locale` built only from what is already cached.
    ///
    /// Returns `None` when the per-locale set has not been loaded. A missing
    /// common entry is treated as empty. Never fetches.
    pub fn cached(&self, locale: &str) -> Option<ResourceSet> {
        let locale_set = self.cache.get(ResourceKind::Locale, locale)?;
        match self.cache.get(ResourceKind::Common, COMMON_KEY) {
            Some(common) => Some(common.overlay(&locale_set)),
            None => Some((*locale_set).clone()),
        }
    }

    async fn common_data(&self) -> Arc<ResourceSet> {
        let fetched = self
            .cache
            .get_or_fetch(ResourceKind::Common, COMMON_KEY, || self.fetcher.fetch_common())
            .await;

        fetched.unwrap_or_else(|e| {
            log::warn!("Failed to load common locale data: {}", e);
            Arc::new(ResourceSet::new())
        })
    }

    async fn locale_data(&self, locale: &str) -> Option<Arc<ResourceSet>> {
        let fetched = self
            .cache
            .get_or_fetch(ResourceKind::Locale, locale, || self.fetcher.fetch_locale(locale))
            .await;

        match fetched {
            Ok(set) => Some(set),
            Err(e) => {
                log::warn!("Failed to load locale {}: {}", locale, e);
                None
            }
        }
    }
}
