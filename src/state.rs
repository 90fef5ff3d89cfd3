// SPDX-License-Identifier: MPL-2.0

//! # Active Locale State
//!
//! Holds the process-wide current locale and the merged data last published
//! for it.
//!
//! ## Publication Model
//!
//! - [`select_locale`](ActiveLocaleState::select_locale) sets the locale,
//!   resolves it, publishes the merged data, then persists the choice
//! - Readers take a point-in-time snapshot; while a selection is in flight
//!   they keep seeing the previous data
//! - Overlapping selections publish in completion order, last write wins
//!
//! The snapshot lives in a `tokio::sync::watch` channel so async readers can
//! wait for the first publication instead of reading an empty mapping.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;

use crate::catalog::LocaleCatalog;
use crate::error::{Error, Result};
use crate::loader::{FallbackResolver, ResourceSet};
use crate::preference::PreferenceStore;

/// Merged data published for a locale.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub locale: String,
    pub data: Arc<ResourceSet>,
}

pub struct ActiveLocaleState {
    catalog: Arc<LocaleCatalog>,
    resolver: Arc<FallbackResolver>,
    preferences: Box<dyn PreferenceStore>,
    active: Mutex<String>,
    published: watch::Sender<Option<Snapshot>>,
}

impl ActiveLocaleState {
    /// Create the state with the default locale active and nothing published.
    pub fn new(
        catalog: Arc<LocaleCatalog>,
        resolver: Arc<FallbackResolver>,
        preferences: Box<dyn PreferenceStore>,
    ) -> Self {
        let active = Mutex::new(catalog.default_locale().to_string());
        let (published, _) = watch::channel(None);
        Self {
            catalog,
            resolver,
            preferences,
            active,
            published,
        }
    }

    pub fn current_locale(&self) -> String {
        self.active.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Make `locale` the active locale and publish its merged data.
    ///
    /// Locales outside the catalog are rejected with
    /// [`Error::LocaleUnavailable`] and leave the state untouched.
    pub async fn select_locale(&self, locale: &str) -> Result<()> {
        if !self.catalog.is_available(locale) {
            log::warn!("Locale {} is not available", locale);
            return Err(Error::LocaleUnavailable(locale.to_string()));
        }

        *self.active.lock().unwrap_or_else(PoisonError::into_inner) = locale.to_string();

        let data = self.resolver.resolve(locale).await;
        self.publish(locale, data);

        if let Err(e) = self.preferences.save(locale) {
            log::warn!("Failed to persist preferred locale {}: {}", locale, e);
        }
        Ok(())
    }

    fn publish(&self, locale: &str, data: ResourceSet) {
        log::info!("Publishing {} strings for {}", data.len(), locale);
        self.published.send_replace(Some(Snapshot {
            locale: locale.to_string(),
            data: Arc::new(data),
        }));
    }

    /// Last published data, empty before the first publication.
    pub fn current_snapshot(&self) -> Arc<ResourceSet> {
        self.published
            .borrow()
            .as_ref()
            .map(|snapshot| snapshot.data.clone())
            .unwrap_or_default()
    }

    /// Last published snapshot including the locale it was resolved for.
    pub fn published(&self) -> Option<Snapshot> {
        self.published.borrow().clone()
    }

    /// Wait until data has been published at least once, then return it.
    ///
    /// Returns immediately once any snapshot exists. Suspends forever if no
    /// locale is ever selected.
    pub async fn wait_for_snapshot(&self) -> Arc<ResourceSet> {
        let mut receiver = self.published.subscribe();
        match receiver.wait_for(Option::is_some).await {
            Ok(snapshot) => snapshot
                .as_ref()
                .map(|snapshot| snapshot.data.clone())
                .unwrap_or_default(),
            Err(_) => Arc::default(),
        }
    }

    /// Pick the locale to start with.
    ///
    /// A stored preference wins when it differs from the default and is still
    /// selectable. Otherwise the reported environment language is matched
    /// against the catalog, and without one the default is used.
    pub fn initial_locale(&self, reported: Option<&str>) -> String {
        let default = self.catalog.default_locale();

        if let Some(stored) = self.preferences.load() {
            if stored != default && self.catalog.is_available(&stored) {
                log::debug!("Using stored locale preference {}", stored);
                return stored;
            }
            if !self.catalog.is_available(&stored) {
                log::warn!("Ignoring stored locale {} which is no longer available", stored);
            }
        }

        match reported {
            Some(tag) => self.catalog.best_match(tag),
            None => default.to_string(),
        }
    }

    /// Select the initial locale. Run once at startup.
    ///
    /// Always publishes data. If the chosen locale is not selectable (a
    /// catalog whose default is not listed), it is resolved and published
    /// anyway without persisting it, so waiting readers are released.
    pub async fn bootstrap(&self, reported: Option<&str>) -> Result<()> {
        let locale = self.initial_locale(reported);
        log::info!("Starting with locale {}", locale);

        if !self.catalog.is_available(&locale) {
            log::warn!("Starting locale {} is not in the catalog, loading it unselected", locale);
            *self.active.lock().unwrap_or_else(PoisonError::into_inner) = locale.clone();
            let data = self.resolver.resolve(&locale).await;
            self.publish(&locale, data);
            return Ok(());
        }

        self.select_locale(&locale).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{CacheManager, MemorySource, ResourceFetcher};
    use crate::preference::MemoryPreferenceStore;

    fn state(preferences: MemoryPreferenceStore) -> ActiveLocaleState {
        let source = Arc::new(
            MemorySource::new()
                .with("env.lang", "site = Portfolio")
                .with("env.en-US.lang", "hello = Hello")
                .with("env.ja-JP.lang", "hello = こんにちは"),
        );
        let resolver = FallbackResolver::new(ResourceFetcher::new(source), Arc::new(CacheManager::new()), "en-US");
        ActiveLocaleState::new(
            Arc::new(LocaleCatalog::default()),
            Arc::new(resolver),
            Box::new(preferences),
        )
    }

    #[test]
    fn starts_with_default_and_empty_snapshot() {
        let state = state(MemoryPreferenceStore::new());
        assert_eq!(state.current_locale(), "en-US");
        assert!(state.current_snapshot().is_empty());
        assert!(state.published().is_none());
    }

    #[tokio::test]
    async fn select_publishes_and_persists() {
        let state = state(MemoryPreferenceStore::new());

        state.select_locale("ja-JP").await.expect("ja-JP is in the catalog");

        assert_eq!(state.current_locale(), "ja-JP");
        assert_eq!(state.current_snapshot().get("hello"), Some("こんにちは"));
        assert_eq!(state.current_snapshot().get("site"), Some("Portfolio"));
        assert_eq!(state.published().map(|s| s.locale), Some("ja-JP".to_string()));
        assert_eq!(state.preferences.load().as_deref(), Some("ja-JP"));
    }

    #[tokio::test]
    async fn unavailable_locale_is_a_no_op() {
        let state = state(MemoryPreferenceStore::new());
        state.select_locale("en-US").await.expect("default is available");

        let result = state.select_locale("fr-FR").await;

        assert!(matches!(result, Err(Error::LocaleUnavailable(ref l)) if l == "fr-FR"));
        assert_eq!(state.current_locale(), "en-US");
        assert_eq!(state.current_snapshot().get("hello"), Some("Hello"));
        assert_eq!(state.preferences.load().as_deref(), Some("en-US"));
    }

    #[test]
    fn stored_preference_beats_environment() {
        let state = state(MemoryPreferenceStore::with_locale("ro-RO"));
        assert_eq!(state.initial_locale(Some("ja-JP")), "ro-RO");
    }

    #[test]
    fn stored_default_defers_to_environment() {
        let state = state(MemoryPreferenceStore::with_locale("en-US"));
        assert_eq!(state.initial_locale(Some("ja-JP")), "ja-JP");
    }

    #[test]
    fn stale_preference_is_ignored() {
        let state = state(MemoryPreferenceStore::with_locale("de-DE"));
        assert_eq!(state.initial_locale(Some("en-AU")), "en-US");
        assert_eq!(state.initial_locale(None), "en-US");
    }

    #[tokio::test]
    async fn bootstrap_publishes_even_with_unlisted_default() {
        let source = Arc::new(
            MemorySource::new()
                .with("env.lang", "site = Portfolio")
                .with("env.de-DE.lang", "hello = Hallo"),
        );
        let catalog = LocaleCatalog::default().with_default("de-DE");
        let resolver = FallbackResolver::new(ResourceFetcher::new(source), Arc::new(CacheManager::new()), "de-DE");
        let preferences = MemoryPreferenceStore::new();
        let state = ActiveLocaleState::new(Arc::new(catalog), Arc::new(resolver), Box::new(preferences));

        state.bootstrap(Some("fr-FR")).await.expect("bootstrap still succeeds");

        let snapshot = tokio::time::timeout(std::time::Duration::from_millis(300), state.wait_for_snapshot())
            .await
            .expect("snapshot is published");
        assert_eq!(snapshot.get("hello"), Some("Hallo"));
        assert_eq!(snapshot.get("site"), Some("Portfolio"));
        assert_eq!(state.current_locale(), "de-DE");
        assert_eq!(state.preferences.load(), None);
    }

    #[tokio::test]
    async fn bootstrap_selects_detected_locale() {
        let state = state(MemoryPreferenceStore::new());

        state.bootstrap(Some("ja")).await.expect("bootstrap");

        assert_eq!(state.current_locale(), "ja-JP");
        assert_eq!(state.wait_for_snapshot().await.get("hello"), Some("こんにちは"));
    }
}
