// SPDX-License-Identifier: MPL-2.0

//! Localization Entry Point
//!
//! [`I18n`] wires the catalog, cache, resolver, active-locale state and
//! translator together and exposes the operations UI code calls.
//!
//! # Resource Layout
//!
//! ```text
//! data/lang/
//! ├── env.lang          # common strings (brand names, URLs, ...)
//! ├── env.en-US.lang    # English (US)
//! └── env.ja-JP.lang    # Japanese
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use lang_loader::{config::Config, i18n::{self, I18n}, tr};
//!
//! # async fn run() -> lang_loader::error::Result<()> {
//! let localizer = I18n::from_config(&Config::load())?;
//! let localizer = i18n::install(localizer)?;
//! localizer.bootstrap_from_system().await?;
//!
//! let title = tr!("nav.home");
//! let about = tr!("nav.about", "About");
//! # Ok(())
//! # }
//! ```
//!
//! Missing keys render as the key itself so an untranslated string is visible
//! rather than blank.

use std::sync::{Arc, OnceLock};

use crate::catalog::{AvailableLocale, LocaleCatalog};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::loader::{CacheManager, FallbackResolver, ResourceFetcher, ResourceSet, ResourceSource};
use crate::preference::PreferenceStore;
use crate::state::ActiveLocaleState;
use crate::translate::Translator;

/// The localization service.
pub struct I18n {
    catalog: Arc<LocaleCatalog>,
    resolver: Arc<FallbackResolver>,
    state: Arc<ActiveLocaleState>,
    translator: Translator,
}

impl I18n {
    /// Build a localizer with the built-in catalog.
    pub fn new(source: Arc<dyn ResourceSource>, preferences: Box<dyn PreferenceStore>) -> Self {
        Self::with_catalog(source, preferences, LocaleCatalog::default())
    }

    /// Build a localizer over an explicit catalog.
    ///
    /// The catalog's default locale is also the resolver's fallback target.
    pub fn with_catalog(
        source: Arc<dyn ResourceSource>,
        preferences: Box<dyn PreferenceStore>,
        catalog: LocaleCatalog,
    ) -> Self {
        let catalog = Arc::new(catalog);
        let cache = Arc::new(CacheManager::new());
        let resolver = Arc::new(FallbackResolver::new(
            ResourceFetcher::new(source),
            cache,
            catalog.default_locale(),
        ));
        let state = Arc::new(ActiveLocaleState::new(catalog.clone(), resolver.clone(), preferences));
        let translator = Translator::new(state.clone(), resolver.clone());

        Self {
            catalog,
            resolver,
            state,
            translator,
        }
    }

    /// Build a localizer from the user's configuration.
    ///
    /// The configured default locale must be one of the catalog's locales.
    pub fn from_config(config: &Config) -> Result<Self> {
        let catalog = LocaleCatalog::default();
        if !catalog.is_available(&config.default_locale) {
            return Err(Error::Config(format!(
                "default locale {} is not an available locale",
                config.default_locale
            )));
        }
        let catalog = catalog.with_default(&config.default_locale);
        Ok(Self::with_catalog(
            config.build_source()?,
            Box::new(config.preference_store()),
            catalog,
        ))
    }

    // ========================================================================
    // Locale Selection
    // ========================================================================

    /// Switch the active locale. See [`ActiveLocaleState::select_locale`].
    pub async fn select_locale(&self, locale: &str) -> Result<()> {
        self.state.select_locale(locale).await
    }

    /// Choose and load the initial locale from the stored preference or the
    /// language the environment reports.
    pub async fn bootstrap(&self, reported: Option<&str>) -> Result<()> {
        self.state.bootstrap(reported).await
    }

    /// [`bootstrap`](Self::bootstrap) with the desktop's preferred language.
    pub async fn bootstrap_from_system(&self) -> Result<()> {
        let reported = system_language();
        log::debug!("System language: {:?}", reported);
        self.bootstrap(reported.as_deref()).await
    }

    pub fn current_locale(&self) -> String {
        self.state.current_locale()
    }

    /// Display entry for the active locale, or the first catalog entry.
    pub fn current_locale_info(&self) -> Option<&AvailableLocale> {
        self.catalog.info_or_first(&self.state.current_locale())
    }

    pub fn list_available(&self) -> &[AvailableLocale] {
        self.catalog.list_available()
    }

    /// Last published merged data for the active locale.
    pub fn snapshot(&self) -> Arc<ResourceSet> {
        self.state.current_snapshot()
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Translate `key` from already-loaded data. Never waits.
    pub fn t(&self, key: &str, fallback: Option<&str>, locale_override: Option<&str>) -> String {
        self.translator.t(key, fallback, locale_override)
    }

    /// Translate `key`, loading data first when needed.
    pub async fn t_async(&self, key: &str, fallback: Option<&str>, locale_override: Option<&str>) -> String {
        self.translator.t_async(key, fallback, locale_override).await
    }

    // ========================================================================
    // Cache Control
    // ========================================================================

    /// Warm the cache for `locale` without changing the active locale.
    pub async fn preload(&self, locale: &str) {
        if !self.catalog.is_available(locale) {
            log::warn!("Locale {} is not available for preloading", locale);
            return;
        }
        let data = self.resolver.resolve(locale).await;
        log::debug!("Preloaded {} ({} strings)", locale, data.len());
    }

    /// Drop every cached resource set.
    ///
    /// The active locale and its published snapshot stay as they are until
    /// the next selection.
    pub fn clear_cache(&self) {
        self.resolver.cache().clear();
    }

    pub fn cache(&self) -> &CacheManager {
        self.resolver.cache()
    }
}

// ============================================================================
// Process-wide Instance
// ============================================================================

static GLOBAL: OnceLock<I18n> = OnceLock::new();

/// Install `i18n` as the process-wide localizer used by [`tr!`](crate::tr).
pub fn install(i18n: I18n) -> Result<&'static I18n> {
    GLOBAL.set(i18n).map_err(|_| Error::AlreadyInstalled)?;
    GLOBAL.get().ok_or(Error::AlreadyInstalled)
}

/// The installed localizer, if any.
pub fn global() -> Option<&'static I18n> {
    GLOBAL.get()
}

/// Snapshot lookup through the installed localizer.
///
/// Before [`install`] this returns the fallback, or the key itself.
pub fn translate(key: &str, fallback: Option<&str>) -> String {
    match global() {
        Some(i18n) => i18n.t(key, fallback, None),
        None => fallback.unwrap_or(key).to_string(),
    }
}

/// First language the desktop environment asks for, e.g. `"en-GB"`.
pub fn system_language() -> Option<String> {
    i18n_embed::DesktopLanguageRequester::requested_languages()
        .into_iter()
        .next()
        .map(|lang| lang.to_string())
}

/// Look up a translated string through the installed localizer.
///
/// ```rust,ignore
/// let text = tr!("nav.home");
/// let text = tr!("nav.about", "About");
/// ```
#[macro_export]
macro_rules! tr {
    ($key:expr) => {{
        $crate::i18n::translate($key, None)
    }};

    ($key:expr, $fallback:expr) => {{
        $crate::i18n::translate($key, Some($fallback))
    }};
}
