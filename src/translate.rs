// SPDX-License-Identifier: MPL-2.0

//! # Translation Lookup
//!
//! Two ways to turn a key into display text:
//!
//! | Call        | Data source                                  | Suspends |
//! |-------------|----------------------------------------------|----------|
//! | `t`         | published snapshot, or cache for an override | never    |
//! | `t_async`   | waits for a snapshot, or resolves override   | on I/O   |
//!
//! Both end in the same rule: the translated value, else the caller's
//! fallback, else the key itself (with a warning).

use std::sync::Arc;

use crate::loader::FallbackResolver;
use crate::state::ActiveLocaleState;

/// Apply the value → fallback → key rule.
pub fn lookup(value: Option<&str>, key: &str, fallback: Option<&str>, locale_override: Option<&str>) -> String {
    if let Some(value) = value {
        return value.to_string();
    }
    if let Some(fallback) = fallback {
        return fallback.to_string();
    }

    match locale_override {
        Some(locale) => log::warn!("Translation key \"{}\" not found for locale override \"{}\"", key, locale),
        None => log::warn!("Translation key \"{}\" not found", key),
    }
    key.to_string()
}

/// Answers key lookups against the active locale or an explicit override.
pub struct Translator {
    state: Arc<ActiveLocaleState>,
    resolver: Arc<FallbackResolver>,
}

impl Translator {
    pub fn new(state: Arc<ActiveLocaleState>, resolver: Arc<FallbackResolver>) -> Self {
        Self { state, resolver }
    }

    /// Look up `key` without waiting.
    ///
    /// With an override locale only already-cached data is consulted; nothing
    /// is fetched.
    pub fn t(&self, key: &str, fallback: Option<&str>, locale_override: Option<&str>) -> String {
        match locale_override {
            None => {
                let snapshot = self.state.current_snapshot();
                lookup(snapshot.get(key), key, fallback, None)
            }
            Some(locale) => {
                let cached = self.resolver.cached(locale);
                let value = cached.as_ref().and_then(|data| data.get(key));
                lookup(value, key, fallback, Some(locale))
            }
        }
    }

    /// Look up `key`, waiting for data if needed.
    ///
    /// Without an override this waits for the first published snapshot. With
    /// one it resolves the override locale through the cache, fetching on a
    /// miss. The active locale is never changed.
    pub async fn t_async(&self, key: &str, fallback: Option<&str>, locale_override: Option<&str>) -> String {
        match locale_override {
            None => {
                let snapshot = self.state.wait_for_snapshot().await;
                lookup(snapshot.get(key), key, fallback, None)
            }
            Some(locale) => {
                let data = self.resolver.resolve(locale).await;
                lookup(data.get(key), key, fallback, Some(locale))
            }
        }
    }
}
