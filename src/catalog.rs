// SPDX-License-Identifier: MPL-2.0

//! # Locale Catalog
//!
//! Fixed registry of the locales a user can select, with the display data a
//! language picker needs (native name and flag glyph).
//!
//! The catalog is pure lookup. It also owns the matching rule used when the
//! environment reports a language tag on first run:
//!
//! ```text
//! "en-GB" → "en-GB"   (exact)
//! "en-AU" → "en-US"   (first entry in the "en" family)
//! "fr-FR" → default   (no "fr" entry)
//! ```

use serde::Serialize;

/// Locale used when nothing better is known.
pub const DEFAULT_LOCALE: &str = "en-US";

// ============================================================================
// Catalog Entries
// ============================================================================

/// A selectable locale and its display metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailableLocale {
    /// Locale identifier (e.g., "en-US", "ja-JP")
    pub code: String,
    /// Name of the language in that language
    pub name: String,
    /// Flag emoji shown next to the name
    pub flag: String,
}

impl AvailableLocale {
    pub fn new(code: &str, name: &str, flag: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            flag: flag.to_string(),
        }
    }
}

/// The locales shipped with the application.
const BUILTIN_LOCALES: &[(&str, &str, &str)] = &[
    ("ar", "اللغة العربية", "🇪🇬"),
    ("en-US", "English (US)", "🇺🇸"),
    ("en-GB", "English (UK)", "🇬🇧"),
    ("ja-JP", "日本語", "🇯🇵"),
    ("ro-RO", "Română", "🇷🇴"),
];

// ============================================================================
// Catalog
// ============================================================================

/// Ordered, immutable list of selectable locales plus the default locale.
#[derive(Debug, Clone)]
pub struct LocaleCatalog {
    locales: Vec<AvailableLocale>,
    default_locale: String,
}

impl Default for LocaleCatalog {
    fn default() -> Self {
        let locales = BUILTIN_LOCALES
            .iter()
            .map(|(code, name, flag)| AvailableLocale::new(code, name, flag))
            .collect();
        Self::new(locales, DEFAULT_LOCALE)
    }
}

impl LocaleCatalog {
    /// Build a catalog from an explicit table.
    ///
    /// The default locale does not have to appear in the table; it is only
    /// the last resort of [`best_match`](Self::best_match) and of the
    /// resolver's fallback chain.
    pub fn new(locales: Vec<AvailableLocale>, default_locale: &str) -> Self {
        Self {
            locales,
            default_locale: default_locale.to_string(),
        }
    }

    /// Same table with a different default locale.
    pub fn with_default(mut self, default_locale: &str) -> Self {
        self.default_locale = default_locale.to_string();
        self
    }

    /// All selectable locales, in display order.
    pub fn list_available(&self) -> &[AvailableLocale] {
        &self.locales
    }

    pub fn is_available(&self, code: &str) -> bool {
        self.locales.iter().any(|l| l.code == code)
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// Catalog entry for `code`, if it is selectable.
    pub fn get(&self, code: &str) -> Option<&AvailableLocale> {
        self.locales.iter().find(|l| l.code == code)
    }

    /// Display entry for `code`, falling back to the first catalog entry.
    pub fn info_or_first(&self, code: &str) -> Option<&AvailableLocale> {
        self.get(code).or_else(|| self.locales.first())
    }

    /// Match a language tag reported by the environment against the catalog.
    ///
    /// Tries an exact match first, then the first entry sharing the leading
    /// subtag (the language family), then the default locale.
    pub fn best_match(&self, reported: &str) -> String {
        if self.is_available(reported) {
            return reported.to_string();
        }

        let family = reported.split('-').next().unwrap_or(reported);
        if !family.is_empty() {
            if let Some(entry) = self.locales.iter().find(|l| l.code.starts_with(family)) {
                log::debug!("Matched {} to {} by language family", reported, entry.code);
                return entry.code.clone();
            }
        }

        log::debug!("No catalog match for {}, using {}", reported, self.default_locale);
        self.default_locale.clone()
    }
}
