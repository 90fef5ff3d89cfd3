// SPDX-License-Identifier: MPL-2.0

//! # Locale Preference Storage
//!
//! Remembers the locale the user picked so the next start can restore it.
//!
//! The on-disk format is a small JSON document:
//!
//! ```json
//! { "preferred-locale": "ja-JP" }
//! ```
//!
//! Stored by default at `~/.config/lang-loader/preferences.json`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{Error, Result};

/// Persists the user's chosen locale identifier.
pub trait PreferenceStore: Send + Sync {
    /// The stored locale, or `None` when no choice has been made yet.
    fn load(&self) -> Option<String>;

    fn save(&self, locale: &str) -> Result<()>;
}

// ============================================================================
// JSON File Store
// ============================================================================

#[derive(Debug, Default, Serialize, Deserialize)]
struct PreferenceFile {
    #[serde(rename = "preferred-locale", skip_serializing_if = "Option::is_none")]
    preferred_locale: Option<String>,
}

/// Preference store backed by a JSON file.
pub struct JsonPreferenceStore {
    path: PathBuf,
}

impl JsonPreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the user's config directory.
    ///
    /// Falls back to `/tmp` if the config directory cannot be determined.
    pub fn in_config_dir() -> Self {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("/tmp"));
        path.push("lang-loader");
        path.push("preferences.json");
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for JsonPreferenceStore {
    fn load(&self) -> Option<String> {
        let content = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str::<PreferenceFile>(&content) {
            Ok(file) => file.preferred_locale.filter(|l| !l.is_empty()),
            Err(e) => {
                log::warn!("Ignoring unreadable preference file {:?}: {}", self.path, e);
                None
            }
        }
    }

    fn save(&self, locale: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| Error::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let file = PreferenceFile {
            preferred_locale: Some(locale.to_string()),
        };
        let json = serde_json::to_string_pretty(&file).map_err(|e| Error::Preference(e.to_string()))?;
        fs::write(&self.path, json).map_err(|source| Error::Io {
            path: self.path.clone(),
            source,
        })
    }
}

// ============================================================================
// In-Memory Store
// ============================================================================

/// Preference store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    value: Mutex<Option<String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_locale(locale: &str) -> Self {
        Self {
            value: Mutex::new(Some(locale.to_string())),
        }
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> Option<String> {
        self.value
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    fn save(&self, locale: &str) -> Result<()> {
        *self.value.lock().unwrap_or_else(std::sync::PoisonError::into_inner) = Some(locale.to_string());
        Ok(())
    }
}
