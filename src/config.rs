// SPDX-License-Identifier: MPL-2.0

//! Loader configuration, stored at `~/.config/lang-loader/config.json`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::catalog::DEFAULT_LOCALE;
use crate::error::{Error, Result};
use crate::loader::{FileSource, HttpSource, ResourceSource};
use crate::preference::JsonPreferenceStore;

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Base URL (`http://`, `https://`) or directory holding the `.lang` files
    pub source: String,
    /// Locale used when the requested one cannot be loaded
    pub default_locale: String,
    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,
    /// Where the chosen locale is remembered (config dir when unset)
    pub preference_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: String::from("http://localhost:5173/data/lang"),
            default_locale: String::from(DEFAULT_LOCALE),
            request_timeout_secs: 5,
            preference_path: None,
        }
    }
}

impl Config {
    fn config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("/tmp"));
        path.push("lang-loader");
        path.push("config.json");
        path
    }

    /// Load the user's config, or the defaults if it is missing or invalid.
    pub fn load() -> Self {
        let path = Self::config_path();
        match Self::load_from_path(&path) {
            Ok(config) => config,
            Err(e) => {
                log::debug!("Using default config ({})", e);
                Self::default()
            }
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_path())
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| Error::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;
        fs::write(path, json).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Build the resource source named by `source`.
    pub fn build_source(&self) -> Result<Arc<dyn ResourceSource>> {
        if self.source.starts_with("http://") || self.source.starts_with("https://") {
            let timeout = Duration::from_secs(self.request_timeout_secs);
            Ok(Arc::new(HttpSource::new(&self.source, timeout)?))
        } else {
            Ok(Arc::new(FileSource::new(&self.source)))
        }
    }

    pub fn preference_store(&self) -> JsonPreferenceStore {
        match &self.preference_path {
            Some(path) => JsonPreferenceStore::new(path),
            None => JsonPreferenceStore::in_config_dir(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "source": "/srv/lang" }"#).expect("write");

        let config = Config::load_from_path(&path).expect("valid config");

        assert_eq!(config.source, "/srv/lang");
        assert_eq!(config.default_locale, "en-US");
        assert_eq!(config.request_timeout_secs, 5);
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("sub").join("config.json");
        let config = Config {
            source: "https://example.com/data/lang".into(),
            default_locale: "en-GB".into(),
            request_timeout_secs: 2,
            preference_path: Some(dir.path().join("prefs.json")),
        };

        config.save_to_path(&path).expect("save");
        assert_eq!(Config::load_from_path(&path).expect("load"), config);
    }

    #[test]
    fn invalid_json_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        fs::write(&path, "source = nope").expect("write");

        assert!(matches!(Config::load_from_path(&path), Err(Error::Config(_))));
    }
}
