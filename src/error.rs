// SPDX-License-Identifier: MPL-2.0

//! Error types for the localization loader.
//!
//! Only the fetch layer and the caller-facing locale selection ever hand an
//! [`Error`] back. Everything between the fetcher and the translation lookup
//! absorbs failures and degrades to a usable (possibly empty) mapping.

use std::path::PathBuf;

/// Errors produced while retrieving resources or persisting preferences.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The backing source answered with a non-success status.
    #[error("failed to load {name}: status {status}")]
    Status { name: String, status: u16 },

    /// The request never produced a response (DNS, connect, timeout...).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// File-backed retrieval or preference storage failed.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The resource was retrieved but carried no content.
    #[error("resource {0} is empty")]
    EmptyPayload(String),

    /// The locale is not part of the catalog and cannot be selected.
    #[error("locale {0} is not available")]
    LocaleUnavailable(String),

    /// The preference document could not be encoded or decoded.
    #[error("preference error: {0}")]
    Preference(String),

    /// The configuration file could not be encoded or decoded.
    #[error("config error: {0}")]
    Config(String),

    /// A process-wide instance was installed twice.
    #[error("a localizer is already installed")]
    AlreadyInstalled,
}

impl Error {
    /// Whether this error came from retrieving a resource payload.
    pub fn is_retrieval(&self) -> bool {
        matches!(
            self,
            Error::Status { .. } | Error::Transport(_) | Error::Io { .. } | Error::EmptyPayload(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
