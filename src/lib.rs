// SPDX-License-Identifier: MPL-2.0

//! Localization resource loader.
//!
//! Resolves a locale into merged translation strings from `.lang` files:
//!
//! 1. **Common** strings (`env.lang`) shared by every locale
//! 2. **Per-locale** strings (`env.<locale>.lang`) overlaid on top
//!
//! Both tiers are cached independently for the life of the process. When a
//! locale cannot be loaded the default locale is substituted once, and when
//! a key is missing lookups fall back to a caller-supplied string or the key
//! itself. Nothing in the lookup path returns an error to the caller.
//!
//! See [`i18n::I18n`] for the entry point.

pub mod catalog;
pub mod config;
pub mod error;
pub mod i18n;
pub mod loader;
pub mod preference;
pub mod state;
pub mod translate;

pub use catalog::{AvailableLocale, LocaleCatalog, DEFAULT_LOCALE};
pub use error::{Error, Result};
pub use i18n::I18n;
pub use loader::ResourceSet;
