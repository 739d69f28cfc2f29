//! Default locale used when a caller does not name one

use std::fmt;
use std::sync::{
    PoisonError,
    RwLock,
};

/// Locale used when neither configuration nor environment provide one
pub const DEFAULT_LOCALE: &str = "en_US";

/// Environment variables consulted for the default locale, highest priority first
const LOCALE_ENV_VARS: [&str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];

/// Provides the current default locale.
pub trait LocaleSource: Send + Sync + fmt::Debug {
    /// Locale used when a lookup does not name one
    fn current_locale(&self) -> String;
}

/// Mutable process default locale.
#[derive(Debug)]
pub struct DefaultLocale {
    /// 現在のロケール
    locale: RwLock<String>,
}

impl DefaultLocale {
    /// 固定のデフォルトロケール
    #[must_use]
    pub fn new(locale: impl Into<String>) -> Self {
        Self { locale: RwLock::new(locale.into()) }
    }

    /// Reads the default locale from `LC_ALL`, `LC_MESSAGES` or `LANG`
    #[must_use]
    pub fn from_env() -> Self {
        let locale = LOCALE_ENV_VARS
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find_map(|value| normalize_posix_locale(&value))
            .unwrap_or_else(|| DEFAULT_LOCALE.to_owned());
        tracing::debug!(%locale, "Default locale from environment");
        Self::new(locale)
    }

    /// Changes the default locale for subsequent resolutions
    pub fn set_locale(&self, locale: impl Into<String>) {
        *self.locale.write().unwrap_or_else(PoisonError::into_inner) = locale.into();
    }
}

impl Default for DefaultLocale {
    fn default() -> Self {
        Self::new(DEFAULT_LOCALE)
    }
}

impl LocaleSource for DefaultLocale {
    fn current_locale(&self) -> String {
        self.locale.read().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

/// Strips the encoding and modifier from a POSIX locale (`fr_FR.UTF-8@euro` → `fr_FR`).
///
/// Returns `None` for empty values and for the `C` / `POSIX` locales.
#[must_use]
pub fn normalize_posix_locale(value: &str) -> Option<String> {
    let locale = value.split(['.', '@']).next().unwrap_or_default().trim();
    if locale.is_empty() || locale == "C" || locale == "POSIX" {
        return None;
    }
    Some(locale.to_owned())
}

/// Whether `locale` looks like a locale identifier (`en`, `en_US`, `zh-Hant-TW`)
#[must_use]
pub fn is_valid_locale(locale: &str) -> bool {
    !locale.is_empty()
        && locale.split(['_', '-']).all(|part| {
            !part.is_empty() && part.len() <= 8 && part.chars().all(|c| c.is_ascii_alphanumeric())
        })
}
