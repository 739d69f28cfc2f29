use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::locale::is_valid_locale;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "cache.durationSecs")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    /// Error for the setting at `field_path`
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Failed to install log subscriber: {0}")]
    LoggingInit(String),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrySettings {
    /// Locale used when a lookup does not name one.
    /// If unset, read from `LC_ALL` / `LC_MESSAGES` / `LANG`.
    pub default_locale: Option<String>,

    pub cache: CacheSettings,

    /// `tracing-subscriber` filter directive (e.g. `"translator_registry=debug"`).
    pub log_filter: String,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CacheSettings {
    /// When false, every lookup that misses the store's built translators
    /// resolves again.
    pub enabled: bool,

    /// Seconds a cached translator stays valid. Unset: until cleared.
    pub duration_secs: Option<u64>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self { enabled: true, duration_secs: None }
    }
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self { default_locale: None, cache: CacheSettings::default(), log_filter: "info".to_string() }
    }
}

impl RegistrySettings {
    /// Checks every setting and reports all problems at once
    ///
    /// # Errors
    /// - Invalid default locale
    /// - Zero cache duration
    /// - Invalid log filter
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Some(locale) = &self.default_locale
            && !is_valid_locale(locale)
        {
            errors.push(ValidationError::new(
                "defaultLocale",
                format!(
                    "Invalid locale '{locale}'. Use a language with optional region, for example: \"en_US\", or remove this field"
                ),
            ));
        }

        if self.cache.duration_secs == Some(0) {
            errors.push(ValidationError::new(
                "cache.durationSecs",
                "The duration must be at least 1 second. Set \"enabled\": false to disable caching",
            ));
        }

        if let Err(e) = EnvFilter::try_new(&self.log_filter) {
            errors.push(ValidationError::new(
                "logFilter",
                format!("Invalid filter '{}': {e}", self.log_filter),
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::expect_used, clippy::panic)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;

    #[rstest]
    fn validate_valid_settings() {
        let settings = RegistrySettings::default();

        assert_that!(settings.validate(), ok(anything()));
    }

    #[rstest]
    fn deserialize_partial_settings() {
        let json = r#"{"defaultLocale": "fr_FR", "cache": {"durationSecs": 600}}"#;

        let settings: RegistrySettings = serde_json::from_str(json).unwrap();

        assert_that!(settings.default_locale, some(eq("fr_FR")));
        assert_that!(settings.cache.enabled, eq(true));
        assert_that!(settings.cache.duration_secs, some(eq(600)));
        assert_that!(settings.log_filter, eq("info"));
    }

    #[rstest]
    fn deserialize_empty_settings() {
        let json = "{}";

        let settings: RegistrySettings = serde_json::from_str(json).unwrap();

        assert_that!(settings.default_locale, none());
        assert_that!(settings.cache.enabled, eq(true));
        assert_that!(settings.cache.duration_secs, none());
    }

    #[rstest]
    #[case::empty("")]
    #[case::space("en US")]
    #[case::path("../en")]
    fn validate_invalid_default_locale(#[case] locale: &str) {
        let settings = RegistrySettings {
            default_locale: Some(locale.to_string()),
            ..RegistrySettings::default()
        };

        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("defaultLocale")),
                field!(ValidationError.message, contains_substring("Invalid locale"))
            ]])
        );
    }

    #[rstest]
    fn validate_invalid_cache_duration_zero() {
        let settings = RegistrySettings {
            cache: CacheSettings { enabled: true, duration_secs: Some(0) },
            ..RegistrySettings::default()
        };

        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("cache.durationSecs")),
                field!(ValidationError.message, contains_substring("at least 1 second"))
            ]])
        );
    }

    #[rstest]
    fn validate_invalid_log_filter() {
        let settings = RegistrySettings {
            log_filter: "translator_registry=loud".to_string(),
            ..RegistrySettings::default()
        };

        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("logFilter")),
                field!(ValidationError.message, contains_substring("Invalid filter"))
            ]])
        );
    }

    #[rstest]
    fn config_error_validation_errors_format() {
        let settings = RegistrySettings {
            default_locale: Some(String::new()),
            cache: CacheSettings { enabled: true, duration_secs: Some(0) },
            ..RegistrySettings::default()
        };

        let validation_result = settings.validate();
        let errors = validation_result.unwrap_err();
        let config_error = ConfigError::ValidationErrors(errors);

        let error_message = format!("{config_error}");
        assert_that!(error_message, contains_substring("Configuration validation failed"));
        assert_that!(error_message, contains_substring("1. defaultLocale"));
        assert_that!(error_message, contains_substring("2. cache.durationSecs"));
    }
}
