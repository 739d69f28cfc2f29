//! Log subscriber setup for hosts without their own

use tracing_subscriber::EnvFilter;

use crate::config::{
    ConfigError,
    RegistrySettings,
};

/// Installs a global `fmt` subscriber filtered by `settings.log_filter`
///
/// # Errors
/// - `ValidationErrors` when the settings are invalid
/// - `LoggingInit` when a global subscriber is already installed
pub fn init_logging(settings: &RegistrySettings) -> Result<(), ConfigError> {
    settings.validate().map_err(ConfigError::ValidationErrors)?;
    let filter = EnvFilter::try_new(&settings.log_filter)
        .map_err(|e| ConfigError::LoggingInit(e.to_string()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| ConfigError::LoggingInit(e.to_string()))
}
