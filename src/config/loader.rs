//! Reads registry settings from a configuration directory

use std::io::ErrorKind;
use std::path::Path;

use super::{
    ConfigError,
    RegistrySettings,
};

/// File looked up in the configuration directory
pub const CONFIG_FILE_NAME: &str = ".translator-registry.json";

/// Reads and validates `.translator-registry.json` in `config_dir`
///
/// A directory without the file yields [`RegistrySettings::default`]; fields
/// missing from the file take their defaults too.
///
/// # Errors
/// - [`ConfigError::IoError`] when the file exists but cannot be read
/// - [`ConfigError::ParseError`] when the file is not valid JSON settings
/// - [`ConfigError::ValidationErrors`] when a setting is out of range
pub fn load_settings(config_dir: &Path) -> Result<RegistrySettings, ConfigError> {
    let path = config_dir.join(CONFIG_FILE_NAME);

    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "No registry settings file, using defaults");
            return Ok(RegistrySettings::default());
        }
        Err(err) => return Err(err.into()),
    };

    let settings: RegistrySettings = serde_json::from_str(&content)?;
    settings.validate().map_err(ConfigError::ValidationErrors)?;
    tracing::debug!(path = %path.display(), ?settings, "Loaded registry settings");

    Ok(settings)
}
