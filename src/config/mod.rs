//! Registry configuration
/// Settings file reader
mod loader;
/// Configuration types and settings
mod types;

pub use loader::{
    CONFIG_FILE_NAME,
    load_settings,
};
pub use types::{
    CacheSettings,
    ConfigError,
    RegistrySettings,
    ValidationError,
};
