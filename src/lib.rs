//! translator-registry
//!
//! Resolves translators by package name and locale, memoizes the result, and
//! falls back to caller-registered loaders when no package is installed.
//!
//! ```
//! use std::collections::HashMap;
//!
//! use translator_registry::{Package, RegistrySettings, TranslatorRegistry};
//!
//! let registry = TranslatorRegistry::from_settings(&RegistrySettings::default());
//! registry.register_loader("messages", |_name, _locale| {
//!     Ok(Package::new(HashMap::from([("hello".to_string(), "Bonjour".to_string())])))
//! });
//!
//! let translator = registry.get("messages", Some("fr_FR")).unwrap();
//! assert_eq!(translator.translate("hello"), "Bonjour");
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod loader;
pub mod locale;
pub mod registry;
pub mod store;
pub mod telemetry;
pub mod translator;

#[cfg(test)]
mod test_utils;

pub use config::{
    CacheSettings,
    ConfigError,
    RegistrySettings,
    load_settings,
};
pub use error::{
    LoaderError,
    RegistryError,
    StoreError,
};
pub use loader::LoaderTable;
pub use registry::TranslatorRegistry;
pub use store::{
    Package,
    PackageSpec,
    TranslatorLocator,
    TranslatorStore,
};
pub use translator::{
    MessageTranslator,
    SharedTranslator,
    Translator,
};
