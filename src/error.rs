//! Error types for stores, loaders and translator resolution

use thiserror::Error;

/// Errors reported by a backing translator store
#[derive(Error, Debug)]
pub enum StoreError {
    /// No package exists for the combination of name and locale
    #[error("Translator package '{name}' not found for locale '{locale}'")]
    NotFound { name: String, locale: String },
    /// A deferred package factory failed while building the package
    #[error("Failed to build package '{name}' for locale '{locale}': {source}")]
    Build {
        name: String,
        locale: String,
        #[source]
        source: LoaderError,
    },
}

impl StoreError {
    /// Creates a `NotFound` error for the given package and locale
    #[must_use]
    pub fn not_found(name: impl Into<String>, locale: impl Into<String>) -> Self {
        Self::NotFound { name: name.into(), locale: locale.into() }
    }
}

/// Errors raised by loader functions while constructing a package
#[derive(Error, Debug)]
pub enum LoaderError {
    /// Free-form failure reported by the loader
    #[error("{0}")]
    Message(String),
    /// Error when failing to read catalog contents
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    /// Error when failing to parse catalog contents
    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

impl LoaderError {
    /// Wraps a free-form loader failure
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

/// Errors returned when a translator cannot be resolved
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The backing store failed; `NotFound` is forwarded unchanged
    #[error(transparent)]
    Store(#[from] StoreError),
    /// A registered loader failed
    #[error("Loader for package '{name}' failed for locale '{locale}': {source}")]
    Loader {
        name: String,
        locale: String,
        #[source]
        source: LoaderError,
    },
}

impl RegistryError {
    /// Whether the resolution failed because no translator exists
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Store(StoreError::NotFound { .. }))
    }
}
