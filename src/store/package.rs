//! Message packages and the package locator

use std::collections::HashMap;
use std::fmt;
use std::sync::{
    Arc,
    PoisonError,
    RwLock,
};

use serde::{
    Deserialize,
    Serialize,
};

use crate::error::{
    LoaderError,
    StoreError,
};

/// Message catalog for one package and locale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Package {
    pub messages: HashMap<String, String>,
    /// Locale of the same package consulted for keys missing here
    pub fallback_locale: Option<String>,
}

impl Package {
    /// メッセージからフォールバックなしのパッケージを作成
    #[must_use]
    pub const fn new(messages: HashMap<String, String>) -> Self {
        Self { messages, fallback_locale: None }
    }

    /// Sets the locale consulted for keys missing from this package
    #[must_use]
    pub fn with_fallback_locale(mut self, locale: impl Into<String>) -> Self {
        self.fallback_locale = Some(locale.into());
        self
    }

    /// Parses a package from its JSON form
    ///
    /// ```json
    /// {"messages": {"hello": "Bonjour"}, "fallbackLocale": "en_US"}
    /// ```
    pub fn from_json(content: &str) -> Result<Self, LoaderError> {
        Ok(serde_json::from_str(content)?)
    }
}

/// Deferred package construction
pub type PackageFactory = Arc<dyn Fn() -> Result<Package, LoaderError> + Send + Sync>;

/// How a package is installed: already built, or built on first access.
#[derive(Clone)]
pub enum PackageSpec {
    Ready(Package),
    Deferred(PackageFactory),
}

impl PackageSpec {
    /// Wraps a closure that builds the package on first access
    pub fn deferred<F>(factory: F) -> Self
    where
        F: Fn() -> Result<Package, LoaderError> + Send + Sync + 'static,
    {
        Self::Deferred(Arc::new(factory))
    }
}

impl From<Package> for PackageSpec {
    fn from(package: Package) -> Self {
        Self::Ready(package)
    }
}

impl fmt::Debug for PackageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(package) => f.debug_tuple("Ready").field(package).finish(),
            Self::Deferred(_) => f.debug_tuple("Deferred").field(&"<PackageFactory>").finish(),
        }
    }
}

/// Key of a package: (name, locale)
pub(crate) type PackageKey = (String, String);

/// Builds the key for `name` and `locale`
pub(crate) fn package_key(name: &str, locale: &str) -> PackageKey {
    (name.to_owned(), locale.to_owned())
}

/// Stores package specs by name and locale.
#[derive(Debug, Default)]
pub struct PackageLocator {
    /// (name, locale) → spec
    specs: RwLock<HashMap<PackageKey, PackageSpec>>,
}

impl PackageLocator {
    /// 空のロケーターを作成
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a spec, replacing any previous one for the same key
    pub fn set(&self, name: &str, locale: &str, spec: impl Into<PackageSpec>) {
        let spec = spec.into();
        tracing::debug!(name, locale, ?spec, "Installing package");
        self.specs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(package_key(name, locale), spec);
    }

    /// Whether a spec (built or deferred) is installed for `name` and `locale`
    #[must_use]
    pub fn has(&self, name: &str, locale: &str) -> bool {
        self.specs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&package_key(name, locale))
    }

    /// Returns the package for `name` and `locale`
    ///
    /// A deferred spec is built here, without holding the locator's lock, and
    /// then replaced by the built package unless it was reinstalled meanwhile.
    pub fn get(&self, name: &str, locale: &str) -> Result<Package, StoreError> {
        let key = package_key(name, locale);

        let factory = {
            let specs = self.specs.read().unwrap_or_else(PoisonError::into_inner);
            match specs.get(&key) {
                None => return Err(StoreError::not_found(name, locale)),
                Some(PackageSpec::Ready(package)) => return Ok(package.clone()),
                Some(PackageSpec::Deferred(factory)) => Arc::clone(factory),
            }
        };

        tracing::debug!(name, locale, "Building deferred package");
        let package = factory().map_err(|source| StoreError::Build {
            name: name.to_owned(),
            locale: locale.to_owned(),
            source,
        })?;

        let mut specs = self.specs.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(spec) = specs.get_mut(&key)
            && matches!(spec, PackageSpec::Deferred(current) if Arc::ptr_eq(current, &factory))
        {
            *spec = PackageSpec::Ready(package.clone());
        }

        Ok(package)
    }
}
