//! Loader table: fallback package constructors by package name

use std::collections::HashMap;
use std::fmt;
use std::sync::{
    Arc,
    PoisonError,
    RwLock,
};

use crate::error::LoaderError;
use crate::store::Package;

/// Builds the package for a package name and locale
pub type Loader = Arc<dyn Fn(&str, &str) -> Result<Package, LoaderError> + Send + Sync>;

/// Loader functions indexed by package name.
///
/// Loaders are consulted when the store has no package for a name and locale.
/// Registering a loader for a name that already has one replaces it.
#[derive(Default)]
pub struct LoaderTable {
    /// パッケージ名 → ローダー
    loaders: RwLock<HashMap<String, Loader>>,
}

impl LoaderTable {
    /// 空のローダーテーブルを作成
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `loader` for `name`, replacing any previous one
    ///
    /// The loader receives the package name and the locale.
    pub fn register_loader<F>(&self, name: impl Into<String>, loader: F)
    where
        F: Fn(&str, &str) -> Result<Package, LoaderError> + Send + Sync + 'static,
    {
        let name = name.into();
        tracing::debug!(%name, "Registering loader");
        self.loaders.write().unwrap_or_else(PoisonError::into_inner).insert(name, Arc::new(loader));
    }

    /// Whether a loader is registered for `name`
    #[must_use]
    pub fn has_loader(&self, name: &str) -> bool {
        self.loaders.read().unwrap_or_else(PoisonError::into_inner).contains_key(name)
    }

    /// Returns the loader registered for `name`
    #[must_use]
    pub fn loader_for(&self, name: &str) -> Option<Loader> {
        self.loaders.read().unwrap_or_else(PoisonError::into_inner).get(name).cloned()
    }
}

impl fmt::Debug for LoaderTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let loaders = self.loaders.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<&String> = loaders.keys().collect();
        names.sort();
        f.debug_struct("LoaderTable").field("loaders", &names).finish()
    }
}
