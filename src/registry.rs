//! Translator registry: cached resolution with loader fallback

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{
    CacheService,
    MemoryCache,
    NullCache,
};
use crate::config::{
    ConfigError,
    RegistrySettings,
    load_settings,
};
use crate::error::{
    LoaderError,
    RegistryError,
    StoreError,
};
use crate::loader::LoaderTable;
use crate::locale::{
    DefaultLocale,
    LocaleSource,
};
use crate::store::{
    Package,
    PackageSpec,
    TranslatorLocator,
    TranslatorStore,
};
use crate::translator::SharedTranslator;

/// Cache namespace reserved for translator resolution
pub const CACHE_NAMESPACE: &str = "_translator_core_";

/// Prefix of every cache key written by the registry
const CACHE_KEY_PREFIX: &str = "translations";

/// Cache key for a package name and locale: `translations.<name>.<locale>`
#[must_use]
pub fn cache_key(name: &str, locale: &str) -> String {
    format!("{CACHE_KEY_PREFIX}.{name}.{locale}")
}

/// Resolves translators by package name and locale.
///
/// Resolution order:
/// 1. translator already built by the store
/// 2. cached result for the (name, locale) pair
/// 3. the store, building from its installed package
/// 4. the loader registered for the package name, whose package is then
///    installed in the store
///
/// Successful results of steps 3 and 4 are cached. Failures are not cached, so
/// a later call tries again.
#[derive(Debug, Clone)]
pub struct TranslatorRegistry {
    /// 翻訳ストア
    store: Arc<dyn TranslatorStore>,
    /// ローダー
    loaders: Arc<LoaderTable>,
    /// 解決結果のキャッシュ
    cache: Arc<dyn CacheService>,
    /// デフォルトロケール
    locale: Arc<dyn LocaleSource>,
}

impl TranslatorRegistry {
    /// Assembles a registry from its collaborators
    #[must_use]
    pub fn new(
        store: Arc<dyn TranslatorStore>,
        loaders: Arc<LoaderTable>,
        cache: Arc<dyn CacheService>,
        locale: Arc<dyn LocaleSource>,
    ) -> Self {
        Self { store, loaders, cache, locale }
    }

    /// Builds a registry with the default store, an empty loader table, and
    /// the cache and default locale described by `settings`
    #[must_use]
    pub fn from_settings(settings: &RegistrySettings) -> Self {
        let cache: Arc<dyn CacheService> = if !settings.cache.enabled {
            Arc::new(NullCache::new())
        } else if let Some(secs) = settings.cache.duration_secs {
            Arc::new(MemoryCache::with_ttl(Duration::from_secs(secs)))
        } else {
            Arc::new(MemoryCache::new())
        };

        let locale = settings
            .default_locale
            .as_ref()
            .map_or_else(DefaultLocale::from_env, DefaultLocale::new);

        Self::new(
            Arc::new(TranslatorLocator::new()),
            Arc::new(LoaderTable::new()),
            cache,
            Arc::new(locale),
        )
    }

    /// Builds a registry from the settings file in `config_dir`
    ///
    /// A directory without a settings file gives the default registry.
    ///
    /// # Errors
    /// The settings file cannot be read, parsed, or validated. See
    /// [`load_settings`].
    pub fn from_config_dir(config_dir: &Path) -> Result<Self, ConfigError> {
        let settings = load_settings(config_dir)?;
        Ok(Self::from_settings(&settings))
    }

    /// Returns the translator for `name` in `locale`, or in the default locale
    /// when `locale` is `None`
    ///
    /// # Errors
    /// - [`StoreError::NotFound`] (as [`RegistryError::Store`]) when the store
    ///   has no package and no loader is registered for `name`
    /// - [`RegistryError::Loader`] when the registered loader fails
    pub fn get(&self, name: &str, locale: Option<&str>) -> Result<SharedTranslator, RegistryError> {
        let locale = locale.map_or_else(|| self.locale.current_locale(), str::to_owned);

        if let Some(translator) = self.store.loaded(name, &locale) {
            return Ok(translator);
        }

        let key = cache_key(name, &locale);
        self.cache.remember(&key, CACHE_NAMESPACE, &mut || self.resolve(name, &locale))
    }

    /// Registers a loader used when the store has no package for `name`
    ///
    /// The loader receives the package name and the locale. A later
    /// registration for the same name replaces it.
    pub fn register_loader<F>(&self, name: impl Into<String>, loader: F)
    where
        F: Fn(&str, &str) -> Result<Package, LoaderError> + Send + Sync + 'static,
    {
        self.loaders.register_loader(name, loader);
    }

    /// Whether a loader is registered for `name`
    #[must_use]
    pub fn has_loader(&self, name: &str) -> bool {
        self.loaders.has_loader(name)
    }

    /// Drops every cached resolution
    pub fn clear_cache(&self) {
        self.cache.clear(CACHE_NAMESPACE);
    }

    /// 翻訳ストア
    #[must_use]
    pub fn store(&self) -> &Arc<dyn TranslatorStore> {
        &self.store
    }

    /// Loader table consulted when the store has no package
    #[must_use]
    pub const fn loaders(&self) -> &Arc<LoaderTable> {
        &self.loaders
    }

    /// 解決結果のキャッシュ
    #[must_use]
    pub fn cache(&self) -> &Arc<dyn CacheService> {
        &self.cache
    }

    /// キャッシュミス時の解決処理
    fn resolve(&self, name: &str, locale: &str) -> Result<SharedTranslator, RegistryError> {
        match self.store.get(name, locale) {
            Ok(translator) => Ok(translator),
            Err(err @ StoreError::NotFound { .. }) => {
                let Some(loader) = self.loaders.loader_for(name) else {
                    return Err(err.into());
                };
                tracing::debug!(name, locale, "Package not found, building with loader");

                let package = loader(name, locale).map_err(|source| RegistryError::Loader {
                    name: name.to_owned(),
                    locale: locale.to_owned(),
                    source,
                })?;
                self.store.set(name, locale, PackageSpec::Ready(package));

                Ok(self.store.get(name, locale)?)
            }
            Err(err) => Err(err.into()),
        }
    }
}
