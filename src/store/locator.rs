//! Backing translator store

use std::collections::HashMap;
use std::fmt;
use std::sync::{
    Arc,
    PoisonError,
    RwLock,
};

use super::package::{
    PackageKey,
    PackageLocator,
    PackageSpec,
    package_key,
};
use crate::error::StoreError;
use crate::translator::{
    MessageTranslator,
    SharedTranslator,
};

/// Store of translators, queried by package name and locale.
///
/// Implementations report a missing translator with [`StoreError::NotFound`].
pub trait TranslatorStore: Send + Sync + fmt::Debug {
    /// Returns the translator for `name` and `locale`, building it if needed
    fn get(&self, name: &str, locale: &str) -> Result<SharedTranslator, StoreError>;

    /// Installs the package used to build the translator for `name` and `locale`
    fn set(&self, name: &str, locale: &str, spec: PackageSpec);

    /// Returns the translator only if it is already built and held in memory
    fn loaded(&self, name: &str, locale: &str) -> Option<SharedTranslator>;
}

/// Built translators with the install generation of each key
#[derive(Default)]
struct BuiltTranslators {
    /// (name, locale) → 構築済みの翻訳
    translators: HashMap<PackageKey, SharedTranslator>,
    /// (name, locale) → `set` が呼ばれた回数
    generations: HashMap<PackageKey, u64>,
}

impl BuiltTranslators {
    /// Current install generation of `key`
    fn generation(&self, key: &PackageKey) -> u64 {
        self.generations.get(key).copied().unwrap_or_default()
    }
}

/// Default store: builds [`MessageTranslator`]s from the packages held by a
/// [`PackageLocator`] and keeps every built translator.
///
/// A translator built from a package that was replaced while it was being
/// built is returned to its caller but never kept.
#[derive(Default)]
pub struct TranslatorLocator {
    /// パッケージ管理
    packages: PackageLocator,
    /// 構築済みの翻訳
    built: RwLock<BuiltTranslators>,
}

impl TranslatorLocator {
    /// 空のストアを作成
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Packages the translators are built from
    #[must_use]
    pub const fn packages(&self) -> &PackageLocator {
        &self.packages
    }

    /// 翻訳を構築する
    ///
    /// `chain` holds the locales already visited on the current fallback chain.
    fn build(
        &self,
        name: &str,
        locale: &str,
        chain: &mut Vec<String>,
    ) -> Result<SharedTranslator, StoreError> {
        let key = package_key(name, locale);
        let generation = {
            let built = self.built.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(translator) = built.translators.get(&key) {
                return Ok(Arc::clone(translator));
            }
            built.generation(&key)
        };

        let package = self.packages.get(name, locale)?;
        chain.push(locale.to_owned());

        let mut translator = MessageTranslator::new(locale, package.messages);
        if let Some(fallback_locale) = package.fallback_locale {
            if chain.contains(&fallback_locale) {
                tracing::warn!(name, locale, %fallback_locale, "Fallback locale cycle ignored");
            } else {
                match self.build(name, &fallback_locale, chain) {
                    Ok(fallback) => translator = translator.with_fallback(fallback),
                    Err(StoreError::NotFound { .. }) => {
                        tracing::debug!(name, locale, %fallback_locale, "Fallback package not found");
                    }
                    Err(err) => return Err(err),
                }
            }
        }

        let translator: SharedTranslator = Arc::new(translator);
        let mut built = self.built.write().unwrap_or_else(PoisonError::into_inner);
        if built.generation(&key) != generation {
            tracing::debug!(name, locale, "Package replaced during build, translator not kept");
            return Ok(translator);
        }
        // 並行して構築された場合は先に登録されたものを使う
        let translator = built.translators.entry(key).or_insert(translator);
        Ok(Arc::clone(translator))
    }
}

impl TranslatorStore for TranslatorLocator {
    fn get(&self, name: &str, locale: &str) -> Result<SharedTranslator, StoreError> {
        self.build(name, locale, &mut Vec::new())
    }

    fn set(&self, name: &str, locale: &str, spec: PackageSpec) {
        let key = package_key(name, locale);
        let mut built = self.built.write().unwrap_or_else(PoisonError::into_inner);
        self.packages.set(name, locale, spec);
        *built.generations.entry(key.clone()).or_default() += 1;
        built.translators.remove(&key);
    }

    fn loaded(&self, name: &str, locale: &str) -> Option<SharedTranslator> {
        self.built
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .translators
            .get(&package_key(name, locale))
            .cloned()
    }
}

impl fmt::Debug for TranslatorLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslatorLocator")
            .field("packages", &self.packages)
            .field("built", &"<HashMap<(String, String), SharedTranslator>>")
            .finish()
    }
}
