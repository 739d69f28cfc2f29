//! レジストリの解決動作に関するテスト

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]
#![allow(clippy::indexing_slicing)]
#![allow(missing_docs)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{
    AtomicUsize,
    Ordering,
};

use googletest::prelude::*;
use translator_registry::cache::{
    CacheService,
    MemoryCache,
};
use translator_registry::locale::DefaultLocale;
use translator_registry::registry::{
    CACHE_NAMESPACE,
    cache_key,
};
use translator_registry::{
    LoaderTable,
    MessageTranslator,
    Package,
    RegistryError,
    SharedTranslator,
    StoreError,
    TranslatorLocator,
    TranslatorRegistry,
    TranslatorStore,
};

/// Registry with the shared collaborators exposed for inspection
struct Harness {
    registry: TranslatorRegistry,
    store: Arc<TranslatorLocator>,
    cache: Arc<MemoryCache>,
    locale: Arc<DefaultLocale>,
}

fn create_harness() -> Harness {
    let store = Arc::new(TranslatorLocator::new());
    let cache = Arc::new(MemoryCache::new());
    let locale = Arc::new(DefaultLocale::new("en_US"));
    let registry = TranslatorRegistry::new(
        store.clone(),
        Arc::new(LoaderTable::new()),
        cache.clone(),
        locale.clone(),
    );
    Harness { registry, store, cache, locale }
}

fn package(entries: &[(&str, &str)]) -> Package {
    Package::new(entries.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect())
}

/// Registers a "messages" loader returning French for fr_FR and counts its calls
fn register_counting_loader(registry: &TranslatorRegistry) -> Arc<AtomicUsize> {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    registry.register_loader("messages", move |_, locale| {
        counter.fetch_add(1, Ordering::SeqCst);
        let hello = if locale == "fr_FR" { "Bonjour" } else { "Hello" };
        Ok(package(&[("hello", hello)]))
    });
    calls
}

#[googletest::test]
fn test_loader_scenario_resolves_once() {
    let harness = create_harness();
    let calls = register_counting_loader(&harness.registry);

    let first = harness.registry.get("messages", Some("fr_FR")).unwrap();
    let second = harness.registry.get("messages", Some("fr_FR")).unwrap();

    expect_that!(first.translate("hello"), eq("Bonjour"));
    expect_that!(Arc::ptr_eq(&first, &second), eq(true));
    expect_that!(calls.load(Ordering::SeqCst), eq(1));
}

#[googletest::test]
fn test_loader_fallback_installs_package_in_store() {
    let harness = create_harness();
    register_counting_loader(&harness.registry);

    harness.registry.get("messages", Some("fr_FR")).unwrap();

    expect_that!(harness.store.packages().has("messages", "fr_FR"), eq(true));
    let direct = harness.store.get("messages", "fr_FR").unwrap();
    expect_that!(direct.translate("hello"), eq("Bonjour"));
}

#[googletest::test]
fn test_cached_result_served_without_store() {
    let harness = create_harness();
    let calls = register_counting_loader(&harness.registry);
    harness.registry.get("messages", Some("fr_FR")).unwrap();

    // ストアの構築済み翻訳を破棄してもキャッシュから返る
    harness.store.set("messages", "fr_FR", package(&[("hello", "Salut")]).into());
    let cached = harness.registry.get("messages", Some("fr_FR")).unwrap();

    expect_that!(cached.translate("hello"), eq("Bonjour"));
    expect_that!(calls.load(Ordering::SeqCst), eq(1));

    // キャッシュを消すとストアの新しいパッケージが使われる
    harness.registry.clear_cache();
    let rebuilt = harness.registry.get("messages", Some("fr_FR")).unwrap();
    expect_that!(rebuilt.translate("hello"), eq("Salut"));
    expect_that!(calls.load(Ordering::SeqCst), eq(1));
}

#[googletest::test]
fn test_missing_package_without_loader_is_not_found() {
    let harness = create_harness();

    let err = harness.registry.get("bar", Some("fr_FR")).unwrap_err();

    let RegistryError::Store(StoreError::NotFound { name, locale }) = err else {
        panic!("expected NotFound");
    };
    expect_that!(name, eq("bar"));
    expect_that!(locale, eq("fr_FR"));
    expect_that!(harness.cache.read(&cache_key("bar", "fr_FR"), CACHE_NAMESPACE), none());
}

#[googletest::test]
fn test_default_locale_substitution() {
    let harness = create_harness();
    register_counting_loader(&harness.registry);
    harness.locale.set_locale("fr_FR");

    let implicit = harness.registry.get("messages", None).unwrap();
    let explicit = harness.registry.get("messages", Some("fr_FR")).unwrap();

    expect_that!(implicit.locale(), eq("fr_FR"));
    expect_that!(Arc::ptr_eq(&implicit, &explicit), eq(true));
}

#[googletest::test]
fn test_loader_overwrite_uses_latest() {
    let harness = create_harness();
    harness.registry.register_loader("messages", |_, _| Ok(package(&[("hello", "first")])));
    harness.registry.register_loader("messages", |_, _| Ok(package(&[("hello", "second")])));

    let translator = harness.registry.get("messages", Some("en_US")).unwrap();

    expect_that!(translator.translate("hello"), eq("second"));
    expect_that!(harness.registry.has_loader("messages"), eq(true));
    expect_that!(harness.registry.has_loader("validation"), eq(false));
}

#[googletest::test]
fn test_cache_namespace_isolation() {
    let harness = create_harness();
    register_counting_loader(&harness.registry);
    let key = cache_key("messages", "fr_FR");
    let foreign: SharedTranslator = Arc::new(MessageTranslator::new(
        "fr_FR",
        HashMap::from([("hello".to_string(), "foreign".to_string())]),
    ));
    harness
        .cache
        .remember(&key, "other_namespace", &mut || Ok::<_, RegistryError>(Arc::clone(&foreign)))
        .unwrap();

    let translator = harness.registry.get("messages", Some("fr_FR")).unwrap();
    harness.registry.clear_cache();

    expect_that!(translator.translate("hello"), eq("Bonjour"));
    expect_that!(harness.cache.read(&key, "other_namespace").is_some(), eq(true));
    expect_that!(harness.cache.read(&key, CACHE_NAMESPACE), none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_get_runs_loader_once() {
    let harness = create_harness();
    let calls = register_counting_loader(&harness.registry);

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let registry = harness.registry.clone();
            tokio::task::spawn_blocking(move || registry.get("messages", Some("fr_FR")))
        })
        .collect();
    let results = futures::future::join_all(handles).await;

    let translators: Vec<_> = results.into_iter().map(|r| r.unwrap().unwrap()).collect();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(translators.iter().all(|t| Arc::ptr_eq(t, &translators[0])));
    assert!(translators.iter().all(|t| t.translate("hello") == "Bonjour"));
}
