//! In-process translator cache

use std::collections::HashMap;
use std::sync::{
    Arc,
    Mutex,
    MutexGuard,
    PoisonError,
    TryLockError,
};
use std::time::{
    Duration,
    Instant,
};

use super::{
    CacheService,
    Factory,
};
use crate::error::RegistryError;
use crate::translator::SharedTranslator;

/// Stored value and the time it was written
#[derive(Debug)]
struct CacheEntry {
    /// キャッシュされた翻訳
    value: SharedTranslator,
    /// 書き込み時刻
    stored_at: Instant,
}

/// Per-key slot; holding its lock serializes factory runs for that key
type Slot = Arc<Mutex<Option<CacheEntry>>>;

/// In-process translator cache with an optional time-to-live.
///
/// Callers asking for the same missing key wait on that key's slot, so the
/// factory runs at most once per key; other keys are not blocked.
///
/// Only slots holding a live entry are retained: a failed factory run drops
/// its slot, and with a TTL every miss evicts the expired entries.
#[derive(Debug, Default)]
pub struct MemoryCache {
    /// (namespace, key) → slot
    slots: Mutex<HashMap<(String, String), Slot>>,
    /// Entries older than this are treated as absent
    ttl: Option<Duration>,
}

/// Locks `mutex`, recovering the guard if a previous holder panicked
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryCache {
    /// Cache whose entries never expire
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache whose entries expire `ttl` after being written
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self { slots: Mutex::default(), ttl: Some(ttl) }
    }

    /// 有効期限（なければ無期限）
    #[must_use]
    pub const fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Number of live entries in `namespace`
    #[must_use]
    pub fn len(&self, namespace: &str) -> usize {
        let slots: Vec<Slot> = lock(&self.slots)
            .iter()
            .filter(|((ns, _), _)| ns == namespace)
            .map(|(_, slot)| Arc::clone(slot))
            .collect();
        slots.iter().filter(|slot| lock(slot).as_ref().is_some_and(|e| self.is_live(e))).count()
    }

    /// Whether `namespace` holds no live entry
    #[must_use]
    pub fn is_empty(&self, namespace: &str) -> bool {
        self.len(namespace) == 0
    }

    /// スロットを取得（なければ作成）
    fn slot(&self, key: &str, namespace: &str) -> Slot {
        let mut slots = lock(&self.slots);
        Arc::clone(slots.entry((namespace.to_owned(), key.to_owned())).or_default())
    }

    /// Existing slot without creating one
    fn existing_slot(&self, key: &str, namespace: &str) -> Option<Slot> {
        lock(&self.slots).get(&(namespace.to_owned(), key.to_owned())).cloned()
    }

    /// Whether `slot` is still the one registered for the key
    fn is_attached(&self, key: &str, namespace: &str, slot: &Slot) -> bool {
        self.existing_slot(key, namespace).is_some_and(|current| Arc::ptr_eq(&current, slot))
    }

    /// Removes `slot` unless it was already replaced
    fn detach(&self, key: &str, namespace: &str, slot: &Slot) {
        let mut slots = lock(&self.slots);
        let map_key = (namespace.to_owned(), key.to_owned());
        if slots.get(&map_key).is_some_and(|current| Arc::ptr_eq(current, slot)) {
            slots.remove(&map_key);
        }
    }

    /// 期限切れのエントリを削除する
    ///
    /// Slots locked by another caller are left alone.
    fn evict_expired(&self) {
        lock(&self.slots).retain(|_, slot| {
            let entry = match slot.try_lock() {
                Ok(entry) => entry,
                Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
                Err(TryLockError::WouldBlock) => return true,
            };
            entry.as_ref().is_some_and(|e| self.is_live(e))
        });
    }

    /// エントリが有効期限内か
    fn is_live(&self, entry: &CacheEntry) -> bool {
        self.ttl.is_none_or(|ttl| entry.stored_at.elapsed() < ttl)
    }
}

impl CacheService for MemoryCache {
    fn remember(
        &self,
        key: &str,
        namespace: &str,
        factory: &mut Factory<'_>,
    ) -> Result<SharedTranslator, RegistryError> {
        loop {
            let slot = self.slot(key, namespace);
            let mut entry = lock(&slot);
            // 待機中に削除されたスロットには書き込まない
            if !self.is_attached(key, namespace, &slot) {
                continue;
            }

            if let Some(cached) = entry.as_ref()
                && self.is_live(cached)
            {
                tracing::trace!(namespace, key, "Cache hit");
                return Ok(Arc::clone(&cached.value));
            }

            tracing::debug!(namespace, key, "Cache miss");
            let value = match factory() {
                Ok(value) => value,
                Err(err) => {
                    *entry = None;
                    self.detach(key, namespace, &slot);
                    return Err(err);
                }
            };
            *entry = Some(CacheEntry { value: Arc::clone(&value), stored_at: Instant::now() });
            if self.ttl.is_some() {
                self.evict_expired();
            }

            return Ok(value);
        }
    }

    fn read(&self, key: &str, namespace: &str) -> Option<SharedTranslator> {
        let slot = self.existing_slot(key, namespace)?;
        let entry = lock(&slot);
        entry.as_ref().filter(|e| self.is_live(e)).map(|e| Arc::clone(&e.value))
    }

    fn delete(&self, key: &str, namespace: &str) -> bool {
        let removed = lock(&self.slots).remove(&(namespace.to_owned(), key.to_owned()));
        removed.is_some_and(|slot| lock(&slot).take().is_some())
    }

    fn clear(&self, namespace: &str) {
        tracing::debug!(namespace, "Clearing cache namespace");
        lock(&self.slots).retain(|(ns, _), _| ns != namespace);
    }
}
