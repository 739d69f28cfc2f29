//! Cache service used to memoize translator resolution
/// In-process cache
mod memory;
/// Disabled cache
mod null;

use std::fmt;

pub use memory::MemoryCache;
pub use null::NullCache;

use crate::error::RegistryError;
use crate::translator::SharedTranslator;

/// Factory invoked by [`CacheService::remember`] on a miss
pub type Factory<'a> = dyn FnMut() -> Result<SharedTranslator, RegistryError> + 'a;

/// Compute-if-absent cache of translators, partitioned by namespace.
///
/// Entries written under one namespace are never visible under another.
pub trait CacheService: Send + Sync + fmt::Debug {
    /// Returns the entry for `key`, or runs `factory`, stores its value and
    /// returns it.
    ///
    /// The factory runs synchronously on the calling thread. A failed factory
    /// stores nothing and its error is returned as is.
    fn remember(
        &self,
        key: &str,
        namespace: &str,
        factory: &mut Factory<'_>,
    ) -> Result<SharedTranslator, RegistryError>;

    /// Returns the live entry for `key`
    fn read(&self, key: &str, namespace: &str) -> Option<SharedTranslator>;

    /// Removes the entry for `key`; returns whether one existed
    fn delete(&self, key: &str, namespace: &str) -> bool;

    /// Removes every entry in `namespace`
    fn clear(&self, namespace: &str);
}
