//! Cache used when caching is disabled

use super::{
    CacheService,
    Factory,
};
use crate::error::RegistryError;
use crate::translator::SharedTranslator;

/// Cache that stores nothing; every `remember` runs the factory.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCache;

impl NullCache {
    /// キャッシュなし
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl CacheService for NullCache {
    fn remember(
        &self,
        _key: &str,
        _namespace: &str,
        factory: &mut Factory<'_>,
    ) -> Result<SharedTranslator, RegistryError> {
        factory()
    }

    fn read(&self, _key: &str, _namespace: &str) -> Option<SharedTranslator> {
        None
    }

    fn delete(&self, _key: &str, _namespace: &str) -> bool {
        false
    }

    fn clear(&self, _namespace: &str) {}
}
