//! Translator capability and the map-backed implementation

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Translator shared between the store, the cache and callers
pub type SharedTranslator = Arc<dyn Translator>;

/// Maps message keys to localized strings for one package and locale.
pub trait Translator: Send + Sync + fmt::Debug {
    /// Locale this translator produces messages for
    fn locale(&self) -> &str;

    /// Returns the message for `key`, if any
    fn lookup(&self, key: &str) -> Option<&str>;

    /// Translates `key`; unknown keys are returned unchanged.
    fn translate(&self, key: &str) -> String {
        self.lookup(key).unwrap_or(key).to_owned()
    }
}

/// Translator backed by a message map, with an optional fallback translator
/// consulted for keys missing from its own messages.
#[derive(Debug, Clone)]
pub struct MessageTranslator {
    /// 対象ロケール
    locale: String,
    /// キー → メッセージ
    messages: HashMap<String, String>,
    /// キーが見つからない場合に参照する翻訳
    fallback: Option<SharedTranslator>,
}

impl MessageTranslator {
    /// `locale` の翻訳をメッセージから作成
    #[must_use]
    pub fn new(locale: impl Into<String>, messages: HashMap<String, String>) -> Self {
        Self { locale: locale.into(), messages, fallback: None }
    }

    /// Sets the translator consulted for keys this one does not define
    #[must_use]
    pub fn with_fallback(mut self, fallback: SharedTranslator) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// フォールバック先の翻訳
    #[must_use]
    pub fn fallback(&self) -> Option<&SharedTranslator> {
        self.fallback.as_ref()
    }
}

impl Translator for MessageTranslator {
    fn locale(&self) -> &str {
        &self.locale
    }

    fn lookup(&self, key: &str) -> Option<&str> {
        self.messages
            .get(key)
            .map(String::as_str)
            .or_else(|| self.fallback.as_ref().and_then(|fallback| fallback.lookup(key)))
    }
}
