//! テスト用ユーティリティ関数
//!
//! 複数のテストモジュールで使用される共通のヘルパー関数を提供します。
#![cfg(test)]

use std::collections::HashMap;
use std::sync::Arc;

use crate::store::Package;
use crate::translator::{
    MessageTranslator,
    SharedTranslator,
};

/// キーとメッセージの組からメッセージマップを作成する
fn messages(entries: &[(&str, &str)]) -> HashMap<String, String> {
    entries.iter().map(|(key, message)| ((*key).to_string(), (*message).to_string())).collect()
}

/// テスト用の Package を作成する
///
/// # Arguments
/// * `entries` - キーとメッセージの組
pub(crate) fn package(entries: &[(&str, &str)]) -> Package {
    Package::new(messages(entries))
}

/// テスト用の翻訳を作成する
///
/// # Arguments
/// * `locale` - ロケール（例: "en_US", "ja_JP"）
/// * `entries` - キーとメッセージの組
pub(crate) fn translator(locale: &str, entries: &[(&str, &str)]) -> SharedTranslator {
    Arc::new(MessageTranslator::new(locale, messages(entries)))
}
