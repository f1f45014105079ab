//! Translation table for a single locale

use std::collections::HashMap;

use serde_json::Value;

use super::{
    I18nError,
    Locale,
};

/// ネストしたキーの区切り文字
pub const KEY_SEPARATOR: &str = ".";

/// 1 ロケール分の翻訳テーブル
///
/// 起動時に読み込まれ、実行中に変更されることはない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationTable {
    /// テーブルのロケール
    locale: Locale,

    /// Flattened translation key map (e.g., "contact.title" -> "Contact Us").
    entries: HashMap<String, String>,
}

impl TranslationTable {
    #[must_use]
    pub const fn new(locale: Locale, entries: HashMap<String, String>) -> Self {
        Self { locale, entries }
    }

    /// JSON テキストから翻訳テーブルを作成する
    ///
    /// # Errors
    /// JSON として不正な場合
    pub fn from_json_str(locale: Locale, json_text: &str) -> Result<Self, I18nError> {
        let json: Value = serde_json::from_str(json_text)
            .map_err(|source| I18nError::Parse { locale, source })?;

        Ok(Self::new(locale, flatten_json(&json, KEY_SEPARATOR, None)))
    }

    #[must_use]
    pub const fn locale(&self) -> Locale {
        self.locale
    }

    /// キーに対応する文字列を取得する
    ///
    /// 存在しないキーは空文字ではなくエラーとして扱う。
    ///
    /// # Errors
    /// キーがテーブルに存在しない場合
    pub fn get(&self, key: &str) -> Result<&str, I18nError> {
        self.entries
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| I18nError::MissingKey { key: key.to_string(), locale: self.locale })
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Flatten nested JSON object into dot-separated key map.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use school_site::i18n::flatten_json;
///
/// let json = json!({
///     "contact": {
///         "title": "Contact Us",
///         "form": { "send": "Send Message" }
///     }
/// });
///
/// let flattened = flatten_json(&json, ".", None);
/// assert_eq!(flattened.get("contact.title"), Some(&"Contact Us".to_string()));
/// assert_eq!(flattened.get("contact.form.send"), Some(&"Send Message".to_string()));
/// ```
#[must_use]
pub fn flatten_json(
    json: &Value,
    separator: &str,
    prefix: Option<&str>,
) -> HashMap<String, String> {
    let mut result = HashMap::new();
    flatten_json_value(json, separator, prefix, &mut result);
    result
}

/// `flatten_json` の再帰部分
fn flatten_json_value(
    json: &Value,
    separator: &str,
    prefix: Option<&str>,
    result: &mut HashMap<String, String>,
) {
    match json {
        Value::Object(map) => {
            for (key, value) in map {
                let full_key =
                    prefix.map_or_else(|| key.clone(), |p| format!("{p}{separator}{key}"));
                flatten_json_value(value, separator, Some(&full_key), result);
            }
        }
        Value::Array(arr) => {
            for (index, value) in arr.iter().enumerate() {
                let full_key =
                    prefix.map_or_else(|| format!("[{index}]"), |p| format!("{p}[{index}]"));
                flatten_json_value(value, separator, Some(&full_key), result);
            }
        }
        Value::String(s) => {
            if let Some(key) = prefix {
                result.insert(key.to_string(), s.clone());
            }
        }
        _ => {
            if let Some(key) = prefix {
                result.insert(key.to_string(), json.to_string());
            }
        }
    }
}
