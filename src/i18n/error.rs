use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use super::Locale;

/// 翻訳キーの欠落（どのロケールのどのキーか）
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MissingTranslation {
    pub key: String,
    pub locale: Locale,
}

impl fmt::Display for MissingTranslation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is missing in '{}'", self.key, self.locale)
    }
}

/// Errors raised while loading or reading translations.
///
/// All of these are integration errors, never user-facing conditions.
#[derive(Error, Debug)]
pub enum I18nError {
    #[error("Unknown locale '{0}'")]
    UnknownLocale(String),

    #[error("Translation key '{key}' not found for locale '{locale}'")]
    MissingKey { key: String, locale: Locale },

    #[error("No translation table for locale '{0}'")]
    MissingLocale(Locale),

    #[error("Translation table for locale '{0}' was given more than once")]
    DuplicateLocale(Locale),

    #[error("Translation tables are out of sync:\n{}", format_missing(.0))]
    Parity(Vec<MissingTranslation>),

    #[error("Failed to parse translations for '{locale}': {source}")]
    Parse {
        locale: Locale,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read translation file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Locale store has been dropped")]
    StoreClosed,
}

/// 欠落キーを番号付きの一覧に整形する
fn format_missing(missing: &[MissingTranslation]) -> String {
    missing
        .iter()
        .enumerate()
        .map(|(i, entry)| format!("  {}. {entry}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}
