//! サイトがサポートするロケール

use std::fmt;
use std::str::FromStr;

use serde::{
    Deserialize,
    Serialize,
};

use super::I18nError;

/// 表示言語
///
/// 閉じた集合。新しい言語を追加する場合は `ALL` と翻訳ファイルの両方を更新すること。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// ポルトガル語（既定）
    #[default]
    Pt,
    /// 英語
    En,
}

impl Locale {
    /// サポートする全ロケール
    pub const ALL: [Self; 2] = [Self::Pt, Self::En];

    /// ロケールコード（`pt`, `en`）
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Pt => "pt",
            Self::En => "en",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = I18nError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|locale| locale.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| I18nError::UnknownLocale(s.to_string()))
    }
}
