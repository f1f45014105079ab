//! 入力項目ごとの検証ルール
//!
//! 検証は純粋関数で、描画やフォームの状態には依存しない。
//! エラーメッセージそのものではなく `FieldError` を返し、表示時に現在のロケールで翻訳する。

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use super::Field;
use crate::i18n::{
    I18nError,
    TranslationTable,
};

/// メッセージ本文の最小長（UTF-16 コード単位）
pub const MESSAGE_MIN_LENGTH: usize = 10;
/// メッセージ本文の最大長（UTF-16 コード単位）
pub const MESSAGE_MAX_LENGTH: usize = 500;

/// 2〜50 文字の英字と空白
static NAME_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| compile("name", r"^[a-zA-Z\s]{2,50}$"));
/// `local@domain.tld` 形式
static EMAIL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| compile("email", r"^[^\s@]+@[^\s@]+\.[^\s@]+$"));
/// 先頭の `+` は任意、数字・空白・ハイフンが 9〜20 文字
static PHONE_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| compile("phone", r"^\+?[0-9\s-]{9,20}$"));

/// パターンをコンパイルする（失敗時はログに残して `None`）
fn compile(name: &str, pattern: &str) -> Option<Regex> {
    Regex::new(pattern)
        .map_err(|e| tracing::error!("Failed to compile {} pattern: {e}", name))
        .ok()
}

/// 入力項目の検証エラー
///
/// 1 項目につき高々 1 つ。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldError {
    /// 未入力
    Required,
    /// 書式違反（name, email, phone）
    Pattern,
    /// 短すぎる（message）
    MinLength,
    /// 長すぎる（message）
    MaxLength,
}

impl FieldError {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Pattern => "pattern",
            Self::MinLength => "minLength",
            Self::MaxLength => "maxLength",
        }
    }

    /// エラーメッセージの翻訳キー（例: `contact.errors.name.required`）
    #[must_use]
    pub fn message_key(self, field: Field) -> String {
        format!("contact.errors.{}.{}", field.as_str(), self.as_str())
    }

    /// 翻訳済みのエラーメッセージ
    ///
    /// # Errors
    /// テーブルにキーが存在しない場合
    pub fn message(self, field: Field, table: &TranslationTable) -> Result<String, I18nError> {
        table.get(&self.message_key(field)).map(ToString::to_string)
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 1 項目を検証する
///
/// 空文字は全項目で `Required`。message は文字数のみ、その他は書式を検査する。
#[must_use]
pub fn validate(field: Field, value: &str) -> Option<FieldError> {
    if value.is_empty() {
        return Some(FieldError::Required);
    }

    let pattern = match field {
        Field::Message => return validate_message_length(value),
        Field::Name => NAME_PATTERN.as_ref(),
        Field::Email => EMAIL_PATTERN.as_ref(),
        Field::Phone => PHONE_PATTERN.as_ref(),
    };

    if pattern.is_some_and(|re| re.is_match(value)) {
        None
    } else {
        Some(FieldError::Pattern)
    }
}

/// 入力欄の文字数
///
/// ブラウザの `maxlength` と同じく UTF-16 コード単位で数える（絵文字は 2）。
#[must_use]
pub fn text_length(value: &str) -> usize {
    value.encode_utf16().count()
}

/// 本文の文字数を検査する
fn validate_message_length(value: &str) -> Option<FieldError> {
    let length = text_length(value);
    if length < MESSAGE_MIN_LENGTH {
        Some(FieldError::MinLength)
    } else if length > MESSAGE_MAX_LENGTH {
        Some(FieldError::MaxLength)
    } else {
        None
    }
}
