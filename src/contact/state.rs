//! Form state: field values, per-field errors and submission status

use std::collections::BTreeMap;

use serde::{
    Deserialize,
    Serialize,
};

use super::{
    Field,
    FieldError,
};

/// 4 項目の入力値
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValues {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

impl FieldValues {
    #[must_use]
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::Message => &self.message,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Phone => &mut self.phone,
            Field::Message => &mut self.message,
        };
        *slot = value.into();
    }

    /// 全項目が初期値（空）かどうか
    #[must_use]
    pub fn is_empty(&self) -> bool {
        Field::ALL.into_iter().all(|field| self.get(field).is_empty())
    }
}

/// 送信状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

impl SubmissionStatus {
    /// 送信ボタンを押せるかどうか
    ///
    /// 送信中と送信成功直後は二重送信を防ぐため無効。
    #[must_use]
    pub const fn can_submit(self) -> bool {
        !matches!(self, Self::Submitting | Self::Succeeded)
    }

    /// 送信ボタンのラベルの翻訳キー
    #[must_use]
    pub const fn submit_label_key(self) -> &'static str {
        match self {
            Self::Idle | Self::Failed => "contact.form.send",
            Self::Submitting => "contact.form.sending",
            Self::Succeeded => "contact.form.sent",
        }
    }
}

/// フォームのある時点の状態
///
/// `errors` に項目が無ければその項目は有効（または未入力のまま触れていない）。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub values: FieldValues,
    pub errors: BTreeMap<Field, FieldError>,
    pub status: SubmissionStatus,
}

impl FormState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn error(&self, field: Field) -> Option<FieldError> {
        self.errors.get(&field).copied()
    }

    /// 1 項目の値と検証結果を更新する
    pub(crate) fn apply_field(&mut self, field: Field, value: String, error: Option<FieldError>) {
        self.values.set(field, value);
        match error {
            Some(error) => {
                self.errors.insert(field, error);
            }
            None => {
                self.errors.remove(&field);
            }
        }
    }

    /// 入力値とエラーを初期状態に戻す（状態は変えない）
    pub(crate) fn clear_fields(&mut self) {
        self.values = FieldValues::default();
        self.errors.clear();
    }
}
