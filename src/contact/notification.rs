//! 一時的な通知（送信結果など）

use crate::i18n::{
    I18nError,
    TranslationTable,
};

/// 通知の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    Success,
    Error,
}

/// 画面上部に表示される通知
///
/// 文言は翻訳キーで保持し、表示時に現在のロケールで解決する。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message_key: &'static str,
}

impl Notification {
    /// フォームに検証エラーが残ったまま送信した
    pub const CORRECT_ERRORS: Self =
        Self { kind: NotificationKind::Error, message_key: "contact.notifications.correctErrors" };
    /// 送信成功
    pub const SENT: Self =
        Self { kind: NotificationKind::Success, message_key: "contact.notifications.success" };
    /// 送信失敗（原因の詳細は表示しない）
    pub const SEND_FAILED: Self =
        Self { kind: NotificationKind::Error, message_key: "contact.notifications.failure" };

    /// # Errors
    /// テーブルにキーが存在しない場合
    pub fn message<'a>(&self, table: &'a TranslationTable) -> Result<&'a str, I18nError> {
        table.get(self.message_key)
    }
}
