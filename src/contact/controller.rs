//! 問い合わせフォームのコントローラー
//!
//! 入力値・検証エラー・送信状態を保持し、送信先への 1 回の送信を管理する。
//!
//! # 状態遷移
//!
//! ```text
//! idle ──submit(invalid)──▶ failed
//! idle/failed ──submit(valid)──▶ submitting ──ok──▶ succeeded ──3s──▶ idle
//!                                           └─err─▶ failed
//! ```
//!
//! 全ての状態変更はロックを取ったイベントハンドラー内で完結し、
//! ロックを保持したまま送信先の応答を待つことはない。

use std::sync::{
    Arc,
    Weak,
};
use std::time::Duration;

use tokio::sync::Mutex;

use super::{
    ContactMessage,
    DeliveryEndpoint,
    DeliveryError,
    Field,
    FormState,
    HttpDeliveryEndpoint,
    MESSAGE_MAX_LENGTH,
    Notification,
    NotificationKind,
    SubmissionStatus,
    TimerHandle,
    text_length,
    validate,
};
use crate::config::ContactSettings;
use crate::i18n::{
    I18nError,
    LocaleReader,
};

/// フォームのタイマー設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormTimings {
    /// 送信成功後に `idle` へ戻るまでの時間
    pub reset_delay: Duration,
    /// 通知が自動で閉じるまでの時間
    pub notification_timeout: Duration,
}

impl Default for FormTimings {
    fn default() -> Self {
        Self { reset_delay: Duration::from_secs(3), notification_timeout: Duration::from_secs(5) }
    }
}

/// ロックで保護されるフォームの内部状態
#[derive(Debug, Default)]
struct FormInner {
    /// 入力値・エラー・送信状態
    state: FormState,
    /// 表示中の通知
    notification: Option<Notification>,
    /// 通知の自動クローズ
    notification_timer: Option<TimerHandle>,
    /// 送信成功後の自動リセット
    reset_timer: Option<TimerHandle>,
    /// 送信の世代番号
    submission: u64,
    /// 通知の世代番号
    notification_seq: u64,
    /// 破棄済み（以降の応答やタイマーは無視する）
    torn_down: bool,
}

impl FormInner {
    /// 全項目を検証してエラーを置き換え、成功すれば送信内容を返す
    fn revalidate(&mut self) -> Option<ContactMessage> {
        match ContactMessage::try_from(&self.state.values) {
            Ok(message) => {
                self.state.errors.clear();
                Some(message)
            }
            Err(errors) => {
                self.state.errors = errors.into_iter().collect();
                None
            }
        }
    }
}

/// 問い合わせフォームのコントローラー
///
/// `Arc` で共有すれば、送信の応答待ちの間も別のタスクから入力を続けられる。
pub struct ContactFormController {
    /// タイマーとは `Weak` で共有する
    inner: Arc<Mutex<FormInner>>,
    /// 送信先
    endpoint: Arc<dyn DeliveryEndpoint>,
    /// 表示用の翻訳の参照
    locale: LocaleReader,
    /// タイマー設定
    timings: FormTimings,
}

impl std::fmt::Debug for ContactFormController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContactFormController")
            .field("inner", &"<FormInner>")
            .field("endpoint", &"<dyn DeliveryEndpoint>")
            .field("locale", &self.locale.current_locale())
            .field("timings", &self.timings)
            .finish()
    }
}

impl ContactFormController {
    /// 空のフォームを作成する（マウント時）
    #[must_use]
    pub fn new(
        endpoint: Arc<dyn DeliveryEndpoint>,
        locale: LocaleReader,
        timings: FormTimings,
    ) -> Self {
        Self { inner: Arc::new(Mutex::new(FormInner::default())), endpoint, locale, timings }
    }

    /// 設定された URL へ HTTP で送信するフォームを作成する
    ///
    /// # Errors
    /// HTTP クライアントの作成に失敗した場合
    pub fn from_settings(
        settings: &ContactSettings,
        locale: LocaleReader,
    ) -> Result<Self, DeliveryError> {
        let endpoint = HttpDeliveryEndpoint::from_settings(settings)?;
        Ok(Self::new(Arc::new(endpoint), locale, settings.timings()))
    }

    #[must_use]
    pub const fn locale(&self) -> &LocaleReader {
        &self.locale
    }

    #[must_use]
    pub const fn timings(&self) -> FormTimings {
        self.timings
    }

    /// 現在のロケールでの項目のラベル
    ///
    /// # Errors
    /// 翻訳キーが存在しない場合
    pub fn field_label(&self, field: Field) -> Result<&str, I18nError> {
        self.locale.text(&field.label_key())
    }

    /// 現在のロケールでの項目のプレースホルダー
    ///
    /// # Errors
    /// 翻訳キーが存在しない場合
    pub fn field_placeholder(&self, field: Field) -> Result<&str, I18nError> {
        self.locale.text(&field.placeholder_key())
    }

    /// 入力値を更新し、その項目だけを即座に再検証する
    pub async fn on_field_change(&self, field: Field, value: impl Into<String>) {
        let value = value.into();
        let error = validate(field, &value);

        let mut inner = self.inner.lock().await;
        if inner.torn_down {
            return;
        }
        inner.state.apply_field(field, value, error);
    }

    /// 全項目を再検証してエラーを置き換える
    ///
    /// 全項目が有効なら `true`。
    pub async fn validate_all(&self) -> bool {
        self.inner.lock().await.revalidate().is_some()
    }

    /// フォームを送信する
    ///
    /// - 送信中・送信成功直後は何もしない（ボタン無効）
    /// - 検証エラーがあれば送信先に接続せず `failed`
    /// - 成功すれば入力をクリアして `succeeded`、一定時間後に `idle`
    /// - 失敗すれば入力を残したまま `failed`
    ///
    /// 送信は 1 回だけ試み、自動で再試行はしない。戻り値は処理後の状態。
    pub async fn submit(&self) -> SubmissionStatus {
        let (message, submission) = {
            let mut inner = self.inner.lock().await;
            if inner.torn_down || !inner.state.status.can_submit() {
                tracing::debug!("Ignoring submit while {:?}", inner.state.status);
                return inner.state.status;
            }

            let Some(message) = inner.revalidate() else {
                tracing::debug!("Contact form has invalid fields: {:?}", inner.state.errors);
                inner.state.status = SubmissionStatus::Failed;
                self.show_notification(&mut inner, Notification::CORRECT_ERRORS);
                return SubmissionStatus::Failed;
            };

            inner.reset_timer = None;
            inner.submission += 1;
            inner.state.status = SubmissionStatus::Submitting;
            (message, inner.submission)
        };

        tracing::info!("Submitting contact message from '{}'", message.name());
        let result = self.endpoint.deliver(&message).await;

        let mut inner = self.inner.lock().await;
        if inner.torn_down || inner.submission != submission {
            tracing::debug!("Discarding delivery result of a stale submission");
            return inner.state.status;
        }

        match result {
            Ok(()) => {
                tracing::info!("Contact message delivered");
                inner.state.clear_fields();
                inner.state.status = SubmissionStatus::Succeeded;
                self.show_notification(&mut inner, Notification::SENT);
                self.schedule_reset(&mut inner, submission);
            }
            Err(error) => {
                // 詳細はログにのみ残し、利用者には汎用の失敗メッセージを出す
                tracing::warn!("Contact message delivery failed: {error}");
                inner.state.status = SubmissionStatus::Failed;
                self.show_notification(&mut inner, Notification::SEND_FAILED);
            }
        }

        inner.state.status
    }

    /// 通知を閉じる（自動クローズのタイマーも止める）
    pub async fn dismiss_notification(&self) {
        let mut inner = self.inner.lock().await;
        inner.notification = None;
        inner.notification_timer = None;
    }

    /// フォームを破棄する
    ///
    /// タイマーを全て止め、応答待ちの送信結果は以後反映しない。
    pub async fn teardown(&self) {
        let mut inner = self.inner.lock().await;
        inner.torn_down = true;
        inner.notification = None;
        inner.notification_timer = None;
        inner.reset_timer = None;
        tracing::debug!("Contact form torn down");
    }

    /// 現在の状態のスナップショット
    pub async fn state(&self) -> FormState {
        self.inner.lock().await.state.clone()
    }

    pub async fn status(&self) -> SubmissionStatus {
        self.inner.lock().await.state.status
    }

    pub async fn notification(&self) -> Option<Notification> {
        self.inner.lock().await.notification
    }

    pub async fn can_submit(&self) -> bool {
        let inner = self.inner.lock().await;
        !inner.torn_down && inner.state.status.can_submit()
    }

    /// 現在のロケールでの項目のエラーメッセージ
    ///
    /// # Errors
    /// 翻訳キーが存在しない場合
    pub async fn error_message(&self, field: Field) -> Result<Option<String>, I18nError> {
        let error = self.inner.lock().await.state.error(field);
        error.map(|error| error.message(field, self.locale.translations())).transpose()
    }

    /// 現在のロケールでの通知の種類と文言
    ///
    /// # Errors
    /// 翻訳キーが存在しない場合
    pub async fn notification_message(
        &self,
    ) -> Result<Option<(NotificationKind, String)>, I18nError> {
        let Some(notification) = self.notification().await else {
            return Ok(None);
        };
        let text = notification.message(self.locale.translations())?;
        Ok(Some((notification.kind, text.to_string())))
    }

    /// 現在のロケールでの送信ボタンのラベル
    ///
    /// # Errors
    /// 翻訳キーが存在しない場合
    pub async fn submit_label(&self) -> Result<String, I18nError> {
        let key = self.status().await.submit_label_key();
        self.locale.text(key).map(ToString::to_string)
    }

    /// メッセージ欄の文字数と上限
    pub async fn message_length(&self) -> (usize, usize) {
        let length = text_length(&self.inner.lock().await.state.values.message);
        (length, MESSAGE_MAX_LENGTH)
    }

    /// 通知を表示し、自動クローズを予約する（前の通知とタイマーは置き換える）
    fn show_notification(&self, inner: &mut FormInner, notification: Notification) {
        inner.notification_seq += 1;
        let seq = inner.notification_seq;
        inner.notification = Some(notification);

        let weak = self.weak_inner();
        inner.notification_timer =
            Some(TimerHandle::schedule(self.timings.notification_timeout, async move {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                let mut inner = inner.lock().await;
                if inner.notification_seq == seq {
                    inner.notification = None;
                }
            }));
    }

    /// 送信成功後に `idle` へ戻すタイマーを予約する
    fn schedule_reset(&self, inner: &mut FormInner, submission: u64) {
        let weak = self.weak_inner();
        inner.reset_timer = Some(TimerHandle::schedule(self.timings.reset_delay, async move {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let mut inner = inner.lock().await;
            if inner.submission == submission && inner.state.status == SubmissionStatus::Succeeded
            {
                inner.state.status = SubmissionStatus::Idle;
                tracing::debug!("Contact form reset to idle");
            }
        }));
    }

    /// タイマーに渡す弱参照
    fn weak_inner(&self) -> Weak<Mutex<FormInner>> {
        Arc::downgrade(&self.inner)
    }
}
