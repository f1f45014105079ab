//! テスト用ユーティリティ関数
//!
//! 複数のテストモジュールで使用される共通のヘルパーとフェイクを提供します。
#![cfg(test)]
#![allow(clippy::unwrap_used)]

use std::sync::{
    Arc,
    Mutex,
};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::contact::{
    ContactFormController,
    ContactMessage,
    DeliveryEndpoint,
    DeliveryError,
    Field,
    FieldValues,
    FormTimings,
};
use crate::i18n::{
    Catalog,
    Locale,
    LocaleStore,
};
use crate::relay::{
    MailError,
    Mailer,
    OutgoingMail,
};

/// 全項目が有効な入力値
pub(crate) fn valid_values() -> FieldValues {
    FieldValues {
        name: "Jo".to_string(),
        email: "jo@x.com".to_string(),
        phone: "+258821234567".to_string(),
        message: "Hello there, looking forward to enrolling".to_string(),
    }
}

/// 組み込みカタログを使うロケールストア
pub(crate) fn locale_store(initial: Locale) -> LocaleStore {
    LocaleStore::new(Catalog::embedded().unwrap(), initial)
}

/// 既定のタイマー設定でコントローラーを作成する
pub(crate) fn controller_with(
    endpoint: Arc<dyn DeliveryEndpoint>,
    store: &LocaleStore,
) -> ContactFormController {
    ContactFormController::new(endpoint, store.reader(), FormTimings::default())
}

/// 全項目を入力する
pub(crate) async fn fill(form: &ContactFormController, values: &FieldValues) {
    for field in Field::ALL {
        form.on_field_change(field, values.get(field)).await;
    }
}

/// 受け取った内容を記録する送信先
#[derive(Debug)]
pub(crate) struct RecordingEndpoint {
    /// 受け取った内容
    sent: Mutex<Vec<ContactMessage>>,
    /// 失敗を返すかどうか
    fail: bool,
    /// 指定されていれば `release` まで応答を保留する
    gate: Option<Notify>,
    /// 要求を受け取ったことの通知
    requested: Notify,
}

impl RecordingEndpoint {
    /// 応答の種類を指定して作成する
    fn with(fail: bool, gated: bool) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail,
            gate: gated.then(Notify::new),
            requested: Notify::new(),
        }
    }

    pub(crate) fn succeeding() -> Self {
        Self::with(false, false)
    }

    pub(crate) fn failing() -> Self {
        Self::with(true, false)
    }

    pub(crate) fn gated_succeeding() -> Self {
        Self::with(false, true)
    }

    pub(crate) fn sent(&self) -> Vec<ContactMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// 要求が届くまで待つ
    pub(crate) async fn wait_for_request(&self) {
        self.requested.notified().await;
    }

    /// 保留中の応答を返させる
    pub(crate) fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }
}

#[async_trait]
impl DeliveryEndpoint for RecordingEndpoint {
    async fn deliver(&self, message: &ContactMessage) -> Result<(), DeliveryError> {
        self.sent.lock().unwrap().push(message.clone());
        self.requested.notify_one();

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        if self.fail {
            Err(DeliveryError::Rejected { status: 500, detail: "relay unavailable".to_string() })
        } else {
            Ok(())
        }
    }
}

/// 送信したメールを記録する `Mailer`
#[derive(Debug, Default)]
pub(crate) struct RecordingMailer {
    /// 送信したメール
    sent: Mutex<Vec<OutgoingMail>>,
    /// 失敗を返すかどうか
    fail: bool,
}

impl RecordingMailer {
    pub(crate) fn failing() -> Self {
        Self { sent: Mutex::default(), fail: true }
    }

    pub(crate) fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(mail.clone());
        if self.fail { Err(MailError::Send("connection refused".to_string())) } else { Ok(()) }
    }
}
