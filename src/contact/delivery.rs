//! 問い合わせ内容の送信先（外部境界）

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use super::ContactMessage;
use crate::config::ContactSettings;

/// 送信失敗の理由
///
/// コントローラーはどの種類も同じ「送信失敗」として扱う。区別はログのためだけにある。
#[derive(Error, Debug)]
pub enum DeliveryError {
    /// 送信先に到達できなかった
    #[error("Failed to reach delivery endpoint: {0}")]
    Transport(String),

    /// 送信先がメール送信の設定を持っていない
    #[error("Delivery endpoint is not configured: {0}")]
    Configuration(String),

    /// 送信先が入力を拒否した
    #[error("Delivery endpoint rejected the message: {0}")]
    InvalidRequest(String),

    /// その他の失敗応答
    #[error("Delivery endpoint responded with status {status}: {detail}")]
    Rejected { status: u16, detail: String },
}

/// 問い合わせ内容を受け取り、配送を試みる外部の協力者
#[async_trait]
pub trait DeliveryEndpoint: Send + Sync {
    /// 1 回だけ送信を試みる（再試行はしない）
    async fn deliver(&self, message: &ContactMessage) -> Result<(), DeliveryError>;
}

/// エラー応答のボディ（`{"error": "..."}`）
#[derive(Debug, Deserialize)]
struct ErrorBody {
    /// エラーメッセージ
    error: String,
}

/// 中継サーバーの `POST /api/contact` へ JSON で送る実装
#[derive(Debug, Clone)]
pub struct HttpDeliveryEndpoint {
    /// HTTP クライアント（タイムアウト設定済み）
    http: Client,
    /// `POST` 先の URL
    url: String,
}

impl HttpDeliveryEndpoint {
    /// # Errors
    /// HTTP クライアントの作成に失敗した場合
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, DeliveryError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DeliveryError::Transport(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { http, url: url.into() })
    }

    /// `contact.endpointUrl` と `contact.requestTimeoutSecs` から作成する
    ///
    /// # Errors
    /// HTTP クライアントの作成に失敗した場合
    pub fn from_settings(settings: &ContactSettings) -> Result<Self, DeliveryError> {
        Self::new(settings.endpoint_url.as_str(), settings.request_timeout())
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl DeliveryEndpoint for HttpDeliveryEndpoint {
    async fn deliver(&self, message: &ContactMessage) -> Result<(), DeliveryError> {
        tracing::debug!("Posting contact message to {}", self.url);

        let response = self
            .http
            .post(&self.url)
            .json(message)
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or_else(|_| body.chars().take(200).collect());

        Err(classify_failure(status.as_u16(), detail))
    }
}

/// 失敗応答を `DeliveryError` に分類する
fn classify_failure(status: u16, detail: String) -> DeliveryError {
    match status {
        400 => DeliveryError::InvalidRequest(detail),
        500 if detail == crate::relay::CONFIGURATION_ERROR => DeliveryError::Configuration(detail),
        _ => DeliveryError::Rejected { status, detail },
    }
}
