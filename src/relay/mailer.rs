//! メール送信（SMTP）

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{
    AsyncSmtpTransport,
    AsyncTransport,
    Message,
    Tokio1Executor,
};
use thiserror::Error;

use super::OutgoingMail;
use crate::config::SmtpSettings;

/// SMTP アカウントのユーザー名を持つ環境変数
pub const SMTP_USER_VAR: &str = "GMAIL_USER";
/// SMTP アカウントのアプリパスワードを持つ環境変数
pub const SMTP_PASSWORD_VAR: &str = "GMAIL_APP_PASSWORD";

#[derive(Error, Debug)]
pub enum MailError {
    #[error("Invalid mail address '{address}': {reason}")]
    Address { address: String, reason: String },

    #[error("Failed to build mail: {0}")]
    Build(String),

    #[error("Failed to send mail: {0}")]
    Send(String),
}

/// メールを送信する外部の協力者
#[async_trait]
pub trait Mailer: Send + Sync {
    /// # Errors
    /// アドレス不正、メール組み立て失敗、送信失敗
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError>;
}

/// SMTP の認証情報
#[derive(Clone, PartialEq, Eq)]
pub struct SmtpCredentials {
    /// アカウントのアドレス（送信元・宛先を兼ねる）
    pub user: String,
    /// パスワード
    pub password: String,
}

impl std::fmt::Debug for SmtpCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpCredentials")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl SmtpCredentials {
    /// 環境変数から読み込む
    ///
    /// どちらかが未設定（または空）なら `None`。
    #[must_use]
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 任意の参照関数から読み込む
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let user = lookup(SMTP_USER_VAR).filter(|v| !v.is_empty())?;
        let password = lookup(SMTP_PASSWORD_VAR).filter(|v| !v.is_empty())?;
        Some(Self { user, password })
    }
}

/// SMTP リレー経由で送信する `Mailer`
///
/// 送信元・宛先はどちらも認証に使うアカウント。返信先が問い合わせた人になる。
pub struct SmtpMailer {
    /// 接続プール付きのトランスポート
    transport: AsyncSmtpTransport<Tokio1Executor>,
    /// 認証に使うアカウント
    account: Mailbox,
}

impl std::fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailer").field("account", &self.account.to_string()).finish()
    }
}

impl SmtpMailer {
    /// 暗黙的 TLS で接続するトランスポートを作成する（接続自体は送信時）
    ///
    /// # Errors
    /// - アカウントのアドレスが不正
    /// - TLS 設定の作成に失敗
    pub fn new(settings: &SmtpSettings, credentials: SmtpCredentials) -> Result<Self, MailError> {
        let account = parse_mailbox(&credentials.user)?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
            .map_err(|e| MailError::Build(e.to_string()))?
            .port(settings.port)
            .credentials(Credentials::new(credentials.user, credentials.password))
            .build();

        tracing::debug!("SMTP relay configured for {}:{}", settings.host, settings.port);
        Ok(Self { transport, account })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        let from = Mailbox::new(Some(mail.sender_name.clone()), self.account.email.clone());
        let reply_to = parse_mailbox(&mail.reply_to)?;

        let message = Message::builder()
            .from(from)
            .reply_to(reply_to)
            .to(self.account.clone())
            .subject(mail.subject.as_str())
            .header(ContentType::TEXT_HTML)
            .body(mail.html.clone())
            .map_err(|e| MailError::Build(e.to_string()))?;

        self.transport.send(message).await.map_err(|e| MailError::Send(e.to_string()))?;

        Ok(())
    }
}

/// アドレスを `Mailbox` として解釈する
fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .parse()
        .map_err(|e: lettre::address::AddressError| MailError::Address {
            address: address.to_string(),
            reason: e.to_string(),
        })
}
