//! 問い合わせ内容をメールで中継するサーバー側の送信先
//!
//! 応答ボディは成功時 `{"message": ...}`、失敗時 `{"error": ...}`。

mod mail;
mod mailer;
mod routes;

pub use mail::{
    OutgoingMail,
    escape_html,
};
pub use mailer::{
    MailError,
    Mailer,
    SMTP_PASSWORD_VAR,
    SMTP_USER_VAR,
    SmtpCredentials,
    SmtpMailer,
};
pub use routes::{
    CONTACT_PATH,
    ContactRequest,
    RelayState,
    router,
};

/// SMTP の認証情報が無い
pub const CONFIGURATION_ERROR: &str = "Server configuration error";
/// 空または欠けた項目がある
pub const MISSING_FIELDS_ERROR: &str = "All fields are required";
/// 項目が入力規則を満たさない
pub const INVALID_FIELDS_ERROR: &str = "Invalid contact fields";
/// メール送信に失敗した
pub const SEND_FAILURE_ERROR: &str = "Falha ao enviar email. Por favor, tente novamente.";
/// メール送信に成功した
pub const SENT_MESSAGE: &str = "Email enviado com sucesso!";
