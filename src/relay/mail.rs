//! 中継するメールの組み立て

use crate::contact::ContactMessage;

/// 送信するメールの内容（送信元・宛先のアカウントは `Mailer` が決める）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    /// 送信元の表示名（問い合わせた人の名前）
    pub sender_name: String,
    /// 返信先（問い合わせた人のメールアドレス）
    pub reply_to: String,
    pub subject: String,
    pub html: String,
}

impl OutgoingMail {
    /// 問い合わせ内容からメールを組み立てる
    ///
    /// 入力値は全て HTML エスケープする。
    #[must_use]
    pub fn compose(message: &ContactMessage, site_name: &str) -> Self {
        let rows = [
            ("Nome", message.name()),
            ("Email", message.email()),
            ("Telefone", message.phone()),
            ("Mensagem", message.message()),
        ];

        let mut html = String::from(
            "<!DOCTYPE html>\n<html>\n<body style=\"font-family: Helvetica, Arial, sans-serif;\">\n\
             <h1 style=\"font-weight: 300;\">Nova Mensagem de Contato</h1>\n",
        );
        for (label, value) in rows {
            html.push_str(&format!(
                "<div style=\"margin-bottom: 20px;\">\
                 <div style=\"font-weight: 600; text-transform: uppercase;\">{label}</div>\
                 <div style=\"white-space: pre-wrap;\">{}</div></div>\n",
                escape_html(value)
            ));
        }
        html.push_str(&format!(
            "<div style=\"text-align: center; color: #6b7280;\">\
             <div>Esta mensagem foi enviada através do formulário de contato do website.</div>\
             <div style=\"font-weight: 600;\">{}</div></div>\n</body>\n</html>\n",
            escape_html(site_name)
        ));

        Self {
            sender_name: message.name().to_string(),
            reply_to: message.email().to_string(),
            subject: format!("Nova Mensagem de Contato - {}", message.name()),
            html,
        }
    }
}

/// HTML の特殊文字をエスケープする
#[must_use]
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
