//! `POST /api/contact`

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{
    IntoResponse,
    Response,
};
use axum::routing::post;
use axum::{
    Json,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::{
    CONFIGURATION_ERROR,
    INVALID_FIELDS_ERROR,
    MISSING_FIELDS_ERROR,
    Mailer,
    OutgoingMail,
    SEND_FAILURE_ERROR,
    SENT_MESSAGE,
};
use crate::contact::{
    ContactMessage,
    FieldValues,
};

/// 問い合わせの受付パス
pub const CONTACT_PATH: &str = "/api/contact";

/// ハンドラーが共有する状態
#[derive(Clone)]
pub struct RelayState {
    /// 認証情報が無い場合は `None`（未設定として 500 を返す）
    mailer: Option<Arc<dyn Mailer>>,
    /// メールのフッターに出すサイト名
    site_name: Arc<str>,
}

impl std::fmt::Debug for RelayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayState")
            .field("mailer", &self.mailer.as_ref().map(|_| "<dyn Mailer>"))
            .field("site_name", &self.site_name)
            .finish()
    }
}

impl RelayState {
    #[must_use]
    pub fn new(mailer: Option<Arc<dyn Mailer>>, site_name: &str) -> Self {
        Self { mailer, site_name: Arc::from(site_name) }
    }

    #[must_use]
    pub fn is_provisioned(&self) -> bool {
        self.mailer.is_some()
    }
}

/// 受信するリクエストボディ（欠けた項目も受け付けて自前で検査する）
#[derive(Debug, Default, Deserialize)]
pub struct ContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
}

impl ContactRequest {
    /// 全項目が空でなければ入力値に変換する
    fn into_values(self) -> Option<FieldValues> {
        let present = |value: Option<String>| value.filter(|v| !v.is_empty());
        Some(FieldValues {
            name: present(self.name)?,
            email: present(self.email)?,
            phone: present(self.phone)?,
            message: present(self.message)?,
        })
    }
}

/// 中継サーバーのルーター
#[must_use]
pub fn router(state: RelayState) -> Router {
    Router::new().route(CONTACT_PATH, post(submit_contact)).with_state(state)
}

/// 問い合わせを検査してメールで中継する
async fn submit_contact(
    State(state): State<RelayState>,
    body: Result<Json<ContactRequest>, JsonRejection>,
) -> Response {
    let Some(mailer) = state.mailer.as_ref() else {
        tracing::error!("Missing email configuration");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, CONFIGURATION_ERROR);
    };

    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => {
            // パーサーの詳細は応答に含めない
            tracing::warn!("Rejected contact request body: {rejection}");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, SEND_FAILURE_ERROR);
        }
    };

    let Some(values) = request.into_values() else {
        return error_response(StatusCode::BAD_REQUEST, MISSING_FIELDS_ERROR);
    };

    let message = match ContactMessage::try_from(&values) {
        Ok(message) => message,
        Err(errors) => {
            tracing::debug!("Rejected invalid contact fields: {:?}", errors);
            return error_response(StatusCode::BAD_REQUEST, INVALID_FIELDS_ERROR);
        }
    };

    let mail = OutgoingMail::compose(&message, &state.site_name);
    match mailer.send(&mail).await {
        Ok(()) => {
            tracing::info!("Relayed contact message from '{}'", message.name());
            (StatusCode::OK, Json(json!({ "message": SENT_MESSAGE }))).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to send contact mail: {e}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, SEND_FAILURE_ERROR)
        }
    }
}

/// `{"error": "..."}` 形式の応答
fn error_response(status: StatusCode, error: &str) -> Response {
    (status, Json(json!({ "error": error }))).into_response()
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    fn request(name: Option<&str>, message: Option<&str>) -> ContactRequest {
        ContactRequest {
            name: name.map(ToString::to_string),
            email: Some("jo@x.com".to_string()),
            phone: Some("+258821234567".to_string()),
            message: message.map(ToString::to_string),
        }
    }

    #[googletest::test]
    fn into_values_keeps_every_field() {
        let values = request(Some("Jo"), Some("Hello there")).into_values();

        expect_that!(
            values,
            some(all![
                field!(FieldValues.name, eq("Jo")),
                field!(FieldValues.email, eq("jo@x.com")),
                field!(FieldValues.message, eq("Hello there"))
            ])
        );
    }

    #[rstest]
    #[case::missing_name(None, Some("Hello there"))]
    #[case::empty_name(Some(""), Some("Hello there"))]
    #[case::missing_message(Some("Jo"), None)]
    fn into_values_rejects_absent_fields(
        #[case] name: Option<&str>,
        #[case] message: Option<&str>,
    ) {
        assert!(request(name, message).into_values().is_none());
    }

    #[rstest]
    fn state_reports_provisioning() {
        assert!(!RelayState::new(None, "Nexus | JR").is_provisioned());
    }
}
