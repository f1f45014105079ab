//! Validated payload handed to the delivery endpoint

use serde::Serialize;

use super::{
    Field,
    FieldError,
    FieldValues,
    validate,
};

/// 検証済みの問い合わせ内容
///
/// 全項目が検証を通過した場合にのみ作成できる。永続化はせず、1 回の送信の間だけ存在する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactMessage {
    /// 氏名
    name: String,
    /// メールアドレス（返信先）
    email: String,
    /// 電話番号
    phone: String,
    /// 本文
    message: String,
}

impl ContactMessage {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn phone(&self) -> &str {
        &self.phone
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl TryFrom<&FieldValues> for ContactMessage {
    /// 検証に失敗した項目とその理由
    type Error = Vec<(Field, FieldError)>;

    fn try_from(values: &FieldValues) -> Result<Self, Self::Error> {
        let errors: Vec<_> = Field::ALL
            .into_iter()
            .filter_map(|field| validate(field, values.get(field)).map(|error| (field, error)))
            .collect();

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Self {
            name: values.name.clone(),
            email: values.email.clone(),
            phone: values.phone.clone(),
            message: values.message.clone(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;

    use super::*;
    use crate::test_utils::valid_values;

    #[googletest::test]
    fn builds_from_valid_values() {
        let message = ContactMessage::try_from(&valid_values()).unwrap();

        expect_that!(message.name(), eq("Jo"));
        expect_that!(message.email(), eq("jo@x.com"));
        expect_that!(message.phone(), eq("+258821234567"));
        expect_that!(message.message(), eq("Hello there, looking forward to enrolling"));
    }

    #[googletest::test]
    fn reports_every_invalid_field() {
        let values = FieldValues { name: String::new(), phone: "123".to_string(), ..valid_values() };

        let result = ContactMessage::try_from(&values);

        expect_that!(
            result,
            err(elements_are![
                eq(&(Field::Name, FieldError::Required)),
                eq(&(Field::Phone, FieldError::Pattern)),
            ])
        );
    }

    #[googletest::test]
    fn serializes_as_flat_json() {
        let message = ContactMessage::try_from(&valid_values()).unwrap();

        let json = serde_json::to_value(&message).unwrap();

        expect_that!(
            json,
            eq(&serde_json::json!({
                "name": "Jo",
                "email": "jo@x.com",
                "phone": "+258821234567",
                "message": "Hello there, looking forward to enrolling"
            }))
        );
    }
}
