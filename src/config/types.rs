use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::contact::FormTimings;
use crate::i18n::Locale;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "contact.endpointUrl")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// バリデーションエラーを番号付きの一覧に整形する
fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteSettings {
    /// Locale shown before the visitor picks one. Never inferred from the browser.
    pub default_locale: Locale,

    /// Directory holding `<locale>.json` overrides of the embedded tables.
    pub locales_dir: Option<PathBuf>,

    pub contact: ContactSettings,
    pub server: ServerSettings,
    pub smtp: SmtpSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactSettings {
    /// Where the contact form posts its message.
    pub endpoint_url: String,
    /// Delay before a succeeded form returns to idle.
    pub reset_delay_ms: u64,
    /// Lifetime of a notification.
    pub notification_timeout_ms: u64,
    pub request_timeout_secs: u64,
}

impl ContactSettings {
    #[must_use]
    pub const fn timings(&self) -> FormTimings {
        FormTimings {
            reset_delay: Duration::from_millis(self.reset_delay_ms),
            notification_timeout: Duration::from_millis(self.notification_timeout_ms),
        }
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ContactSettings {
    fn default() -> Self {
        Self {
            endpoint_url: "http://127.0.0.1:3000/api/contact".to_string(),
            reset_delay_ms: 3_000,
            notification_timeout_ms: 5_000,
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSettings {
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { bind_address: "127.0.0.1:3000".to_string() }
    }
}

/// SMTP relay settings. Credentials are read from the environment, never from this file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SmtpSettings {
    pub host: String,
    /// Implicit TLS port.
    pub port: u16,
    /// Shown in the footer of relayed mail.
    pub site_name: String,
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self { host: "smtp.gmail.com".to_string(), port: 465, site_name: "Nexus | JR".to_string() }
    }
}

impl SiteSettings {
    /// # Errors
    /// - Required field is empty
    /// - Invalid URL or socket address
    /// - Zero duration or port
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Some(dir) = &self.locales_dir
            && dir.as_os_str().is_empty()
        {
            errors.push(ValidationError::new(
                "localesDir",
                "The directory cannot be empty. Please specify a path, or remove this field",
            ));
        }

        if self.contact.endpoint_url.is_empty() {
            errors.push(ValidationError::new(
                "contact.endpointUrl",
                "The URL cannot be empty. Example: \"https://example.com/api/contact\"",
            ));
        } else {
            match reqwest::Url::parse(&self.contact.endpoint_url) {
                Ok(url) if matches!(url.scheme(), "http" | "https") => {}
                Ok(url) => errors.push(ValidationError::new(
                    "contact.endpointUrl",
                    format!("Unsupported URL scheme '{}'. Use http or https", url.scheme()),
                )),
                Err(e) => errors.push(ValidationError::new(
                    "contact.endpointUrl",
                    format!("Invalid URL '{}': {e}", self.contact.endpoint_url),
                )),
            }
        }

        for (field_path, value) in [
            ("contact.resetDelayMs", self.contact.reset_delay_ms),
            ("contact.notificationTimeoutMs", self.contact.notification_timeout_ms),
            ("contact.requestTimeoutSecs", self.contact.request_timeout_secs),
        ] {
            if value == 0 {
                errors.push(ValidationError::new(field_path, "The duration must be greater than 0"));
            }
        }

        if let Err(e) = self.server.bind_address.parse::<SocketAddr>() {
            errors.push(ValidationError::new(
                "server.bindAddress",
                format!(
                    "Invalid socket address '{}': {e}. Example: \"127.0.0.1:3000\"",
                    self.server.bind_address
                ),
            ));
        }

        if self.smtp.host.is_empty() {
            errors.push(ValidationError::new(
                "smtp.host",
                "The host cannot be empty. Example: \"smtp.gmail.com\"",
            ));
        }

        if self.smtp.port == 0 {
            errors.push(ValidationError::new("smtp.port", "The port must be greater than 0"));
        }

        if self.smtp.site_name.trim().is_empty() {
            errors.push(ValidationError::new("smtp.siteName", "The site name cannot be empty"));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            default_locale: Locale::Pt,
            locales_dir: None,
            contact: ContactSettings::default(),
            server: ServerSettings::default(),
            smtp: SmtpSettings::default(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::expect_used, clippy::panic)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;

    #[rstest]
    fn validate_valid_settings() {
        let settings = SiteSettings::default();

        assert_that!(settings.validate(), ok(anything()));
    }

    #[rstest]
    fn deserialize_partial_settings() {
        let json = r#"{"defaultLocale": "en", "contact": {"resetDelayMs": 1500}}"#;

        let settings: SiteSettings = serde_json::from_str(json).unwrap();

        assert_that!(settings.default_locale, eq(Locale::En));
        assert_that!(settings.contact.reset_delay_ms, eq(1500));
        assert_that!(settings.contact.notification_timeout_ms, eq(5000));
        assert_that!(settings.smtp.port, eq(465));
    }

    #[rstest]
    fn deserialize_empty_settings() {
        let json = "{}";

        let settings: SiteSettings = serde_json::from_str(json).unwrap();

        assert_that!(settings.default_locale, eq(Locale::Pt));
        assert_that!(settings.locales_dir, none());
        assert_that!(settings.server.bind_address, eq("127.0.0.1:3000"));
        assert_that!(settings.smtp.host, eq("smtp.gmail.com"));
        assert_that!(settings.smtp.site_name, eq("Nexus | JR"));
        assert_that!(
            settings.contact.timings(),
            eq(FormTimings {
                reset_delay: Duration::from_secs(3),
                notification_timeout: Duration::from_secs(5),
            })
        );
    }

    #[rstest]
    fn deserialize_unknown_locale_fails() {
        let json = r#"{"defaultLocale": "fr"}"#;

        let result = serde_json::from_str::<SiteSettings>(json);

        assert_that!(result, err(anything()));
    }

    #[rstest]
    fn validate_invalid_endpoint_url_empty() {
        let settings = SiteSettings {
            contact: ContactSettings { endpoint_url: String::new(), ..ContactSettings::default() },
            ..SiteSettings::default()
        };

        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("contact.endpointUrl")),
                field!(ValidationError.message, contains_substring("cannot be empty"))
            ]])
        );
    }

    #[rstest]
    #[case::not_a_url("not a url", "Invalid URL")]
    #[case::mailto("mailto:info@example.com", "Unsupported URL scheme 'mailto'")]
    fn validate_invalid_endpoint_url(#[case] url: &str, #[case] expected: &str) {
        let settings = SiteSettings {
            contact: ContactSettings { endpoint_url: url.to_string(), ..ContactSettings::default() },
            ..SiteSettings::default()
        };

        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("contact.endpointUrl")),
                field!(ValidationError.message, contains_substring(expected))
            ]])
        );
    }

    #[rstest]
    fn validate_zero_durations() {
        let settings = SiteSettings {
            contact: ContactSettings {
                reset_delay_ms: 0,
                request_timeout_secs: 0,
                ..ContactSettings::default()
            },
            ..SiteSettings::default()
        };

        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![
                field!(ValidationError.field_path, eq("contact.resetDelayMs")),
                field!(ValidationError.field_path, eq("contact.requestTimeoutSecs")),
            ])
        );
    }

    #[rstest]
    fn validate_invalid_bind_address() {
        let settings = SiteSettings {
            server: ServerSettings { bind_address: "localhost".to_string() },
            ..SiteSettings::default()
        };

        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("server.bindAddress")),
                field!(ValidationError.message, contains_substring("Invalid socket address"))
            ]])
        );
    }

    #[rstest]
    fn validate_invalid_locales_dir_empty() {
        let settings =
            SiteSettings { locales_dir: Some(PathBuf::new()), ..SiteSettings::default() };

        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![field!(ValidationError.field_path, eq("localesDir"))])
        );
    }

    #[rstest]
    fn config_error_validation_errors_format() {
        let settings = SiteSettings {
            smtp: SmtpSettings { host: String::new(), port: 0, ..SmtpSettings::default() },
            ..SiteSettings::default()
        };

        let validation_result = settings.validate();
        let errors = validation_result.unwrap_err();
        let config_error = ConfigError::ValidationErrors(errors);

        let error_message = format!("{config_error}");
        assert_that!(error_message, contains_substring("Configuration validation failed"));
        assert_that!(error_message, contains_substring("1. smtp.host"));
        assert_that!(error_message, contains_substring("cannot be empty"));
        assert_that!(error_message, contains_substring("2. smtp.port"));
        assert_that!(error_message, contains_substring("greater than 0"));
    }
}
