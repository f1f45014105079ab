//! Entry point for the contact relay server.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use school_site::config::ConfigManager;
use school_site::i18n::{
    Catalog,
    LocaleStore,
};
use school_site::relay::{
    self,
    Mailer,
    RelayState,
    SmtpCredentials,
    SmtpMailer,
};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "school_site=info".into()),
        )
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// 設定と翻訳を読み込み、中継サーバーを起動する
async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let site_root = match std::env::args_os().nth(1) {
        Some(arg) => PathBuf::from(arg),
        None => std::env::current_dir()?,
    };

    let mut config_manager = ConfigManager::new();
    config_manager.load_settings(Some(site_root))?;
    let settings = config_manager.get_settings();

    let catalog = match &settings.locales_dir {
        Some(dir) => Catalog::load_from_dir(dir)?,
        None => Catalog::embedded()?,
    };
    let locales = LocaleStore::new(catalog, settings.default_locale);
    tracing::info!(
        "Translations loaded ({} keys per locale), default locale '{}'",
        locales.translations().len(),
        locales.current_locale()
    );

    let mailer: Option<Arc<dyn Mailer>> = match SmtpCredentials::from_env() {
        Some(credentials) => Some(Arc::new(SmtpMailer::new(&settings.smtp, credentials)?)),
        None => {
            tracing::warn!(
                "{} / {} are not set; contact messages will be refused",
                relay::SMTP_USER_VAR,
                relay::SMTP_PASSWORD_VAR
            );
            None
        }
    };
    let app = relay::router(RelayState::new(mailer, &settings.smtp.site_name));

    let listener = TcpListener::bind(&settings.server.bind_address).await?;
    tracing::info!("Contact relay listening on {}", settings.server.bind_address);

    axum::serve(listener, app).await?;
    Ok(())
}
