//! サイト設定（`.school-site.json`）
mod loader;
mod manager;
mod types;

pub use loader::CONFIG_FILE_NAME;
pub use manager::ConfigManager;
pub use types::{
    ConfigError,
    ContactSettings,
    ServerSettings,
    SiteSettings,
    SmtpSettings,
    ValidationError,
};
