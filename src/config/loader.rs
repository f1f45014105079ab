//! 設定ファイルの読み込み関数

use std::path::Path;

use super::{
    ConfigError,
    SiteSettings,
};

/// 設定ファイル名
pub const CONFIG_FILE_NAME: &str = ".school-site.json";

/// サイトのルートから設定を読み込む
///
/// `.school-site.json` ファイルを探して読み込む
///
/// # Returns
/// - `Ok(Some(settings))`: 設定ファイルが見つかり、読み込みに成功
/// - `Ok(None)`: 設定ファイルが見つからない
///
/// # Errors
/// - ファイル読み込みエラー
/// - JSON パースエラー
pub(super) fn load_from_site_root(site_root: &Path) -> Result<Option<SiteSettings>, ConfigError> {
    let config_path = site_root.join(CONFIG_FILE_NAME);

    if !config_path.exists() {
        tracing::debug!("Configuration file not found: {:?}", config_path);
        return Ok(None);
    }

    tracing::debug!("Loading configuration from: {:?}", config_path);

    let content = std::fs::read_to_string(&config_path)?;
    let mut settings: SiteSettings = serde_json::from_str(&content)?;

    // 相対パスは設定ファイルの場所を基準にする
    if let Some(dir) = settings.locales_dir.as_mut()
        && dir.is_relative()
        && !dir.as_os_str().is_empty()
    {
        *dir = site_root.join(&*dir);
    }

    Ok(Some(settings))
}
