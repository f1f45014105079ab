//! 現在のロケールを保持するストア
//!
//! 書き込みは `LocaleStore::set_locale` のみ、読み出しは任意個の `LocaleReader` から行う。
//! 読み出しは同期的で、`set_locale` の直後から新しいテーブルが見える。

use std::sync::Arc;

use tokio::sync::watch;

use super::{
    Catalog,
    I18nError,
    Locale,
    TranslationTable,
};

/// 現在のロケールと翻訳カタログを保持するストア（単一の書き込み者）
#[derive(Debug)]
pub struct LocaleStore {
    /// 全ロケールの翻訳（読み出し側と共有）
    catalog: Arc<Catalog>,
    /// 現在のロケール
    sender: watch::Sender<Locale>,
}

impl LocaleStore {
    /// 初期ロケールを指定してストアを作成する
    ///
    /// 初期値は設定で決まる固定値で、ブラウザや OS の設定からは推測しない。
    #[must_use]
    pub fn new(catalog: Catalog, initial: Locale) -> Self {
        let (sender, _receiver) = watch::channel(initial);
        tracing::debug!("Locale store initialized with '{}'", initial);
        Self { catalog: Arc::new(catalog), sender }
    }

    #[must_use]
    pub fn current_locale(&self) -> Locale {
        *self.sender.borrow()
    }

    /// ロケールを切り替える
    ///
    /// 同じロケールを再設定しても購読者には通知しない（冪等）。
    /// 戻り値は実際に切り替わったかどうか。
    pub fn set_locale(&self, locale: Locale) -> bool {
        let changed = self.sender.send_if_modified(|current| {
            if *current == locale {
                return false;
            }
            *current = locale;
            true
        });

        if changed {
            tracing::info!("Locale switched to '{}'", locale);
        }
        changed
    }

    /// 現在のロケールの翻訳テーブル
    #[must_use]
    pub fn translations(&self) -> &TranslationTable {
        self.catalog.table(self.current_locale())
    }

    /// 読み出し専用のハンドルを作成する
    ///
    /// ロケールを表示するコンポーネントはそれぞれ `LocaleReader` を受け取る。
    #[must_use]
    pub fn reader(&self) -> LocaleReader {
        LocaleReader { catalog: Arc::clone(&self.catalog), receiver: self.sender.subscribe() }
    }
}

/// `LocaleStore` の読み出し専用ハンドル
#[derive(Debug, Clone)]
pub struct LocaleReader {
    /// 全ロケールの翻訳
    catalog: Arc<Catalog>,
    /// 現在のロケールの購読
    receiver: watch::Receiver<Locale>,
}

impl LocaleReader {
    #[must_use]
    pub fn current_locale(&self) -> Locale {
        *self.receiver.borrow()
    }

    #[must_use]
    pub fn translations(&self) -> &TranslationTable {
        self.catalog.table(self.current_locale())
    }

    /// 現在のロケールでキーを引く
    ///
    /// # Errors
    /// キーが存在しない場合
    pub fn text(&self, key: &str) -> Result<&str, I18nError> {
        self.translations().get(key)
    }

    /// ロケールが切り替わるまで待機し、新しいロケールを返す
    ///
    /// # Errors
    /// ストアが破棄された場合
    pub async fn changed(&mut self) -> Result<Locale, I18nError> {
        self.receiver.changed().await.map_err(|_| I18nError::StoreClosed)?;
        Ok(*self.receiver.borrow_and_update())
    }
}
