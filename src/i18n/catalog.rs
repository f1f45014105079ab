//! 全ロケールの翻訳テーブル集合

use std::collections::BTreeSet;
use std::path::Path;

use super::{
    I18nError,
    Locale,
    MissingTranslation,
    TranslationTable,
};

/// 組み込みのポルトガル語テーブル
const EMBEDDED_PT: &str = include_str!("locales/pt.json");
/// 組み込みの英語テーブル
const EMBEDDED_EN: &str = include_str!("locales/en.json");

/// 全ロケールの翻訳テーブル
///
/// 構築時にキーのパリティ（全ロケールが同じキー集合を持つこと）を検証するため、
/// `Catalog` が存在する時点で全ロケールのテーブルが揃っていることが保証される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    /// ポルトガル語
    pt: TranslationTable,
    /// 英語
    en: TranslationTable,
}

impl Catalog {
    /// クレートに組み込まれた翻訳テーブルから作成する
    ///
    /// # Errors
    /// 組み込み JSON の不整合（パースエラー、キー欠落）
    pub fn embedded() -> Result<Self, I18nError> {
        Self::from_tables([
            TranslationTable::from_json_str(Locale::Pt, EMBEDDED_PT)?,
            TranslationTable::from_json_str(Locale::En, EMBEDDED_EN)?,
        ])
    }

    /// ディレクトリから翻訳を読み込む
    ///
    /// `<dir>/<locale>.json` が存在するロケールはファイルの内容で置き換え、
    /// 存在しないロケールは組み込みテーブルを使う。
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    /// - パリティ違反
    pub fn load_from_dir(dir: &Path) -> Result<Self, I18nError> {
        let mut tables = Vec::with_capacity(Locale::ALL.len());

        for locale in Locale::ALL {
            let path = dir.join(format!("{}.json", locale.code()));
            let table = if path.exists() {
                tracing::debug!("Loading translations for '{}' from {:?}", locale, path);
                let content = std::fs::read_to_string(&path)
                    .map_err(|source| I18nError::Io { path: path.clone(), source })?;
                TranslationTable::from_json_str(locale, &content)?
            } else {
                tracing::debug!("No translation file at {:?}, using embedded table", path);
                TranslationTable::from_json_str(locale, embedded_source(locale))?
            };
            tables.push(table);
        }

        Self::from_tables(tables)
    }

    /// テーブル群からカタログを作成する
    ///
    /// # Errors
    /// - ロケールの欠落・重複
    /// - パリティ違反（欠落キーを全て列挙する）
    pub fn from_tables(
        tables: impl IntoIterator<Item = TranslationTable>,
    ) -> Result<Self, I18nError> {
        let mut pt = None;
        let mut en = None;

        for table in tables {
            let slot = match table.locale() {
                Locale::Pt => &mut pt,
                Locale::En => &mut en,
            };
            if slot.is_some() {
                return Err(I18nError::DuplicateLocale(table.locale()));
            }
            *slot = Some(table);
        }

        let pt = pt.ok_or(I18nError::MissingLocale(Locale::Pt))?;
        let en = en.ok_or(I18nError::MissingLocale(Locale::En))?;

        let missing = check_parity(&[&pt, &en]);
        if !missing.is_empty() {
            return Err(I18nError::Parity(missing));
        }

        Ok(Self { pt, en })
    }

    #[must_use]
    pub const fn table(&self, locale: Locale) -> &TranslationTable {
        match locale {
            Locale::Pt => &self.pt,
            Locale::En => &self.en,
        }
    }
}

/// 組み込み JSON ソース
const fn embedded_source(locale: Locale) -> &'static str {
    match locale {
        Locale::Pt => EMBEDDED_PT,
        Locale::En => EMBEDDED_EN,
    }
}

/// ロケール間のキーのパリティを検査する
///
/// いずれかのテーブルに存在するキーを全て集め、
/// それを持たないテーブルごとに `MissingTranslation` を報告する。
/// 結果はキー、ロケールの順でソート済み。
#[must_use]
pub fn check_parity(tables: &[&TranslationTable]) -> Vec<MissingTranslation> {
    let all_keys: BTreeSet<&str> = tables.iter().flat_map(|table| table.keys()).collect();

    let mut missing = Vec::new();
    for key in all_keys {
        for table in tables {
            if !table.contains_key(key) {
                missing.push(MissingTranslation { key: key.to_string(), locale: table.locale() });
            }
        }
    }
    missing.sort();

    missing
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;
    use std::fs;

    use googletest::prelude::*;
    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;

    fn table(locale: Locale, keys: &[(&str, &str)]) -> TranslationTable {
        TranslationTable::new(
            locale,
            keys.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect::<HashMap<_, _>>(),
        )
    }

    #[googletest::test]
    fn embedded_catalog_has_parity() {
        let catalog = Catalog::embedded().unwrap();

        let pt = catalog.table(Locale::Pt);
        let en = catalog.table(Locale::En);

        expect_that!(pt.len(), eq(en.len()));
        expect_that!(check_parity(&[pt, en]), is_empty());
        assert_eq!(en.get("common.backToHome").ok(), Some("Back to home"));
        assert_eq!(pt.get("common.backToHome").ok(), Some("Voltar ao início"));
    }

    #[googletest::test]
    fn check_parity_reports_every_missing_key() {
        let pt = table(Locale::Pt, &[("nav.home", "Início"), ("nav.about", "Sobre")]);
        let en = table(Locale::En, &[("nav.home", "Home"), ("nav.faq", "FAQ")]);

        let missing = check_parity(&[&pt, &en]);

        expect_that!(
            missing,
            elements_are![
                eq(&MissingTranslation { key: "nav.about".to_string(), locale: Locale::En }),
                eq(&MissingTranslation { key: "nav.faq".to_string(), locale: Locale::Pt }),
            ]
        );
    }

    #[googletest::test]
    fn from_tables_rejects_parity_violation() {
        let pt = table(Locale::Pt, &[("nav.home", "Início"), ("nav.about", "Sobre")]);
        let en = table(Locale::En, &[("nav.home", "Home")]);

        let result = Catalog::from_tables([pt, en]);

        expect_that!(
            result,
            err(displays_as(all![
                contains_substring("out of sync"),
                contains_substring("'nav.about' is missing in 'en'")
            ]))
        );
    }

    #[rstest]
    fn from_tables_requires_every_locale() {
        let pt = table(Locale::Pt, &[("nav.home", "Início")]);

        let result = Catalog::from_tables([pt]);

        assert!(matches!(result, Err(I18nError::MissingLocale(Locale::En))));
    }

    #[rstest]
    fn from_tables_rejects_duplicates() {
        let a = table(Locale::En, &[("nav.home", "Home")]);
        let b = table(Locale::En, &[("nav.home", "Home")]);

        let result = Catalog::from_tables([a, b]);

        assert!(matches!(result, Err(I18nError::DuplicateLocale(Locale::En))));
    }

    #[rstest]
    fn load_from_dir_falls_back_to_embedded() {
        let temp_dir = TempDir::new().unwrap();

        let catalog = Catalog::load_from_dir(temp_dir.path()).unwrap();

        assert_eq!(catalog, Catalog::embedded().unwrap());
    }

    #[rstest]
    fn load_from_dir_detects_broken_override() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("en.json"), r#"{"nav": {"home": "Home"}}"#).unwrap();

        let result = Catalog::load_from_dir(temp_dir.path());

        assert!(matches!(result, Err(I18nError::Parity(_))));
    }

    #[rstest]
    fn load_from_dir_reports_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("pt.json"), "invalid json").unwrap();

        let result = Catalog::load_from_dir(temp_dir.path());

        assert!(matches!(result, Err(I18nError::Parse { locale: Locale::Pt, .. })));
    }
}
