//! 多言語化：ロケール、翻訳テーブル、ロケールストア

mod catalog;
mod error;
mod locale;
mod store;
mod table;

pub use catalog::{
    Catalog,
    check_parity,
};
pub use error::{
    I18nError,
    MissingTranslation,
};
pub use locale::Locale;
pub use store::{
    LocaleReader,
    LocaleStore,
};
pub use table::{
    KEY_SEPARATOR,
    TranslationTable,
    flatten_json,
};
