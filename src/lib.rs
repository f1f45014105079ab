//! school-site
//!
//! 学校サイトの問い合わせフォーム（入力検証・送信）と多言語化、問い合わせメールの中継サーバー

pub mod config;
pub mod contact;
pub mod i18n;
pub mod relay;

#[cfg(test)]
mod test_utils;
