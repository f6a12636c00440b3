//! # Checklist Core
//!
//! 核心資料模型與類型定義

pub mod catalog;
pub mod config;
pub mod entry;
pub mod row;

// Re-export 主要類型
pub use catalog::{Catalog, CatalogItem, CatalogSection, Classification, Leaf, LeafId};
pub use config::{
    ChecklistConfig, DefaultQuantity, MixedItemPolicy, NegativeQuantityPolicy,
};
pub use entry::Entries;
pub use row::{Row, SourceRow};

/// 清單錯誤類型
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChecklistError {
    #[error("第 {line} 行資料格式錯誤: {reason}")]
    MalformedInput { line: usize, reason: String },

    #[error("來源資料缺少欄位: {0}")]
    MissingColumn(String),

    #[error("最低量大於期望量: {leaf}（最低 {min}，期望 {desired}）")]
    ThresholdOrder {
        leaf: String,
        min: rust_decimal::Decimal,
        desired: rust_decimal::Decimal,
    },

    #[error("品項 {section}/{item} 同時存在單獨項目與子項目")]
    AmbiguousItem { section: String, item: String },

    #[error("數量不可為負數: {key} = {value}")]
    NegativeQuantity { key: String, value: i64 },

    #[error("數量超出範圍: {key} = {value}")]
    QuantityOutOfRange { key: String, value: i64 },

    #[error("目錄中沒有此輸入欄位: {0}")]
    UnknownEntry(String),

    #[error("CSV 錯誤: {0}")]
    Csv(String),

    #[error("資料來源錯誤: {0}")]
    Source(String),

    #[error("配置錯誤: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ChecklistError>;
