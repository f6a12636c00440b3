//! 清單配置模型

use serde::{Deserialize, Serialize};

use crate::{ChecklistError, Result};

/// 清單載入與分類參數
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChecklistConfig {
    /// 頁面標題
    pub title: String,

    /// 試算表 CSV 匯出網址
    pub source_url: Option<String>,

    /// 目錄緩存有效期（秒）
    pub cache_ttl_secs: u64,

    /// 缺少最低量時是否視為 0
    pub missing_minimum_as_zero: bool,

    /// 是否檢查 最低量 <= 期望量
    pub enforce_threshold_order: bool,

    /// 單獨項目與子項目混用時的處理方式
    pub mixed_item_policy: MixedItemPolicy,

    /// 負數輸入的處理方式
    pub negative_quantity_policy: NegativeQuantityPolicy,

    /// 表單初始值
    pub default_quantity: DefaultQuantity,

    /// 匯出檔名
    pub export_file_name: String,
}

impl Default for ChecklistConfig {
    fn default() -> Self {
        Self {
            title: "Kitchen Stock Checklist".to_string(),
            source_url: None,
            cache_ttl_secs: 300,
            missing_minimum_as_zero: false,
            enforce_threshold_order: true,
            mixed_item_policy: MixedItemPolicy::Reject,
            negative_quantity_policy: NegativeQuantityPolicy::Reject,
            default_quantity: DefaultQuantity::Minimum,
            export_file_name: "kitchen_stock_output.csv".to_string(),
        }
    }
}

impl ChecklistConfig {
    /// 創建預設配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 從 JSON 讀取配置，未指定的欄位使用預設值
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ChecklistError::Config(e.to_string()))
    }

    /// 建構器模式：設置標題
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// 建構器模式：設置來源網址
    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    /// 建構器模式：設置緩存有效期
    pub fn with_cache_ttl_secs(mut self, secs: u64) -> Self {
        self.cache_ttl_secs = secs;
        self
    }

    /// 建構器模式：缺少最低量時以 0 代替
    pub fn with_missing_minimum_as_zero(mut self, enabled: bool) -> Self {
        self.missing_minimum_as_zero = enabled;
        self
    }

    /// 建構器模式：設置是否檢查門檻順序
    pub fn with_enforce_threshold_order(mut self, enabled: bool) -> Self {
        self.enforce_threshold_order = enabled;
        self
    }

    /// 建構器模式：設置混用處理方式
    pub fn with_mixed_item_policy(mut self, policy: MixedItemPolicy) -> Self {
        self.mixed_item_policy = policy;
        self
    }

    /// 建構器模式：設置負數處理方式
    pub fn with_negative_quantity_policy(mut self, policy: NegativeQuantityPolicy) -> Self {
        self.negative_quantity_policy = policy;
        self
    }

    /// 建構器模式：設置表單初始值
    pub fn with_default_quantity(mut self, default_quantity: DefaultQuantity) -> Self {
        self.default_quantity = default_quantity;
        self
    }

    /// 建構器模式：設置匯出檔名
    pub fn with_export_file_name(mut self, name: impl Into<String>) -> Self {
        self.export_file_name = name.into();
        self
    }
}

/// 單獨項目與子項目混用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MixedItemPolicy {
    /// 拒絕（回報 AmbiguousItem）
    Reject,
    /// 每一行各自成為葉節點，不合併
    KeepDistinct,
}

/// 負數輸入
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NegativeQuantityPolicy {
    /// 拒絕（回報 NegativeQuantity）
    Reject,
    /// 視為 0
    ClampToZero,
}

/// 表單初始值
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefaultQuantity {
    /// 以最低量作為初始值
    Minimum,
    /// 以 0 作為初始值
    Zero,
}
