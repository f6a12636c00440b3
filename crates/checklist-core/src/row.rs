//! 試算表資料列

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::LeafId;
use crate::config::ChecklistConfig;
use crate::{ChecklistError, Result};

/// 未驗證的原始資料列（欄位皆為文字）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRow {
    /// 來源行號（含表頭，從 1 起算）
    pub line: usize,
    pub section: String,
    pub item: String,
    pub sub_item: Option<String>,
    pub minimum: Option<String>,
    pub desired: Option<String>,
}

impl SourceRow {
    /// 創建原始資料列
    pub fn new(line: usize, section: impl Into<String>, item: impl Into<String>) -> Self {
        Self {
            line,
            section: section.into(),
            item: item.into(),
            ..Default::default()
        }
    }

    /// 建構器模式：設置子項目
    pub fn with_sub_item(mut self, sub_item: impl Into<String>) -> Self {
        self.sub_item = Some(sub_item.into());
        self
    }

    /// 建構器模式：設置門檻文字
    pub fn with_thresholds(mut self, minimum: impl Into<String>, desired: impl Into<String>) -> Self {
        self.minimum = Some(minimum.into());
        self.desired = Some(desired.into());
        self
    }

    /// 是否為全空白的資料列
    pub fn is_blank(&self) -> bool {
        let blank = |v: &Option<String>| v.as_deref().map_or(true, |s| s.trim().is_empty());
        self.section.trim().is_empty()
            && self.item.trim().is_empty()
            && blank(&self.sub_item)
            && blank(&self.minimum)
            && blank(&self.desired)
    }
}

/// 已驗證的資料列
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub section: String,
    pub item: String,
    pub sub_item: Option<String>,
    pub min_qty: Decimal,
    pub desired_qty: Decimal,
}

impl Row {
    /// 創建資料列；名稱去除前後空白，空白子項目視為無子項目
    ///
    /// 不做驗證，見 [`Row::validate`]。
    pub fn new(
        section: impl AsRef<str>,
        item: impl AsRef<str>,
        sub_item: Option<&str>,
        min_qty: Decimal,
        desired_qty: Decimal,
    ) -> Self {
        Self {
            section: section.as_ref().trim().to_string(),
            item: item.as_ref().trim().to_string(),
            sub_item: normalize_sub_item(sub_item),
            min_qty,
            desired_qty,
        }
    }

    /// 驗證並轉換原始資料列
    pub fn parse(source: &SourceRow, config: &ChecklistConfig) -> Result<Self> {
        let line = source.line;

        let min_qty = match parse_threshold(line, "Minimum", source.minimum.as_deref())? {
            Some(qty) => qty,
            None if config.missing_minimum_as_zero => Decimal::ZERO,
            None => return Err(malformed(line, "缺少 Minimum")),
        };

        let desired_qty = parse_threshold(line, "Desired", source.desired.as_deref())?
            .ok_or_else(|| malformed(line, "缺少 Desired"))?;

        let row = Self::new(
            &source.section,
            &source.item,
            source.sub_item.as_deref(),
            min_qty,
            desired_qty,
        );
        row.validate(line)?;
        Ok(row)
    }

    /// 檢查名稱不可為空、門檻不可為負數
    pub fn validate(&self, line: usize) -> Result<()> {
        if self.section.trim().is_empty() {
            return Err(malformed(line, "缺少 Section"));
        }
        if self.item.trim().is_empty() {
            return Err(malformed(line, "缺少 Item"));
        }
        if is_negative(self.min_qty) {
            return Err(malformed(line, format!("Minimum 不可為負數: {}", self.min_qty)));
        }
        if is_negative(self.desired_qty) {
            return Err(malformed(line, format!("Desired 不可為負數: {}", self.desired_qty)));
        }
        Ok(())
    }

    /// 對應的葉節點識別
    pub fn leaf_id(&self) -> LeafId {
        LeafId::new(self.section.clone(), self.item.clone(), self.sub_item.clone())
    }

    /// 檢查 最低量 <= 期望量
    pub fn check_threshold_order(&self) -> Result<()> {
        if self.min_qty > self.desired_qty {
            return Err(ChecklistError::ThresholdOrder {
                leaf: self.leaf_id().to_string(),
                min: self.min_qty,
                desired: self.desired_qty,
            });
        }
        Ok(())
    }
}

fn normalize_sub_item(sub_item: Option<&str>) -> Option<String> {
    sub_item
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn parse_threshold(line: usize, field: &str, value: Option<&str>) -> Result<Option<Decimal>> {
    let Some(text) = value.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    let qty = Decimal::from_str(text)
        .map_err(|_| malformed(line, format!("{} 不是數字: {}", field, text)))?;

    if is_negative(qty) {
        return Err(malformed(line, format!("{} 不可為負數: {}", field, text)));
    }

    Ok(Some(qty))
}

fn is_negative(qty: Decimal) -> bool {
    qty.is_sign_negative() && !qty.is_zero()
}

fn malformed(line: usize, reason: impl Into<String>) -> ChecklistError {
    ChecklistError::MalformedInput {
        line,
        reason: reason.into(),
    }
}
