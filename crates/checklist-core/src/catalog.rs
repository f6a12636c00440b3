//! 清單目錄模型（區段 → 品項 → 葉節點）

use std::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::DefaultQuantity;

/// 葉節點識別：(區段, 品項, 子項目)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LeafId {
    pub section: String,
    pub item: String,
    pub sub_item: Option<String>,
}

impl LeafId {
    pub fn new(section: impl Into<String>, item: impl Into<String>, sub_item: Option<String>) -> Self {
        Self {
            section: section.into(),
            item: item.into(),
            sub_item,
        }
    }

    /// 無子項目的葉節點
    pub fn item_only(section: impl Into<String>, item: impl Into<String>) -> Self {
        Self::new(section, item, None)
    }

    /// 具名子項目的葉節點
    pub fn with_sub_item(
        section: impl Into<String>,
        item: impl Into<String>,
        sub_item: impl Into<String>,
    ) -> Self {
        Self::new(section, item, Some(sub_item.into()))
    }

    /// 表單輸入鍵，如 `Pantry-Rice` 或 `Fridge-Milk-Whole`
    pub fn form_key(&self) -> String {
        match &self.sub_item {
            Some(sub) => format!("{}-{}-{}", self.section, self.item, sub),
            None => format!("{}-{}", self.section, self.item),
        }
    }

    /// 顯示名稱（不含區段）
    pub fn label(&self) -> String {
        match &self.sub_item {
            Some(sub) => format!("{} - {}", self.item, sub),
            None => self.item.clone(),
        }
    }
}

impl fmt::Display for LeafId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.sub_item {
            Some(sub) => write!(f, "{}/{}/{}", self.section, self.item, sub),
            None => write!(f, "{}/{}", self.section, self.item),
        }
    }
}

/// 數量分類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    /// 低於最低量
    BelowMinimum,
    /// 介於最低量與期望量之間
    BetweenMinimumAndDesired,
    /// 達到或超過期望量
    AtOrAboveDesired,
}

/// 葉節點：最小可輸入單位
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaf {
    pub id: LeafId,
    pub min_qty: Decimal,
    pub desired_qty: Decimal,
}

impl Leaf {
    pub fn new(id: LeafId, min_qty: Decimal, desired_qty: Decimal) -> Self {
        Self {
            id,
            min_qty,
            desired_qty,
        }
    }

    /// 依門檻分類數量（依序判斷，先符合者為準）
    pub fn classify(&self, quantity: u32) -> Classification {
        let qty = Decimal::from(quantity);
        if qty < self.min_qty {
            Classification::BelowMinimum
        } else if qty < self.desired_qty {
            Classification::BetweenMinimumAndDesired
        } else {
            Classification::AtOrAboveDesired
        }
    }

    /// 表單初始值；最低量為小數時向上取整
    pub fn default_quantity(&self, default_quantity: DefaultQuantity) -> u32 {
        match default_quantity {
            DefaultQuantity::Minimum => self.min_qty.ceil().to_u32().unwrap_or(u32::MAX),
            DefaultQuantity::Zero => 0,
        }
    }
}

/// 品項
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub name: String,
    pub leaves: Vec<Leaf>,
}

impl CatalogItem {
    pub fn new(name: impl Into<String>, leaves: Vec<Leaf>) -> Self {
        Self {
            name: name.into(),
            leaves,
        }
    }

    /// 是否含具名子項目
    pub fn has_sub_items(&self) -> bool {
        self.leaves.iter().any(|leaf| leaf.id.sub_item.is_some())
    }
}

/// 區段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSection {
    pub name: String,
    pub items: Vec<CatalogItem>,
}

impl CatalogSection {
    pub fn new(name: impl Into<String>, items: Vec<CatalogItem>) -> Self {
        Self {
            name: name.into(),
            items,
        }
    }

    /// 區段內所有葉節點（依目錄順序）
    pub fn leaves(&self) -> impl Iterator<Item = &Leaf> {
        self.items.iter().flat_map(|item| item.leaves.iter())
    }
}

/// 目錄：載入後唯讀
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    sections: Vec<CatalogSection>,
}

impl Catalog {
    pub fn new(sections: Vec<CatalogSection>) -> Self {
        Self { sections }
    }

    pub fn sections(&self) -> &[CatalogSection] {
        &self.sections
    }

    pub fn section(&self, name: &str) -> Option<&CatalogSection> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// 所有葉節點（依目錄順序）
    pub fn leaves(&self) -> impl Iterator<Item = &Leaf> {
        self.sections.iter().flat_map(|section| section.leaves())
    }

    pub fn leaf(&self, id: &LeafId) -> Option<&Leaf> {
        self.section(&id.section)?
            .items
            .iter()
            .find(|item| item.name == id.item)?
            .leaves
            .iter()
            .find(|leaf| leaf.id == *id)
    }

    /// 依表單輸入鍵查找葉節點
    pub fn leaf_by_form_key(&self, key: &str) -> Option<&Leaf> {
        self.leaves().find(|leaf| leaf.id.form_key() == key)
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves().count()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// 是否有任何具名子項目
    pub fn has_sub_items(&self) -> bool {
        self.leaves().any(|leaf| leaf.id.sub_item.is_some())
    }
}
