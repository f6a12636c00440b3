//! 使用者輸入數量

use std::collections::HashMap;

use crate::catalog::{Catalog, LeafId};
use crate::config::{DefaultQuantity, NegativeQuantityPolicy};
use crate::{ChecklistError, Result};

/// 葉節點 → 輸入數量
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entries {
    quantities: HashMap<LeafId, u32>,
}

impl Entries {
    pub fn new() -> Self {
        Self::default()
    }

    /// 設置數量，覆蓋先前的輸入
    pub fn set(&mut self, id: LeafId, quantity: u32) {
        self.quantities.insert(id, quantity);
    }

    /// 建構器模式：設置數量
    pub fn with(mut self, id: LeafId, quantity: u32) -> Self {
        self.set(id, quantity);
        self
    }

    pub fn get(&self, id: &LeafId) -> Option<u32> {
        self.quantities.get(id).copied()
    }

    /// 未輸入的葉節點視為 0
    pub fn quantity_or_zero(&self, id: &LeafId) -> u32 {
        self.get(id).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.quantities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LeafId, u32)> {
        self.quantities.iter().map(|(id, qty)| (id, *qty))
    }

    /// 記錄可能為負數的輸入
    pub fn record_signed(
        &mut self,
        id: LeafId,
        value: i64,
        policy: NegativeQuantityPolicy,
    ) -> Result<u32> {
        let quantity = if value < 0 {
            match policy {
                NegativeQuantityPolicy::Reject => {
                    return Err(ChecklistError::NegativeQuantity {
                        key: id.form_key(),
                        value,
                    });
                }
                NegativeQuantityPolicy::ClampToZero => {
                    tracing::debug!("負數輸入 {} = {} 視為 0", id, value);
                    0
                }
            }
        } else {
            u32::try_from(value).map_err(|_| ChecklistError::QuantityOutOfRange {
                key: id.form_key(),
                value,
            })?
        };

        self.set(id, quantity);
        Ok(quantity)
    }

    /// 從表單（輸入鍵 → 數值）建立；目錄中不存在的鍵會被略過
    pub fn from_form(
        catalog: &Catalog,
        form: &HashMap<String, i64>,
        policy: NegativeQuantityPolicy,
    ) -> Result<Self> {
        let mut entries = Self::new();

        for leaf in catalog.leaves() {
            if let Some(&value) = form.get(&leaf.id.form_key()) {
                entries.record_signed(leaf.id.clone(), value, policy)?;
            }
        }

        let ignored = form.len().saturating_sub(entries.len());
        if ignored > 0 {
            tracing::debug!("略過 {} 個未知的表單欄位", ignored);
        }

        Ok(entries)
    }

    /// 所有葉節點的表單初始值
    pub fn defaults_for(catalog: &Catalog, default_quantity: DefaultQuantity) -> Self {
        let mut entries = Self::new();
        for leaf in catalog.leaves() {
            entries.set(leaf.id.clone(), leaf.default_quantity(default_quantity));
        }
        entries
    }
}
