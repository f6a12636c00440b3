//! 填寫工作階段

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use checklist_calc::{
    render_section, report_to_csv_string, EntryClassifier, ExportLayout, Report, SectionCursor,
    SectionView,
};
use checklist_core::{Catalog, ChecklistConfig, ChecklistError, Entries};
use uuid::Uuid;

/// 單一使用者的填寫狀態；共用的目錄唯讀
#[derive(Debug, Clone)]
pub struct ChecklistSession {
    id: Uuid,
    started_at: DateTime<Utc>,
    catalog: Arc<Catalog>,
    config: ChecklistConfig,
    cursor: SectionCursor,
    entries: Entries,
}

impl ChecklistSession {
    /// 創建新的工作階段
    pub fn new(catalog: Arc<Catalog>, config: ChecklistConfig) -> Self {
        let session = Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            catalog,
            config,
            cursor: SectionCursor::first(),
            entries: Entries::new(),
        };
        tracing::debug!(
            "建立工作階段 {}：區段 {} 個",
            session.id,
            session.catalog.section_count()
        );
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn cursor(&self) -> SectionCursor {
        self.cursor
    }

    pub fn entries(&self) -> &Entries {
        &self.entries
    }

    /// 目前區段的畫面資料
    pub fn render_current(&self) -> Option<SectionView> {
        render_section(
            &self.catalog,
            self.cursor,
            &self.entries,
            self.config.default_quantity,
        )
    }

    /// 前往下一個區段
    pub fn advance(&mut self) -> SectionCursor {
        self.cursor = self.cursor.next(&self.catalog);
        self.cursor
    }

    /// 回到上一個區段
    pub fn back(&mut self) -> SectionCursor {
        self.cursor = self.cursor.previous();
        self.cursor
    }

    /// 記錄單一欄位
    pub fn record(&mut self, key: &str, value: i64) -> checklist_core::Result<u32> {
        let id = self
            .catalog
            .leaf_by_form_key(key)
            .map(|leaf| leaf.id.clone())
            .ok_or_else(|| ChecklistError::UnknownEntry(key.to_string()))?;

        self.entries
            .record_signed(id, value, self.config.negative_quantity_policy)
    }

    /// 記錄整個表單；任一欄位被拒絕時不寫入任何欄位
    pub fn record_form(&mut self, form: &HashMap<String, i64>) -> checklist_core::Result<()> {
        let submitted =
            Entries::from_form(&self.catalog, form, self.config.negative_quantity_policy)?;
        for (id, quantity) in submitted.iter() {
            self.entries.set(id.clone(), quantity);
        }
        Ok(())
    }

    /// 提交：將未填寫的欄位補上初始值後分類
    pub fn submit(&self) -> Report {
        let mut entries = Entries::defaults_for(&self.catalog, self.config.default_quantity);
        for (id, quantity) in self.entries.iter() {
            entries.set(id.clone(), quantity);
        }

        tracing::info!("工作階段 {} 提交", self.id);
        EntryClassifier::classify(&self.catalog, &entries)
    }

    /// 提交並匯出 CSV，回傳 (檔名, 內容)
    pub fn export(&self) -> checklist_core::Result<(String, String)> {
        let report = self.submit();
        let csv = report_to_csv_string(&report, ExportLayout::for_catalog(&self.catalog))?;
        Ok((self.config.export_file_name.clone(), csv))
    }
}
