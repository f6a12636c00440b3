//! 目錄建立

use std::collections::HashMap;

use checklist_core::{
    Catalog, CatalogItem, CatalogSection, ChecklistConfig, ChecklistError, Leaf, LeafId,
    MixedItemPolicy, Row, SourceRow,
};

/// 目錄建立器：扁平資料列 → 區段/品項/葉節點
pub struct CatalogBuilder {
    config: ChecklistConfig,
}

impl CatalogBuilder {
    /// 創建新的目錄建立器
    pub fn new(config: ChecklistConfig) -> Self {
        Self { config }
    }

    /// 從原始資料列建立目錄（全空白列略過）
    pub fn build<I>(&self, rows: I) -> checklist_core::Result<Catalog>
    where
        I: IntoIterator<Item = SourceRow>,
    {
        let parsed = rows
            .into_iter()
            .filter(|row| !row.is_blank())
            .map(|row| Row::parse(&row, &self.config).map(|parsed| (row.line, parsed)))
            .collect::<checklist_core::Result<Vec<_>>>()?;

        self.assemble(parsed)
    }

    /// 從已驗證的資料列建立目錄；錯誤中的行號為資料列序號（從 1 起算）
    pub fn build_rows<I>(&self, rows: I) -> checklist_core::Result<Catalog>
    where
        I: IntoIterator<Item = Row>,
    {
        self.assemble(rows.into_iter().enumerate().map(|(i, row)| (i + 1, row)).collect())
    }

    fn assemble(&self, rows: Vec<(usize, Row)>) -> checklist_core::Result<Catalog> {
        tracing::debug!("建立目錄：資料列 {} 筆", rows.len());

        let mut sections: Vec<CatalogSection> = Vec::new();
        let mut section_index: HashMap<String, usize> = HashMap::new();
        let mut item_index: HashMap<(String, String), usize> = HashMap::new();
        let mut seen: HashMap<LeafId, usize> = HashMap::new();
        let mut form_keys: HashMap<String, (LeafId, usize)> = HashMap::new();

        for (line, row) in rows {
            // 欄位為公開，以建構子重新正規化名稱
            let row = Row::new(
                &row.section,
                &row.item,
                row.sub_item.as_deref(),
                row.min_qty,
                row.desired_qty,
            );
            row.validate(line)?;

            if self.config.enforce_threshold_order {
                row.check_threshold_order()?;
            }

            let id = row.leaf_id();

            // 重複的葉節點：門檻相同則合併，不同則拒絕
            if let Some(&first_line) = seen.get(&id) {
                let existing = find_leaf(&sections, &section_index, &item_index, &id);
                match existing {
                    Some(leaf)
                        if leaf.min_qty == row.min_qty && leaf.desired_qty == row.desired_qty =>
                    {
                        tracing::warn!("第 {} 行與第 {} 行重複，已合併: {}", line, first_line, id);
                        continue;
                    }
                    _ => {
                        return Err(ChecklistError::MalformedInput {
                            line,
                            reason: format!("{} 與第 {} 行重複且門檻不同", id, first_line),
                        });
                    }
                }
            }
            seen.insert(id.clone(), line);

            // 不同葉節點不可共用同一個表單輸入鍵
            if let Some((other, other_line)) = form_keys.get(&id.form_key()) {
                return Err(ChecklistError::MalformedInput {
                    line,
                    reason: format!(
                        "{} 與第 {} 行的 {} 表單輸入鍵相同: {}",
                        id,
                        other_line,
                        other,
                        id.form_key()
                    ),
                });
            }
            form_keys.insert(id.form_key(), (id.clone(), line));

            let s_idx = *section_index.entry(row.section.clone()).or_insert_with(|| {
                sections.push(CatalogSection::new(row.section.clone(), Vec::new()));
                sections.len() - 1
            });
            let section = &mut sections[s_idx];

            let i_idx = *item_index
                .entry((row.section.clone(), row.item.clone()))
                .or_insert_with(|| {
                    section.items.push(CatalogItem::new(row.item.clone(), Vec::new()));
                    section.items.len() - 1
                });

            section.items[i_idx]
                .leaves
                .push(Leaf::new(id, row.min_qty, row.desired_qty));
        }

        if self.config.mixed_item_policy == MixedItemPolicy::Reject {
            check_mixed_items(&sections)?;
        }

        let catalog = Catalog::new(sections);
        tracing::info!(
            "目錄建立完成：區段 {} 個，葉節點 {} 個",
            catalog.section_count(),
            catalog.leaf_count()
        );

        Ok(catalog)
    }
}

impl Default for CatalogBuilder {
    fn default() -> Self {
        Self::new(ChecklistConfig::default())
    }
}

fn find_leaf<'a>(
    sections: &'a [CatalogSection],
    section_index: &HashMap<String, usize>,
    item_index: &HashMap<(String, String), usize>,
    id: &LeafId,
) -> Option<&'a Leaf> {
    let section = sections.get(*section_index.get(&id.section)?)?;
    let item = section
        .items
        .get(*item_index.get(&(id.section.clone(), id.item.clone()))?)?;
    item.leaves.iter().find(|leaf| leaf.id == *id)
}

/// 同一品項不可同時有單獨項目與具名子項目
fn check_mixed_items(sections: &[CatalogSection]) -> checklist_core::Result<()> {
    for section in sections {
        for item in &section.items {
            let has_bare = item.leaves.iter().any(|leaf| leaf.id.sub_item.is_none());
            if has_bare && item.has_sub_items() {
                return Err(ChecklistError::AmbiguousItem {
                    section: section.name.clone(),
                    item: item.name.clone(),
                });
            }
        }
    }
    Ok(())
}
