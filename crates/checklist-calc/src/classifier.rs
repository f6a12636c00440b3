//! 數量分類與報表

use checklist_core::{Catalog, Classification, Entries, LeafId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::export::ExportRow;

/// 報表中的單一葉節點
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportLine {
    pub id: LeafId,
    pub quantity: u32,
    pub min_qty: Decimal,
    pub desired_qty: Decimal,
    pub classification: Classification,
}

/// 需要注意的葉節點
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub id: LeafId,
    /// 顯示名稱（品項或「品項 - 子項目」）
    pub label: String,
    pub quantity: u32,
    pub min_qty: Decimal,
    pub desired_qty: Decimal,
}

/// 依區段分組的發現
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionFindings {
    pub section: String,
    pub findings: Vec<Finding>,
}

/// 各分類數量
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total: usize,
    pub below_minimum: usize,
    pub between_minimum_and_desired: usize,
    pub at_or_above_desired: usize,
}

/// 分類報表
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// 所有葉節點（依目錄順序）
    pub lines: Vec<ReportLine>,

    /// 低於最低量（依區段分組）
    pub below_minimum: Vec<SectionFindings>,

    /// 介於最低量與期望量之間（依區段分組）
    pub between_minimum_and_desired: Vec<SectionFindings>,

    pub summary: ReportSummary,
}

impl Report {
    /// 匯出用的扁平資料列
    pub fn export_rows(&self) -> Vec<ExportRow> {
        self.lines
            .iter()
            .map(|line| ExportRow {
                section: line.id.section.clone(),
                item: line.id.item.clone(),
                sub_item: line.id.sub_item.clone().unwrap_or_default(),
                quantity: line.quantity,
            })
            .collect()
    }

    /// 指定分類的所有資料列
    pub fn lines_with(&self, classification: Classification) -> impl Iterator<Item = &ReportLine> {
        self.lines
            .iter()
            .filter(move |line| line.classification == classification)
    }

    /// 是否有低於期望量的葉節點
    pub fn needs_attention(&self) -> bool {
        self.summary.below_minimum + self.summary.between_minimum_and_desired > 0
    }

    /// 是否有任何具名子項目
    pub fn has_sub_items(&self) -> bool {
        self.lines.iter().any(|line| line.id.sub_item.is_some())
    }
}

/// 數量分類器
pub struct EntryClassifier;

impl EntryClassifier {
    /// 分類目錄中的每個葉節點；未輸入者視為 0，未知的輸入會被略過
    pub fn classify(catalog: &Catalog, entries: &Entries) -> Report {
        let mut lines = Vec::with_capacity(catalog.leaf_count());
        let mut summary = ReportSummary::default();

        for leaf in catalog.leaves() {
            let quantity = entries.quantity_or_zero(&leaf.id);
            let classification = leaf.classify(quantity);

            match classification {
                Classification::BelowMinimum => summary.below_minimum += 1,
                Classification::BetweenMinimumAndDesired => {
                    summary.between_minimum_and_desired += 1
                }
                Classification::AtOrAboveDesired => summary.at_or_above_desired += 1,
            }

            lines.push(ReportLine {
                id: leaf.id.clone(),
                quantity,
                min_qty: leaf.min_qty,
                desired_qty: leaf.desired_qty,
                classification,
            });
        }
        summary.total = lines.len();

        let unknown = entries
            .iter()
            .filter(|(id, _)| catalog.leaf(id).is_none())
            .count();
        if unknown > 0 {
            tracing::debug!("略過 {} 筆不在目錄中的輸入", unknown);
        }

        tracing::info!(
            "分類完成：共 {} 項，低於最低量 {} 項，介於最低量與期望量 {} 項",
            summary.total,
            summary.below_minimum,
            summary.between_minimum_and_desired
        );

        Report {
            below_minimum: group_by_section(&lines, Classification::BelowMinimum),
            between_minimum_and_desired: group_by_section(
                &lines,
                Classification::BetweenMinimumAndDesired,
            ),
            lines,
            summary,
        }
    }
}

/// 目錄順序中同區段的資料列相鄰，直接依序分組
fn group_by_section(lines: &[ReportLine], classification: Classification) -> Vec<SectionFindings> {
    let mut groups: Vec<SectionFindings> = Vec::new();

    for line in lines.iter().filter(|l| l.classification == classification) {
        let finding = Finding {
            id: line.id.clone(),
            label: line.id.label(),
            quantity: line.quantity,
            min_qty: line.min_qty,
            desired_qty: line.desired_qty,
        };

        match groups.last_mut() {
            Some(group) if group.section == line.id.section => group.findings.push(finding),
            _ => groups.push(SectionFindings {
                section: line.id.section.clone(),
                findings: vec![finding],
            }),
        }
    }

    groups
}
