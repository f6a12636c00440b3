//! CSV 匯出

use std::io::{Read, Write};

use checklist_core::{Catalog, ChecklistError};
use serde::{Deserialize, Serialize};

use crate::classifier::Report;

/// 匯出的一列：(區段, 品項, 子項目或空字串, 數量)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
    #[serde(rename = "Section")]
    pub section: String,
    #[serde(rename = "Item")]
    pub item: String,
    #[serde(rename = "Sub-Item", default)]
    pub sub_item: String,
    #[serde(rename = "Quantity")]
    pub quantity: u32,
}

/// 匯出欄位配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportLayout {
    /// Section,Item,Sub-Item,Quantity
    WithSubItems,
    /// Section,Item,Quantity
    ItemsOnly,
}

impl ExportLayout {
    /// 目錄沒有任何子項目時省略 Sub-Item 欄
    pub fn for_catalog(catalog: &Catalog) -> Self {
        if catalog.has_sub_items() {
            Self::WithSubItems
        } else {
            Self::ItemsOnly
        }
    }

    /// 依報表內容決定欄位
    pub fn for_report(report: &Report) -> Self {
        if report.has_sub_items() {
            Self::WithSubItems
        } else {
            Self::ItemsOnly
        }
    }

    pub fn header(&self) -> &'static [&'static str] {
        match self {
            Self::WithSubItems => &["Section", "Item", "Sub-Item", "Quantity"],
            Self::ItemsOnly => &["Section", "Item", "Quantity"],
        }
    }
}

/// 寫出報表 CSV
///
/// 報表含子項目時不可使用 `ItemsOnly`，否則同一品項會寫出無法區分的多列。
pub fn write_report_csv<W: Write>(
    report: &Report,
    layout: ExportLayout,
    writer: W,
) -> checklist_core::Result<()> {
    if layout == ExportLayout::ItemsOnly && report.has_sub_items() {
        return Err(ChecklistError::Csv(
            "報表含子項目，匯出格式必須包含 Sub-Item 欄".to_string(),
        ));
    }

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(layout.header()).map_err(csv_error)?;

    for row in report.export_rows() {
        let quantity = row.quantity.to_string();
        let written = match layout {
            ExportLayout::WithSubItems => {
                csv_writer.write_record([
                    row.section.as_str(),
                    row.item.as_str(),
                    row.sub_item.as_str(),
                    quantity.as_str(),
                ])
            }
            ExportLayout::ItemsOnly => {
                csv_writer.write_record([row.section.as_str(), row.item.as_str(), quantity.as_str()])
            }
        };
        written.map_err(csv_error)?;
    }

    csv_writer
        .flush()
        .map_err(|e| ChecklistError::Csv(e.to_string()))?;
    Ok(())
}

/// 報表 CSV 字串
pub fn report_to_csv_string(report: &Report, layout: ExportLayout) -> checklist_core::Result<String> {
    let mut buffer = Vec::new();
    write_report_csv(report, layout, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| ChecklistError::Csv(e.to_string()))
}

/// 讀回匯出的 CSV（兩種欄位配置皆可）
pub fn read_export_csv<R: Read>(reader: R) -> checklist_core::Result<Vec<ExportRow>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (line_num, result) in csv_reader.deserialize().enumerate() {
        let row: ExportRow = result.map_err(|e| ChecklistError::MalformedInput {
            line: line_num + 2,
            reason: e.to_string(),
        })?;
        rows.push(row);
    }

    Ok(rows)
}

fn csv_error(e: csv::Error) -> ChecklistError {
    ChecklistError::Csv(e.to_string())
}
