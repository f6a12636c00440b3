//! 試算表 CSV 讀取

use std::io::Read;

use checklist_core::{ChecklistError, SourceRow};

/// 來源欄位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Section,
    Item,
    SubItem,
    Minimum,
    Desired,
}

impl Column {
    const REQUIRED: [Column; 4] = [Column::Section, Column::Item, Column::Minimum, Column::Desired];

    /// 表頭比對：忽略大小寫、空白、`-` 與 `_`
    fn from_header(header: &str) -> Option<Self> {
        let normalized: String = header
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "section" => Some(Self::Section),
            "item" => Some(Self::Item),
            "subitem" => Some(Self::SubItem),
            "minimum" | "min" | "minqty" => Some(Self::Minimum),
            "desired" | "desiredqty" => Some(Self::Desired),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Section => "Section",
            Self::Item => "Item",
            Self::SubItem => "Sub-Item",
            Self::Minimum => "Minimum",
            Self::Desired => "Desired",
        }
    }
}

/// 欄位位置
#[derive(Debug, Default)]
struct ColumnMap {
    section: Option<usize>,
    item: Option<usize>,
    sub_item: Option<usize>,
    minimum: Option<usize>,
    desired: Option<usize>,
}

impl ColumnMap {
    fn resolve(headers: &csv::StringRecord) -> checklist_core::Result<Self> {
        let mut map = Self::default();

        for (idx, header) in headers.iter().enumerate() {
            let Some(column) = Column::from_header(header) else {
                tracing::debug!("略過未知欄位: {}", header);
                continue;
            };

            let slot = map.slot_mut(column);
            if slot.is_some() {
                return Err(ChecklistError::MalformedInput {
                    line: 1,
                    reason: format!("欄位 {} 重複", column.name()),
                });
            }
            *slot = Some(idx);
        }

        for column in Column::REQUIRED {
            if map.slot(column).is_none() {
                return Err(ChecklistError::MissingColumn(column.name().to_string()));
            }
        }

        Ok(map)
    }

    fn slot(&self, column: Column) -> Option<usize> {
        match column {
            Column::Section => self.section,
            Column::Item => self.item,
            Column::SubItem => self.sub_item,
            Column::Minimum => self.minimum,
            Column::Desired => self.desired,
        }
    }

    fn slot_mut(&mut self, column: Column) -> &mut Option<usize> {
        match column {
            Column::Section => &mut self.section,
            Column::Item => &mut self.item,
            Column::SubItem => &mut self.sub_item,
            Column::Minimum => &mut self.minimum,
            Column::Desired => &mut self.desired,
        }
    }
}

/// 讀取試算表 CSV 匯出為原始資料列
///
/// 必要欄位：Section、Item、Minimum、Desired；Sub-Item 可省略。
/// 缺少必要欄位時回報 `MissingColumn`，不產生任何資料列。全空白列會被略過。
pub fn read_source_rows<R: Read>(reader: R) -> checklist_core::Result<Vec<SourceRow>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers().map_err(csv_error)?.clone();
    let columns = ColumnMap::resolve(&headers)?;

    let mut rows = Vec::new();
    for (idx, result) in csv_reader.records().enumerate() {
        let record = result.map_err(csv_error)?;
        let line = record
            .position()
            .map_or(idx + 2, |pos| pos.line() as usize);

        let field = |slot: Option<usize>| -> Option<String> {
            slot.and_then(|i| record.get(i)).map(str::to_string)
        };

        let row = SourceRow {
            line,
            section: field(columns.section).unwrap_or_default(),
            item: field(columns.item).unwrap_or_default(),
            sub_item: field(columns.sub_item),
            minimum: field(columns.minimum),
            desired: field(columns.desired),
        };

        if row.is_blank() {
            continue;
        }
        rows.push(row);
    }

    tracing::debug!("讀取來源資料列 {} 筆", rows.len());
    Ok(rows)
}

/// 從字串讀取
pub fn read_source_str(text: &str) -> checklist_core::Result<Vec<SourceRow>> {
    read_source_rows(text.as_bytes())
}

fn csv_error(e: csv::Error) -> ChecklistError {
    ChecklistError::Csv(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_read_with_sub_items() {
        let text = "Section,Item,Sub-Item,Minimum,Desired\n\
                    Fridge,Milk,Whole,1,2\n\
                    Fridge,Milk,Skim,1,2\n";
        let rows = read_source_str(text).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].line, 2);
        assert_eq!(rows[0].section, "Fridge");
        assert_eq!(rows[0].sub_item.as_deref(), Some("Whole"));
        assert_eq!(rows[1].minimum.as_deref(), Some("1"));
        assert_eq!(rows[1].desired.as_deref(), Some("2"));
    }

    #[test]
    fn test_read_without_sub_item_column() {
        let text = "Section,Item,MinQty,DesiredQty\nPantry,Rice,2,5\n";
        let rows = read_source_str(text).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].sub_item, None);
        assert_eq!(rows[0].minimum.as_deref(), Some("2"));
    }

    #[rstest]
    #[case("Sub-Item")]
    #[case("Sub-item")]
    #[case("SubItem")]
    #[case("sub item")]
    #[case("SUB_ITEM")]
    fn test_sub_item_header_variants(#[case] header: &str) {
        let text = format!("Section,Item,{},Minimum,Desired\nFridge,Milk,Oat,0,1\n", header);
        let rows = read_source_str(&text).unwrap();

        assert_eq!(rows[0].sub_item.as_deref(), Some("Oat"));
    }

    #[rstest]
    #[case("Item,Minimum,Desired\n", "Section")]
    #[case("Section,Minimum,Desired\n", "Item")]
    #[case("Section,Item,Desired\n", "Minimum")]
    #[case("Section,Item,Sub-Item,Minimum\n", "Desired")]
    fn test_missing_column(#[case] text: &str, #[case] missing: &str) {
        let err = read_source_str(text).unwrap_err();
        assert_eq!(err, ChecklistError::MissingColumn(missing.to_string()));
    }

    #[test]
    fn test_duplicate_header() {
        let err = read_source_str("Section,Item,Sub-Item,Sub-item,Minimum,Desired\n").unwrap_err();
        assert!(matches!(err, ChecklistError::MalformedInput { line: 1, .. }));
    }

    #[test]
    fn test_blank_rows_and_short_rows() {
        let text = "Section,Item,Sub-Item,Minimum,Desired\n\
                    ,,,,\n\
                    Pantry,Salt\n";
        let rows = read_source_str(text).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].item, "Salt");
        assert_eq!(rows[0].minimum, None);
        assert_eq!(rows[0].line, 3);
    }

    #[test]
    fn test_extra_columns_ignored() {
        let text = "Notes,Section,Item,Minimum,Desired\nweekly,Pantry,Rice,2,5\n";
        let rows = read_source_str(text).unwrap();

        assert_eq!(rows[0].section, "Pantry");
        assert_eq!(rows[0].desired.as_deref(), Some("5"));
    }
}
