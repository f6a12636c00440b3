//! 逐區段分頁

use checklist_core::{Catalog, DefaultQuantity, Entries, LeafId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 由呼叫端持有的區段游標
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionCursor {
    pub index: usize,
}

impl SectionCursor {
    pub fn first() -> Self {
        Self { index: 0 }
    }

    /// 下一個區段；已在最後一個區段時不變
    pub fn next(self, catalog: &Catalog) -> Self {
        if self.is_last(catalog) {
            self
        } else {
            Self {
                index: self.index + 1,
            }
        }
    }

    /// 上一個區段；已在第一個區段時不變
    pub fn previous(self) -> Self {
        Self {
            index: self.index.saturating_sub(1),
        }
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self, catalog: &Catalog) -> bool {
        self.index + 1 >= catalog.section_count()
    }
}

/// 單一輸入欄位
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldView {
    pub id: LeafId,
    pub key: String,
    pub label: String,
    /// 已輸入的數量，未輸入時為初始值
    pub value: u32,
    pub min_qty: Decimal,
    pub desired_qty: Decimal,
}

/// 一個區段的畫面資料
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionView {
    pub section: String,
    /// 從 1 起算
    pub position: usize,
    pub total: usize,
    pub fields: Vec<FieldView>,
}

impl SectionView {
    pub fn is_last(&self) -> bool {
        self.position == self.total
    }
}

/// 產生游標所指區段的畫面資料；游標超出範圍時回傳 `None`
pub fn render_section(
    catalog: &Catalog,
    cursor: SectionCursor,
    entries: &Entries,
    default_quantity: DefaultQuantity,
) -> Option<SectionView> {
    let section = catalog.sections().get(cursor.index)?;

    let fields = section
        .leaves()
        .map(|leaf| FieldView {
            id: leaf.id.clone(),
            key: leaf.id.form_key(),
            label: leaf.id.label(),
            value: entries
                .get(&leaf.id)
                .unwrap_or_else(|| leaf.default_quantity(default_quantity)),
            min_qty: leaf.min_qty,
            desired_qty: leaf.desired_qty,
        })
        .collect();

    Some(SectionView {
        section: section.name.clone(),
        position: cursor.index + 1,
        total: catalog.section_count(),
        fields,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::CatalogBuilder;
    use checklist_core::Row;

    fn catalog() -> Catalog {
        let row = |section: &str, item: &str, min: i64, desired: i64| {
            Row::new(section, item, None, Decimal::from(min), Decimal::from(desired))
        };
        CatalogBuilder::default()
            .build_rows(vec![
                row("Pantry", "Rice", 2, 5),
                row("Pantry", "Beans", 1, 3),
                row("Fridge", "Eggs", 6, 12),
            ])
            .unwrap()
    }

    #[test]
    fn test_cursor_saturates() {
        let catalog = catalog();
        let cursor = SectionCursor::first();

        assert!(cursor.is_first());
        assert_eq!(cursor.previous(), cursor);

        let last = cursor.next(&catalog);
        assert_eq!(last.index, 1);
        assert!(last.is_last(&catalog));
        assert_eq!(last.next(&catalog), last);
    }

    #[test]
    fn test_render_uses_defaults_and_entries() {
        let catalog = catalog();
        let entries = Entries::new().with(LeafId::item_only("Pantry", "Beans"), 7);

        let view = render_section(
            &catalog,
            SectionCursor::first(),
            &entries,
            DefaultQuantity::Minimum,
        )
        .unwrap();

        assert_eq!(view.section, "Pantry");
        assert_eq!(view.position, 1);
        assert_eq!(view.total, 2);
        assert!(!view.is_last());
        assert_eq!(view.fields[0].key, "Pantry-Rice");
        assert_eq!(view.fields[0].value, 2);
        assert_eq!(view.fields[1].value, 7);
    }

    #[test]
    fn test_render_zero_default() {
        let catalog = catalog();
        let view = render_section(
            &catalog,
            SectionCursor { index: 1 },
            &Entries::new(),
            DefaultQuantity::Zero,
        )
        .unwrap();

        assert!(view.is_last());
        assert_eq!(view.fields.len(), 1);
        assert_eq!(view.fields[0].value, 0);
    }

    #[test]
    fn test_render_out_of_range() {
        let catalog = catalog();
        let view = render_section(
            &catalog,
            SectionCursor { index: 5 },
            &Entries::new(),
            DefaultQuantity::Minimum,
        );

        assert!(view.is_none());
    }
}
