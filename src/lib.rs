//! # Checklist
//!
//! 庫存清單：試算表資料列 → 目錄 → 數量分類 → CSV 報表

pub use checklist_cache::{CatalogCache, CatalogSource, ChecklistSession};
pub use checklist_calc::{
    CatalogBuilder, EntryClassifier, ExportLayout, Report, SectionCursor, SectionView,
};
pub use checklist_core::{
    Catalog, ChecklistConfig, ChecklistError, Classification, Entries, Leaf, LeafId, Row,
    SourceRow,
};
