//! # Checklist Calculation
//!
//! 目錄建立、數量分類、CSV 讀寫與分頁

pub mod builder;
pub mod classifier;
pub mod export;
pub mod paging;
pub mod source;

// Re-export 主要類型
pub use builder::CatalogBuilder;
pub use classifier::{EntryClassifier, Finding, Report, ReportLine, ReportSummary, SectionFindings};
pub use export::{read_export_csv, report_to_csv_string, write_report_csv, ExportLayout, ExportRow};
pub use paging::{render_section, FieldView, SectionCursor, SectionView};
pub use source::{read_source_rows, read_source_str};
