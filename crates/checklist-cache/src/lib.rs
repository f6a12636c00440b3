//! # Checklist Cache
//!
//! 目錄緩存與填寫工作階段

pub mod catalog_cache;
pub mod session;

// Re-export 主要類型
pub use catalog_cache::{CatalogCache, CatalogSource};
pub use session::ChecklistSession;
