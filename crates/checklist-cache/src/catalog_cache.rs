//! 目錄緩存（依來源網址、限時）

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use checklist_calc::{read_source_str, CatalogBuilder};
use checklist_core::{Catalog, ChecklistConfig, ChecklistError};

/// 試算表來源：回傳 CSV 文字，傳輸方式由呼叫端決定
pub trait CatalogSource {
    fn fetch(&self, url: &str) -> checklist_core::Result<String>;
}

impl<F> CatalogSource for F
where
    F: Fn(&str) -> checklist_core::Result<String>,
{
    fn fetch(&self, url: &str) -> checklist_core::Result<String> {
        self(url)
    }
}

/// 緩存項目
#[derive(Debug, Clone)]
struct CachedCatalog {
    loaded_at: DateTime<Utc>,
    catalog: Arc<Catalog>,
}

/// 目錄緩存
///
/// 每個網址的目錄在 `cache_ttl_secs` 內重複使用，過期後重新讀取。
/// 載入失敗不會寫入緩存。
pub struct CatalogCache<S: CatalogSource> {
    source: S,
    config: ChecklistConfig,
    entries: HashMap<String, CachedCatalog>,
}

impl<S: CatalogSource> CatalogCache<S> {
    /// 創建新的緩存
    pub fn new(source: S, config: ChecklistConfig) -> Self {
        Self {
            source,
            config,
            entries: HashMap::new(),
        }
    }

    pub fn config(&self) -> &ChecklistConfig {
        &self.config
    }

    /// 載入目錄（緩存有效時直接回傳）
    pub fn load(&mut self, url: &str, now: DateTime<Utc>) -> checklist_core::Result<Arc<Catalog>> {
        self.evict_expired(now);

        if let Some(cached) = self.entries.get(url) {
            tracing::debug!("目錄緩存命中: {}", url);
            return Ok(Arc::clone(&cached.catalog));
        }

        tracing::info!("讀取試算表: {}", url);
        let text = self.source.fetch(url)?;
        let rows = read_source_str(&text)?;
        let catalog = Arc::new(CatalogBuilder::new(self.config.clone()).build(rows)?);

        self.entries.insert(
            url.to_string(),
            CachedCatalog {
                loaded_at: now,
                catalog: Arc::clone(&catalog),
            },
        );

        Ok(catalog)
    }

    /// 載入配置中的來源網址
    pub fn load_configured(&mut self, now: DateTime<Utc>) -> checklist_core::Result<Arc<Catalog>> {
        let url = self
            .config
            .source_url
            .clone()
            .ok_or_else(|| ChecklistError::Config("未設置 source_url".to_string()))?;
        self.load(&url, now)
    }

    /// 緩存是否仍有效
    pub fn is_fresh(&self, url: &str, now: DateTime<Utc>) -> bool {
        self.entries
            .get(url)
            .is_some_and(|cached| within_ttl(cached.loaded_at, now, self.config.cache_ttl_secs))
    }

    /// 移除所有過期的緩存
    fn evict_expired(&mut self, now: DateTime<Utc>) {
        let ttl_secs = self.config.cache_ttl_secs;
        let before = self.entries.len();
        self.entries
            .retain(|_, cached| within_ttl(cached.loaded_at, now, ttl_secs));

        let evicted = before - self.entries.len();
        if evicted > 0 {
            tracing::debug!("移除過期目錄緩存 {} 筆", evicted);
        }
    }

    /// 清除單一網址的緩存
    pub fn invalidate(&mut self, url: &str) -> bool {
        self.entries.remove(url).is_some()
    }

    /// 清除所有緩存
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn within_ttl(loaded_at: DateTime<Utc>, now: DateTime<Utc>, ttl_secs: u64) -> bool {
    let age = now.signed_duration_since(loaded_at).num_seconds();
    age >= 0 && (age as u64) < ttl_secs
}
