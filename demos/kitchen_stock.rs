//! 廚房庫存清單示例
//!
//! 用法：`kitchen-stock <sheet.csv> [config.json] [Section-Item=數量 ...]`

use std::collections::HashMap;

use anyhow::Context;
use checklist::{CatalogCache, ChecklistConfig, ChecklistError, ChecklistSession, Report};

const SAMPLE_SHEET: &str = "\
Section,Item,Sub-Item,Minimum,Desired
Pantry,Rice,,2,5
Pantry,Beans,,1,3
Fridge,Milk,Whole,1,2
Fridge,Milk,Skim,1,2
Freezer,Peas,,1,4
";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1).peekable();

    let sheet = args.next().unwrap_or_else(|| "sample".to_string());

    let config = if args.peek().is_some_and(|arg| arg.ends_with(".json")) {
        let path = args.next().unwrap_or_default();
        let json =
            std::fs::read_to_string(&path).with_context(|| format!("無法讀取配置: {}", path))?;
        ChecklistConfig::from_json(&json)?
    } else {
        ChecklistConfig::default()
    };

    let mut form = HashMap::new();
    for arg in args {
        let (key, value) = arg
            .split_once('=')
            .with_context(|| format!("輸入格式應為 key=數量: {}", arg))?;
        let value: i64 = value
            .trim()
            .parse()
            .with_context(|| format!("數量不是整數: {}", arg))?;
        form.insert(key.trim().to_string(), value);
    }

    let source = |url: &str| -> checklist_core::Result<String> {
        if url == "sample" {
            return Ok(SAMPLE_SHEET.to_string());
        }
        std::fs::read_to_string(url).map_err(|e| ChecklistError::Source(format!("{}: {}", url, e)))
    };

    println!("=== {} ===\n", config.title);

    let mut cache = CatalogCache::new(source, config.clone());
    let catalog = cache.load(&sheet, chrono::Utc::now())?;

    let mut session = ChecklistSession::new(catalog, config);
    session.record_form(&form)?;

    loop {
        let Some(view) = session.render_current() else {
            break;
        };
        println!("[{}/{}] {}", view.position, view.total, view.section);
        for field in &view.fields {
            println!(
                "  {:<24} {:>4}  (最低 {}, 期望 {})",
                field.label, field.value, field.min_qty, field.desired_qty
            );
        }
        if view.is_last() {
            break;
        }
        session.advance();
    }

    let report = session.submit();
    print_report(&report);

    let (file_name, csv) = session.export()?;
    std::fs::write(&file_name, csv).with_context(|| format!("無法寫入 {}", file_name))?;
    println!("\n報表已匯出: {}", file_name);

    Ok(())
}

fn print_report(report: &Report) {
    println!("\n低於最低量:");
    for group in &report.below_minimum {
        println!("  {}", group.section);
        for finding in &group.findings {
            println!(
                "    {}: {} (最低 {})",
                finding.label, finding.quantity, finding.min_qty
            );
        }
    }

    println!("\n介於最低量與期望量之間:");
    for group in &report.between_minimum_and_desired {
        println!("  {}", group.section);
        for finding in &group.findings {
            println!(
                "    {}: {} (期望 {})",
                finding.label, finding.quantity, finding.desired_qty
            );
        }
    }

    match serde_json::to_string(&report.summary) {
        Ok(json) => tracing::debug!("報表摘要: {}", json),
        Err(e) => tracing::warn!("無法序列化摘要: {}", e),
    }
}
