//! 集成測試

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use checklist::*;
use checklist_calc::{read_export_csv, read_source_str, report_to_csv_string};
use chrono::TimeZone;
use proptest::prelude::*;
use rstest::rstest;
use rust_decimal::Decimal;

const KITCHEN_SHEET: &str = "\
Section,Item,Sub-item,Minimum,Desired
Pantry,Rice,,2,5
Pantry,Beans,,1,3
Fridge,Milk,Whole,1,2
Fridge,Milk,Skim,1,2
Pantry,Flour,,1,1
";

fn kitchen_catalog() -> Catalog {
    let rows = read_source_str(KITCHEN_SHEET).unwrap();
    CatalogBuilder::default().build(rows).unwrap()
}

#[test]
fn test_sheet_to_report() {
    // 場景：從試算表 CSV 建立目錄，輸入數量後產生報表
    let catalog = kitchen_catalog();

    let sections: Vec<_> = catalog.sections().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(sections, vec!["Pantry", "Fridge"]);
    assert_eq!(catalog.leaf_count(), 5);

    let form = HashMap::from([
        ("Pantry-Rice".to_string(), 1),
        ("Pantry-Beans".to_string(), 2),
        ("Fridge-Milk-Whole".to_string(), 0),
        ("Fridge-Milk-Skim".to_string(), 3),
        ("Pantry-Flour".to_string(), 1),
    ]);
    let entries =
        Entries::from_form(&catalog, &form, checklist_core::NegativeQuantityPolicy::Reject)
            .unwrap();
    let report = EntryClassifier::classify(&catalog, &entries);

    // 低於最低量：Pantry/Rice、Fridge/Milk - Whole
    assert_eq!(report.below_minimum.len(), 2);
    assert_eq!(report.below_minimum[0].section, "Pantry");
    assert_eq!(report.below_minimum[0].findings[0].label, "Rice");
    assert_eq!(report.below_minimum[0].findings[0].min_qty, Decimal::from(2));
    assert_eq!(report.below_minimum[1].findings[0].label, "Milk - Whole");

    // 介於之間：只有 Beans
    assert_eq!(report.between_minimum_and_desired.len(), 1);
    assert_eq!(report.between_minimum_and_desired[0].findings[0].label, "Beans");

    // Flour 最低量 == 期望量 == 1
    let flour = report
        .lines
        .iter()
        .find(|line| line.id.item == "Flour")
        .unwrap();
    assert_eq!(flour.classification, Classification::AtOrAboveDesired);

    assert_eq!(report.summary.total, 5);
    assert_eq!(report.summary.at_or_above_desired, 2);
}

#[test]
fn test_export_round_trip_preserves_order() {
    let catalog = kitchen_catalog();
    let entries = Entries::new().with(LeafId::with_sub_item("Fridge", "Milk", "Skim"), 4);
    let report = EntryClassifier::classify(&catalog, &entries);

    let csv = report_to_csv_string(&report, ExportLayout::for_catalog(&catalog)).unwrap();
    assert!(csv.starts_with("Section,Item,Sub-Item,Quantity\n"));

    let rows = read_export_csv(csv.as_bytes()).unwrap();
    let tuples: Vec<_> = rows
        .iter()
        .map(|r| (r.section.as_str(), r.item.as_str(), r.sub_item.as_str(), r.quantity))
        .collect();

    assert_eq!(
        tuples,
        vec![
            ("Pantry", "Rice", "", 0),
            ("Pantry", "Beans", "", 0),
            ("Pantry", "Flour", "", 0),
            ("Fridge", "Milk", "Whole", 0),
            ("Fridge", "Milk", "Skim", 4),
        ]
    );
}

#[rstest]
#[case("Section,Item,Sub-Item,Minimum,Desired\nPantry,Rice,,abc,5\n")]
#[case("Section,Item,Sub-Item,Minimum,Desired\nPantry,,,1,5\n")]
#[case("Section,Item,Sub-Item,Minimum,Desired\nPantry,Rice,,1,\n")]
fn test_malformed_sheet_aborts(#[case] sheet: &str) {
    let rows = read_source_str(sheet).unwrap();
    let err = CatalogBuilder::default().build(rows).unwrap_err();

    assert!(matches!(err, ChecklistError::MalformedInput { line: 2, .. }));
}

#[test]
fn test_sheet_with_colliding_form_keys_aborts() {
    let sheet = "Section,Item,Sub-Item,Minimum,Desired\nFridge,Milk-Skim,,1,2\nFridge,Milk,Skim,5,9\n";
    let rows = read_source_str(sheet).unwrap();
    let err = CatalogBuilder::default().build(rows).unwrap_err();

    assert!(matches!(err, ChecklistError::MalformedInput { line: 3, .. }));
}

#[test]
fn test_missing_column_aborts_before_rows() {
    let err = read_source_str("Section,Item,Desired\nPantry,Rice,5\n").unwrap_err();
    assert_eq!(err, ChecklistError::MissingColumn("Minimum".to_string()));
}

#[test]
fn test_cached_catalog_shared_across_threads() {
    let source = |_: &str| -> checklist_core::Result<String> { Ok(KITCHEN_SHEET.to_string()) };
    let mut cache = CatalogCache::new(source, ChecklistConfig::default());
    let now = chrono::Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    let catalog = cache.load("kitchen", now).unwrap();

    // 每個請求獨立分類，共用唯讀目錄
    let reports: Vec<Report> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4u32)
            .map(|qty| {
                let catalog = Arc::clone(&catalog);
                scope.spawn(move || {
                    let mut entries = Entries::new();
                    for leaf in catalog.leaves() {
                        entries.set(leaf.id.clone(), qty);
                    }
                    EntryClassifier::classify(&catalog, &entries)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(reports.len(), 4);
    assert_eq!(reports[0].summary.below_minimum, 5);
    assert_eq!(reports[3].summary.at_or_above_desired, 4);
    assert_eq!(catalog.leaf_count(), 5);
}

#[test]
fn test_session_flow() {
    let catalog = Arc::new(kitchen_catalog());
    let mut session = ChecklistSession::new(catalog, ChecklistConfig::default());

    let first = session.render_current().unwrap();
    assert_eq!(first.section, "Pantry");
    assert_eq!(first.fields.len(), 3);
    assert_eq!(first.fields[0].value, 2);

    session.record("Pantry-Rice", 0).unwrap();
    session.advance();

    let second = session.render_current().unwrap();
    assert!(second.is_last());
    session.record("Fridge-Milk-Skim", 2).unwrap();

    let report = session.submit();
    assert_eq!(report.summary.below_minimum, 1);
    assert_eq!(report.below_minimum[0].findings[0].label, "Rice");
}

fn rows_strategy() -> impl Strategy<Value = Vec<(u8, u8, Option<u8>, u8, u8)>> {
    prop::collection::vec(
        (0u8..3, 0u8..4, prop::option::of(0u8..3), 0u8..5, 0u8..5),
        0..30,
    )
}

proptest! {
    #[test]
    fn prop_leaf_count_matches_distinct_combinations(raw in rows_strategy()) {
        // 門檻由 (區段, 品項, 子項目) 決定，重複列必定相同
        let rows: Vec<Row> = raw
            .iter()
            .map(|&(s, i, sub, _, _)| {
                let sub_name = sub.map(|v| format!("sub-{}", v));
                let min = (s + i) % 3;
                let desired = min + sub.unwrap_or(0);
                Row::new(
                    format!("section-{}", s),
                    format!("item-{}", i),
                    sub_name.as_deref(),
                    Decimal::from(min),
                    Decimal::from(desired),
                )
            })
            .collect();

        let distinct: HashSet<_> = rows.iter().map(Row::leaf_id).collect();

        let config = ChecklistConfig::default()
            .with_mixed_item_policy(checklist_core::MixedItemPolicy::KeepDistinct);
        let catalog = CatalogBuilder::new(config).build_rows(rows).unwrap();

        prop_assert_eq!(catalog.leaf_count(), distinct.len());
    }
}
