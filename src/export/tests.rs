#![allow(clippy::unwrap_used)]

use super::*;
use crate::models::ExpenseInput;
use rust_decimal_macros::dec;

fn seed(db: &Database) {
    let rows = [
        ("2024-01-10", "Cement", dec!(10), "bags", dec!(50), dec!(600)),
        ("2024-02-03", "Cement", dec!(5), "bags", dec!(50), dec!(200)),
        ("2024-02-14", "Steel", dec!(2), "tons", dec!(1000), dec!(2000)),
    ];
    for (date, category, quantity, unit, price, paid) in rows {
        db.create_expense(&ExpenseInput {
            date: Some(date.into()),
            category: Some(category.into()),
            quantity: Some(quantity),
            unit_type: Some(unit.into()),
            unit_price: Some(price),
            amount_paid: Some(paid),
            ..Default::default()
        })
        .unwrap();
    }
}

fn read_rows(path: &Path) -> Vec<Vec<String>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .unwrap();
    rdr.records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect()
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
}

#[test]
fn test_report_stem() {
    assert_eq!(report_stem(date()), "construction_expense_report_2024_03_05");
    assert_eq!(
        material_summary_file_name(date()),
        "material_summary_2024-03-05.csv"
    );
}

#[test]
fn test_full_report_writes_four_sheets() {
    let db = Database::open_in_memory().unwrap();
    seed(&db);
    let dir = tempfile::tempdir().unwrap();

    let files = export_full_report(&db, dir.path(), "PKR", date()).unwrap();
    assert_eq!(files.expense_count, 3);
    for path in files.all() {
        assert!(path.exists(), "missing {}", path.display());
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("construction_expense_report_2024_03_05_"));
    }
}

#[test]
fn test_summary_sheet() {
    let db = Database::open_in_memory().unwrap();
    seed(&db);
    let dir = tempfile::tempdir().unwrap();
    let files = export_full_report(&db, dir.path(), "PKR", date()).unwrap();

    let rows = read_rows(&files.summary);
    assert_eq!(rows[0], ["Metric", "Value", "Currency"]);
    assert_eq!(rows[1], ["Total Cost", "2750.00", "PKR"]);
    assert_eq!(rows[2], ["Total Paid", "2800.00", "PKR"]);
    assert_eq!(rows[3], ["Remaining Balance", "-50.00", "PKR"]);
    assert_eq!(rows[4], ["Total Advance", "100.00", "PKR"]);
    assert_eq!(rows[5], ["Total Entries", "3", ""]);
    assert_eq!(rows[6], ["Advance Entries", "1", ""]);
}

#[test]
fn test_expense_sheet_carries_derived_columns() {
    let db = Database::open_in_memory().unwrap();
    seed(&db);
    let dir = tempfile::tempdir().unwrap();
    let files = export_full_report(&db, dir.path(), "PKR", date()).unwrap();

    let rows = read_rows(&files.expenses);
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0][0], "ID");
    assert_eq!(rows[0][11], "Advance Note");

    // newest first
    let steel = &rows[1];
    assert_eq!(steel[2], "Steel");
    assert_eq!(steel[3], "-");
    assert_eq!(steel[9], "0.00");
    assert_eq!(steel[10], "Paid");
    assert_eq!(steel[11], "-");

    let advance = &rows[3];
    assert_eq!(advance[1], "2024-01-10");
    assert_eq!(advance[7], "500.00");
    assert_eq!(advance[9], "-100.00");
    assert_eq!(advance[10], "Advance");
    assert_eq!(advance[11], "Advance payment");
}

#[test]
fn test_material_sheet_headers_use_currency() {
    let db = Database::open_in_memory().unwrap();
    seed(&db);
    let dir = tempfile::tempdir().unwrap();
    let files = export_full_report(&db, dir.path(), "USD", date()).unwrap();

    let rows = read_rows(&files.materials);
    assert_eq!(rows[0][4], "Total Cost (USD)");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1][0], "Cement");
    assert_eq!(rows[1][1], "15.00");
}

#[test]
fn test_category_sheet_sorted_by_cost() {
    let db = Database::open_in_memory().unwrap();
    seed(&db);
    let dir = tempfile::tempdir().unwrap();
    let files = export_full_report(&db, dir.path(), "PKR", date()).unwrap();

    let rows = read_rows(&files.categories);
    assert_eq!(rows[1][0], "Steel");
    assert_eq!(rows[2][0], "Cement");
    assert_eq!(rows[2][6], "-50.00");
}

#[test]
fn test_material_summary_grand_total() {
    let db = Database::open_in_memory().unwrap();
    seed(&db);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("materials.csv");

    let count = export_material_summary(&db, &path, "PKR").unwrap();
    assert_eq!(count, 2);

    let rows = read_rows(&path);
    assert_eq!(rows.len(), 5);
    assert!(rows[3].iter().all(String::is_empty));
    assert_eq!(
        rows[4],
        ["GRAND TOTAL", "17.00", "", "3", "2750.00", "2800.00", "100.00"]
    );
}

#[test]
fn test_material_summary_empty_store() {
    let db = Database::open_in_memory().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("materials.csv");

    assert_eq!(export_material_summary(&db, &path, "PKR").unwrap(), 0);
    let rows = read_rows(&path);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[2][0], "GRAND TOTAL");
    assert_eq!(rows[2][4], "0.00");
}

#[test]
fn test_exports_are_logged() {
    let db = Database::open_in_memory().unwrap();
    seed(&db);
    let dir = tempfile::tempdir().unwrap();

    export_full_report(&db, dir.path(), "PKR", date()).unwrap();
    export_material_summary(&db, &dir.path().join("m.csv"), "PKR").unwrap();

    let log = db.get_report_downloads().unwrap();
    assert_eq!(log.len(), 2);
    assert!(log.iter().all(|d| d.file_format == "csv"));
    let kinds: Vec<_> = log.iter().map(|d| d.report_type.as_str()).collect();
    assert!(kinds.contains(&"full_report"));
    assert!(kinds.contains(&"material_summary"));
}

#[test]
fn test_failed_export_is_not_logged() {
    let db = Database::open_in_memory().unwrap();
    let file = tempfile::NamedTempFile::new().unwrap();
    // a file where a directory is expected
    let result = export_full_report(&db, file.path(), "PKR", date());
    assert!(result.is_err());
    assert!(db.get_report_downloads().unwrap().is_empty());
}
