#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;

fn entry(
    id: i64,
    date: &str,
    category: &str,
    unit_type: &str,
    quantity: Decimal,
    unit_price: Decimal,
    amount_paid: Decimal,
) -> Expense {
    Expense {
        id,
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        category: category.into(),
        description: String::new(),
        quantity,
        unit_type: unit_type.into(),
        unit_price,
        amount_paid,
        advance_note: None,
        notes: String::new(),
        created_at: String::new(),
        updated_at: String::new(),
    }
}

fn site_entries() -> Vec<Expense> {
    vec![
        // Cement: one advance (-100), one pending (+50)
        entry(1, "2024-01-10", "Cement", "bags", dec!(10), dec!(50), dec!(600)),
        entry(2, "2024-02-03", "Cement", "bags", dec!(5), dec!(50), dec!(200)),
        // Steel: fully paid
        entry(3, "2024-02-14", "Steel", "tons", dec!(2), dec!(1000), dec!(2000)),
        // Bricks: large quantity, pending
        entry(4, "2024-02-20", "Bricks", "pcs", dec!(5000), dec!(0.5), dec!(1000)),
        // Sand: advance of 25.50
        entry(5, "2024-03-01", "Sand", "cft", dec!(100), dec!(4.5), dec!(475.5)),
    ]
}

// ── material_totals ───────────────────────────────────────────

#[test]
fn test_material_advance_is_not_netted() {
    let rows = material_totals(&site_entries()).unwrap();
    let cement = rows.iter().find(|r| r.category == "Cement").unwrap();
    assert_eq!(cement.entry_count, 2);
    assert_eq!(cement.total_quantity, dec!(15));
    assert_eq!(cement.total_cost, dec!(750));
    assert_eq!(cement.total_paid, dec!(800));
    // -100 and +50 must not cancel to -50 or clamp to 0
    assert_eq!(cement.total_advance, dec!(100));
}

#[test]
fn test_material_totals_ordered_by_quantity() {
    let rows = material_totals(&site_entries()).unwrap();
    let order: Vec<&str> = rows.iter().map(|r| r.category.as_str()).collect();
    assert_eq!(order, vec!["Bricks", "Sand", "Cement", "Steel"]);
}

#[test]
fn test_material_grouped_by_unit_type_too() {
    let entries = vec![
        entry(1, "2024-01-01", "Sand", "cft", dec!(10), dec!(5), dec!(50)),
        entry(2, "2024-01-02", "Sand", "truck", dec!(1), dec!(9000), dec!(9000)),
    ];
    let rows = material_totals(&entries).unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.category == "Sand" && r.entry_count == 1));
}

#[test]
fn test_material_grouping_ignores_case() {
    let entries = vec![
        entry(2, "2024-01-02", "cement", "Bags", dec!(5), dec!(50), dec!(250)),
        entry(1, "2024-01-01", "Cement", "bags", dec!(10), dec!(50), dec!(500)),
    ];
    let rows = material_totals(&entries).unwrap();
    assert_eq!(rows.len(), 1);
    // Newest entry comes first from the store, so its spelling is shown
    assert_eq!(rows[0].category, "cement");
    assert_eq!(rows[0].unit_type, "Bags");
    assert_eq!(rows[0].entry_count, 2);
    assert_eq!(rows[0].total_quantity, dec!(15));

    let categories = by_category(&entries).unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].total_expense, dec!(750));
}

#[test]
fn test_material_totals_empty() {
    assert!(material_totals(&[]).unwrap().is_empty());
}

// ── summary ───────────────────────────────────────────────────

#[test]
fn test_summary_totals() {
    let s = summary(&site_entries()).unwrap();
    assert_eq!(s.total_entries, 5);
    assert_eq!(s.total_cost, dec!(500) + dec!(250) + dec!(2000) + dec!(2500) + dec!(450));
    assert_eq!(s.total_paid, dec!(600) + dec!(200) + dec!(2000) + dec!(1000) + dec!(475.5));
    assert_eq!(s.remaining_balance, s.total_cost - s.total_paid);
    assert_eq!(s.total_advance, dec!(125.5));
    assert_eq!(s.advance_entries, 2);
}

#[test]
fn test_summary_advance_matches_overpayment_sum() {
    let entries = site_entries();
    let expected: Decimal = entries
        .iter()
        .map(|e| (e.amount_paid - e.quantity * e.unit_price).max(Decimal::ZERO))
        .sum();
    assert_eq!(summary(&entries).unwrap().total_advance, expected);

    let mut reversed = entries.clone();
    reversed.reverse();
    assert_eq!(summary(&reversed).unwrap(), summary(&entries).unwrap());
}

#[test]
fn test_totals_overflow_is_an_error() {
    let huge = Decimal::MAX / dec!(2);
    let entries: Vec<Expense> = (1..=3)
        .map(|id| entry(id, "2024-01-01", "Steel", "tons", huge, dec!(1), dec!(0)))
        .collect();
    assert!(matches!(summary(&entries), Err(LedgerError::Overflow(_))));
    assert!(matches!(material_totals(&entries), Err(LedgerError::Overflow(_))));
    assert!(matches!(monthly(&entries), Err(LedgerError::Overflow(_))));
    assert!(dashboard(&entries).is_err());
}

#[test]
fn test_summary_empty() {
    let s = summary(&[]).unwrap();
    assert_eq!(s, Summary::default());
    assert_eq!(s.total_cost, Decimal::ZERO);
}

// ── monthly ───────────────────────────────────────────────────

#[test]
fn test_monthly_newest_first() {
    let rows = monthly(&site_entries()).unwrap();
    let months: Vec<&str> = rows.iter().map(|r| r.month.as_str()).collect();
    assert_eq!(months, vec!["2024-03", "2024-02", "2024-01"]);

    let feb = &rows[1];
    assert_eq!(feb.entry_count, 3);
    assert_eq!(feb.total_expense, dec!(250) + dec!(2000) + dec!(2500));
    assert_eq!(feb.total_advance, Decimal::ZERO);

    let jan = &rows[2];
    assert_eq!(jan.total_advance, dec!(100));
}

#[test]
fn test_monthly_capped_to_window() {
    let entries: Vec<Expense> = (1..=15)
        .map(|i| {
            let year = 2023 + (i - 1) / 12;
            let month = (i - 1) % 12 + 1;
            entry(
                i,
                &format!("{year}-{month:02}-15"),
                "Cement",
                "bags",
                dec!(1),
                dec!(10),
                dec!(10),
            )
        })
        .collect();
    let rows = monthly(&entries).unwrap();
    assert_eq!(rows.len(), MONTHLY_WINDOW);
    assert_eq!(rows[0].month, "2024-03");
    assert_eq!(rows[MONTHLY_WINDOW - 1].month, "2023-04");
}

// ── by_category ───────────────────────────────────────────────

#[test]
fn test_by_category_ordered_by_expense() {
    let rows = by_category(&site_entries()).unwrap();
    let order: Vec<&str> = rows.iter().map(|r| r.category.as_str()).collect();
    assert_eq!(order, vec!["Bricks", "Steel", "Cement", "Sand"]);

    let cement = &rows[2];
    // Net balance nets, advance does not
    assert_eq!(cement.remaining_balance, dec!(-50));
    assert_eq!(cement.total_advance, dec!(100));
    assert_eq!(cement.unit_type, "bags");
}

#[test]
fn test_dashboard_bundles_views() {
    let entries = site_entries();
    let d = dashboard(&entries).unwrap();
    assert_eq!(d.summary, summary(&entries).unwrap());
    assert_eq!(d.monthly, monthly(&entries).unwrap());
    assert_eq!(d.categories, by_category(&entries).unwrap());
}
