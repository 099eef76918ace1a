#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;
use tempfile::TempDir;

use super::*;
use crate::ledger::PaymentStatus;

const CEMENT: &str = "date=2024-01-10 category=Cement qty=10 unit=bags price=50 paid=600";
const STEEL: &str = "date=2024-02-14 category=Steel qty=2 unit=tons price=1000 paid=1500";

fn setup() -> (App, Database, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let app = App::new("PKR".into(), dir.path().to_path_buf());
    let db = Database::open_in_memory().unwrap();
    (app, db, dir)
}

fn run(input: &str, app: &mut App, db: &mut Database) {
    handle_command(input, app, db).unwrap();
}

#[test]
fn test_add_creates_expense() {
    let (mut app, mut db, _dir) = setup();
    run(&format!("add {CEMENT}"), &mut app, &mut db);

    assert!(app.status_message.starts_with("Added #1 Cement"));
    assert!(app.status_message.contains("PKR 500.00"));
    assert_eq!(app.expense_count, 1);
    assert_eq!(app.dashboard.summary.total_advance, dec!(100));
}

#[test]
fn test_add_without_args_shows_usage() {
    let (mut app, mut db, _dir) = setup();
    run("add", &mut app, &mut db);
    assert!(app.status_message.starts_with("Usage: :add"));
    assert_eq!(db.get_expense_count().unwrap(), 0);
}

#[test]
fn test_add_validation_error_goes_to_status() {
    let (mut app, mut db, _dir) = setup();
    run(
        "add date=2024-01-10 category=Cement qty=0 unit=bags price=50",
        &mut app,
        &mut db,
    );
    assert_eq!(app.status_message, "Error: Valid quantity is required");
    assert!(app.running);
    assert_eq!(db.get_expense_count().unwrap(), 0);
}

#[test]
fn test_unknown_command_suggests() {
    let (mut app, mut db, _dir) = setup();
    run("expnses", &mut app, &mut db);
    assert!(app.status_message.contains("Did you mean :expenses?"));
}

#[test]
fn test_quit() {
    let (mut app, mut db, _dir) = setup();
    run("q", &mut app, &mut db);
    assert!(!app.running);
}

#[test]
fn test_edit_requires_selection() {
    let (mut app, mut db, _dir) = setup();
    run(&format!("add {CEMENT}"), &mut app, &mut db);
    run("edit paid=500", &mut app, &mut db);
    assert_eq!(app.status_message, "Navigate to Expenses and select one first");
}

#[test]
fn test_edit_with_fields_recomputes() {
    let (mut app, mut db, _dir) = setup();
    run(&format!("add {CEMENT}"), &mut app, &mut db);
    run("expenses", &mut app, &mut db);
    run("edit paid=300", &mut app, &mut db);

    let stored = db.get_expense(1).unwrap();
    assert_eq!(stored.amount_paid, dec!(300));
    assert_eq!(stored.quantity, dec!(10));
    assert_eq!(stored.status(), PaymentStatus::Pending);
    assert!(app.status_message.contains("PKR 200.00 (Pending)"));
    assert_eq!(app.dashboard.summary.total_advance, dec!(0));
}

#[test]
fn test_edit_without_fields_prefills_editor() {
    let (mut app, mut db, _dir) = setup();
    run(&format!("add {CEMENT} note=site A deposit"), &mut app, &mut db);
    run("expenses", &mut app, &mut db);
    run("edit", &mut app, &mut db);

    assert_eq!(app.input_mode, InputMode::Editing);
    assert_eq!(app.editing_id, Some(1));
    assert!(app.command_input.contains("category=Cement"));
    assert!(app.command_input.contains("note=site A deposit"));
}

#[test]
fn test_editor_submission_clears_removed_fields() {
    let (mut app, mut db, _dir) = setup();
    run(&format!("add {CEMENT} desc=Lucky cement notes=gate 2"), &mut app, &mut db);
    run("expenses", &mut app, &mut db);
    run("edit", &mut app, &mut db);

    let text = app
        .command_input
        .replace(" desc=Lucky cement", "")
        .replace(" notes=gate 2", "");
    replace_expense(1, &text, &mut app, &mut db).unwrap();

    let stored = db.get_expense(1).unwrap();
    assert_eq!(stored.description, "");
    assert_eq!(stored.notes, "");
    assert_eq!(stored.quantity, dec!(10));
    assert_eq!(stored.amount_paid, dec!(600));
}

#[test]
fn test_expense_args_reparse_to_same_input() {
    let (mut app, mut db, _dir) = setup();
    run(&format!("add {CEMENT} desc=Lucky cement"), &mut app, &mut db);
    let stored = db.get_expense(1).unwrap();

    let reparsed = input_from_args(&expense_args(&stored)).unwrap();
    assert_eq!(
        reparsed.validate().unwrap(),
        ExpenseInput::from_expense(&stored).validate().unwrap()
    );
}

#[test]
fn test_delete_asks_for_confirmation() {
    let (mut app, mut db, _dir) = setup();
    run(&format!("add {CEMENT}"), &mut app, &mut db);
    run("expenses", &mut app, &mut db);
    run("delete", &mut app, &mut db);

    assert_eq!(app.input_mode, InputMode::Confirm);
    assert!(matches!(
        app.pending_action,
        Some(PendingAction::DeleteExpense { id: 1, .. })
    ));
    // nothing removed until confirmed
    assert_eq!(db.get_expense_count().unwrap(), 1);
}

#[test]
fn test_delete_unknown_id() {
    let (mut app, mut db, _dir) = setup();
    run("delete 99", &mut app, &mut db);
    assert_eq!(app.status_message, "Error: Expense not found: 99");
    assert!(app.pending_action.is_none());
}

#[test]
fn test_month_filter() {
    let (mut app, mut db, _dir) = setup();
    run(&format!("add {CEMENT}"), &mut app, &mut db);
    run(&format!("add {STEEL}"), &mut app, &mut db);

    run("month 2024-01", &mut app, &mut db);
    assert_eq!(app.screen, Screen::Expenses);
    assert_eq!(app.month_filter.as_deref(), Some("2024-01"));
    assert_eq!(app.expenses.len(), 1);
    assert_eq!(app.expenses[0].category, "Cement");

    run("next-month", &mut app, &mut db);
    assert_eq!(app.month_filter.as_deref(), Some("2024-02"));
    assert_eq!(app.expenses[0].category, "Steel");

    run("month", &mut app, &mut db);
    assert!(app.month_filter.is_none());
    assert_eq!(app.expenses.len(), 2);
}

#[test]
fn test_month_short_form_uses_filter_year() {
    let (mut app, mut db, _dir) = setup();
    run("month 2023-11", &mut app, &mut db);
    run("month 3", &mut app, &mut db);
    assert_eq!(app.month_filter.as_deref(), Some("2023-03"));

    run("month 2023-99", &mut app, &mut db);
    assert!(app.status_message.starts_with("Invalid month format"));
    assert_eq!(app.month_filter.as_deref(), Some("2023-03"));
}

#[test]
fn test_step_from_all_months_lands_on_current() {
    let (mut app, mut db, _dir) = setup();
    run("prev-month", &mut app, &mut db);
    let current = chrono::Local::now().format("%Y-%m").to_string();
    assert_eq!(app.month_filter, Some(current));
}

#[test]
fn test_search_and_category_filters() {
    let (mut app, mut db, _dir) = setup();
    run(&format!("add {CEMENT} desc=Lucky cement"), &mut app, &mut db);
    run(&format!("add {STEEL}"), &mut app, &mut db);

    run("search lucky", &mut app, &mut db);
    assert_eq!(app.expenses.len(), 1);
    run("search", &mut app, &mut db);
    assert_eq!(app.expenses.len(), 2);

    run("category steel", &mut app, &mut db);
    assert_eq!(app.expenses.len(), 1);
    assert_eq!(app.status_message, "Category: Steel (1 entries)");
    run("category", &mut app, &mut db);
    assert_eq!(app.expenses.len(), 2);
}

#[test]
fn test_unknown_category_keeps_filter() {
    let (mut app, mut db, _dir) = setup();
    run(&format!("add {CEMENT}"), &mut app, &mut db);
    run(&format!("add {STEEL}"), &mut app, &mut db);

    run("category cement", &mut app, &mut db);
    run("category sand", &mut app, &mut db);
    assert_eq!(app.category_filter.as_deref(), Some("Cement"));
    assert_eq!(
        app.status_message,
        "Error: Unknown category: sand (known: Cement, Steel)"
    );
}

#[test]
fn test_export_commands_write_into_export_dir() {
    let (mut app, mut db, dir) = setup();
    run(&format!("add {CEMENT}"), &mut app, &mut db);

    run("export", &mut app, &mut db);
    assert!(app.status_message.starts_with("Exported 1 expenses"));
    let stem = export::report_stem(today());
    assert!(dir.path().join(format!("{stem}_summary.csv")).exists());

    let sub = dir.path().join("out");
    std::fs::create_dir_all(&sub).unwrap();
    run(
        &format!("export-materials {}", sub.display()),
        &mut app,
        &mut db,
    );
    assert!(sub
        .join(export::material_summary_file_name(today()))
        .exists());
    assert_eq!(db.get_report_downloads().unwrap().len(), 2);
}

#[test]
fn test_screen_cycle_wraps() {
    assert_eq!(Screen::Dashboard.cycle(1), Screen::Expenses);
    assert_eq!(Screen::Categories.cycle(1), Screen::Dashboard);
    assert_eq!(Screen::Dashboard.cycle(-1), Screen::Categories);
}
