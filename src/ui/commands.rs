use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::LazyLock;

use chrono::{Datelike, Local};

use super::app::{App, InputMode, PendingAction, Screen};
use super::util::{format_money, format_quantity, normalize_month, parse_fields, shift_month};
use crate::config::{expand_home, is_dir_like};
use crate::db::Database;
use crate::export;
use crate::models::{Expense, ExpenseInput};

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Database) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit SiteBook", cmd_quit, r);
    register_command!("quit", "Quit SiteBook", cmd_quit, r);
    register_command!("d", "Go to Dashboard", cmd_dashboard, r);
    register_command!("dashboard", "Go to Dashboard", cmd_dashboard, r);
    register_command!("e", "Go to Expenses", cmd_expenses, r);
    register_command!("expenses", "Go to Expenses", cmd_expenses, r);
    register_command!("materials", "Go to Materials", cmd_materials, r);
    register_command!("c", "Go to Categories", cmd_categories, r);
    register_command!("categories", "Go to Categories", cmd_categories, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!(
        "add",
        "Add expense (e.g. :add date=2024-01-10 category=Cement qty=10 unit=bags price=50 paid=500)",
        cmd_add,
        r
    );
    register_command!("a", "Add expense (key=value fields)", cmd_add, r);
    register_command!(
        "edit",
        "Edit selected expense (e.g. :edit paid=700, or :edit alone for all fields)",
        cmd_edit,
        r
    );
    register_command!(
        "delete",
        "Delete selected expense (or :delete <id>)",
        cmd_delete,
        r
    );
    register_command!(
        "export",
        "Export full report as CSV sheets (e.g. :export ~/reports)",
        cmd_export,
        r
    );
    register_command!(
        "export-materials",
        "Export material summary CSV (e.g. :export-materials ~/m.csv)",
        cmd_export_materials,
        r
    );
    register_command!(
        "month",
        "Filter expenses by month (e.g. :month 2024-01, :month to clear)",
        cmd_month,
        r
    );
    register_command!("m", "Filter expenses by month", cmd_month, r);
    register_command!("next-month", "Go to next month", cmd_next_month, r);
    register_command!("prev-month", "Go to previous month", cmd_prev_month, r);
    register_command!(
        "category",
        "Filter expenses by category (e.g. :category Cement)",
        cmd_category,
        r
    );
    register_command!(
        "search",
        "Search expenses (e.g. :search bricks)",
        cmd_search,
        r
    );
    register_command!("s", "Search expenses (e.g. :s bricks)", cmd_search, r);

    r
});

/// Run a `:` command. Failures are reported on the status line rather than ending the
/// session.
pub(crate) fn handle_command(input: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        if let Err(e) = (cmd.run)(args, app, db) {
            tracing::warn!(command = cmd_name, error = %e, "command failed");
            app.set_status(format!("Error: {e}"));
        }
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| levenshtein(input, k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Parse `key=value` command arguments into form input.
pub(crate) fn input_from_args(args: &str) -> anyhow::Result<ExpenseInput> {
    let fields = parse_fields(args)?;
    Ok(ExpenseInput::from_pairs(
        fields.iter().map(|(k, v)| (k.as_str(), v.as_str())),
    )?)
}

/// The stored inputs of an entry as editable `key=value` text.
pub(crate) fn expense_args(e: &Expense) -> String {
    let mut args = vec![
        format!("date={}", e.date.format(crate::models::DATE_FORMAT)),
        format!("category={}", e.category),
        format!("qty={}", format_quantity(e.quantity)),
        format!("unit={}", e.unit_type),
        format!("price={}", format_quantity(e.unit_price)),
        format!("paid={}", format_quantity(e.amount_paid)),
    ];
    if !e.description.is_empty() {
        args.push(format!("desc={}", e.description));
    }
    if let Some(note) = &e.advance_note {
        args.push(format!("note={note}"));
    }
    if !e.notes.is_empty() {
        args.push(format!("notes={}", e.notes));
    }
    args.join(" ")
}

/// Apply `key=value` changes on top of a stored entry and save the full replacement.
pub(crate) fn apply_edit(
    id: i64,
    args: &str,
    app: &mut App,
    db: &mut Database,
) -> anyhow::Result<()> {
    let current = db.get_expense(id)?;
    let input = ExpenseInput::from_expense(&current).overlay(input_from_args(args)?);
    save_edit(id, &input, app, db)
}

/// Save the editor text as the whole entry. Fields removed from the text are cleared.
pub(crate) fn replace_expense(
    id: i64,
    args: &str,
    app: &mut App,
    db: &mut Database,
) -> anyhow::Result<()> {
    save_edit(id, &input_from_args(args)?, app, db)
}

fn save_edit(
    id: i64,
    input: &ExpenseInput,
    app: &mut App,
    db: &mut Database,
) -> anyhow::Result<()> {
    db.update_expense(id, input)?;
    let updated = db.get_expense(id)?;
    app.refresh_all(db)?;
    app.set_status(format!(
        "Updated #{id} {}: balance {} ({})",
        updated.category,
        format_money(updated.remaining_balance(), &app.currency),
        updated.status()
    ));
    Ok(())
}

fn today() -> chrono::NaiveDate {
    Local::now().date_naive()
}

fn resolve_path(arg: &str, default: impl FnOnce() -> PathBuf) -> PathBuf {
    if arg.is_empty() {
        default()
    } else {
        PathBuf::from(expand_home(arg))
    }
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_dashboard(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Dashboard;
    app.refresh_dashboard(db)?;
    Ok(())
}

fn cmd_expenses(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Expenses;
    app.refresh_expenses(db)?;
    Ok(())
}

fn cmd_materials(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Materials;
    app.refresh_materials(db)?;
    Ok(())
}

fn cmd_categories(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Categories;
    app.refresh_categories(db)?;
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_add(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status(
            "Usage: :add date=YYYY-MM-DD category=<name> qty=<n> unit=<unit> price=<n> [paid=<n>] [note=..] [desc=..]",
        );
        return Ok(());
    }

    let input = input_from_args(args)?;
    let expense = db.create_expense(&input)?;
    app.refresh_all(db)?;
    app.set_status(format!(
        "Added #{} {}: {} {} at {} ({})",
        expense.id,
        expense.category,
        format_quantity(expense.quantity),
        expense.unit_type,
        format_money(expense.total_cost(), &app.currency),
        expense.status()
    ));
    Ok(())
}

fn cmd_edit(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let Some((id, current)) = app.selected_expense().map(|e| (e.id, expense_args(e))) else {
        app.set_status("Navigate to Expenses and select one first");
        return Ok(());
    };

    if args.is_empty() {
        app.command_input = current;
        app.editing_id = Some(id);
        app.input_mode = InputMode::Editing;
        app.set_status("Change fields, press Enter to save");
        return Ok(());
    }

    apply_edit(id, args, app, db)
}

fn cmd_delete(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let target = if args.is_empty() {
        app.selected_expense().cloned()
    } else {
        let id: i64 = args
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid expense id: {args}"))?;
        Some(db.get_expense(id)?)
    };

    let Some(expense) = target else {
        app.set_status("Navigate to Expenses and select one first");
        return Ok(());
    };

    let label = format!(
        "#{} {} ({})",
        expense.id,
        expense.category,
        expense.date.format(crate::models::DATE_FORMAT)
    );
    app.confirm_message = format!("Delete {label}?");
    app.pending_action = Some(PendingAction::DeleteExpense {
        id: expense.id,
        label,
    });
    app.input_mode = InputMode::Confirm;
    Ok(())
}

fn cmd_export(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let dir = resolve_path(args, || app.export_dir.clone());
    let files = export::export_full_report(db, &dir, &app.currency, today())?;
    app.set_status(format!(
        "Exported {} expenses to {}/{}_*.csv",
        files.expense_count,
        dir.display(),
        export::report_stem(today())
    ));
    Ok(())
}

fn cmd_export_materials(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let file_name = export::material_summary_file_name(today());
    let mut path = resolve_path(args, || app.export_dir.join(&file_name));
    if is_dir_like(&path) {
        path = path.join(&file_name);
    }
    let count = export::export_material_summary(db, &path, &app.currency)?;
    app.set_status(format!(
        "Exported {count} material rows to {}",
        path.display()
    ));
    Ok(())
}

fn cmd_month(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.month_filter = None;
        app.refresh_expenses(db)?;
        app.set_status("Showing all months");
        return Ok(());
    }

    let default_year = app
        .month_filter
        .as_deref()
        .and_then(|m| m.get(..4))
        .and_then(|y| y.parse().ok())
        .unwrap_or_else(|| today().year());

    match normalize_month(args, default_year) {
        Some(month) => set_month(app, db, month)?,
        None => app.set_status("Invalid month format. Use YYYY-MM (e.g. 2024-01)"),
    }
    Ok(())
}

fn cmd_next_month(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    step_month(app, db, 1)
}

fn cmd_prev_month(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    step_month(app, db, -1)
}

fn step_month(app: &mut App, db: &mut Database, delta: i32) -> anyhow::Result<()> {
    let current = app
        .month_filter
        .clone()
        .unwrap_or_else(|| today().format("%Y-%m").to_string());
    // Stepping from "all months" lands on the current month first
    let target = if app.month_filter.is_none() {
        Some(current)
    } else {
        shift_month(&current, delta)
    };
    if let Some(month) = target {
        set_month(app, db, month)?;
    }
    Ok(())
}

fn set_month(app: &mut App, db: &mut Database, month: String) -> anyhow::Result<()> {
    app.set_status(format!("Showing month: {month}"));
    app.month_filter = Some(month);
    app.screen = Screen::Expenses;
    app.expense_index = 0;
    app.expense_scroll = 0;
    app.refresh_expenses(db)?;
    Ok(())
}

fn cmd_category(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.category_filter = None;
    } else {
        let known = db.get_categories()?;
        let Some(name) = known.iter().find(|c| c.eq_ignore_ascii_case(args)) else {
            anyhow::bail!("Unknown category: {args} (known: {})", known.join(", "));
        };
        app.category_filter = Some(name.clone());
    }
    app.screen = Screen::Expenses;
    app.expense_index = 0;
    app.expense_scroll = 0;
    app.refresh_expenses(db)?;

    let msg = match &app.category_filter {
        Some(c) => format!("Category: {c} ({} entries)", app.expenses.len()),
        None => "Category filter cleared".to_string(),
    };
    app.set_status(msg);
    Ok(())
}

fn cmd_search(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.search_input = args.to_string();
    app.screen = Screen::Expenses;
    app.expense_index = 0;
    app.expense_scroll = 0;
    app.refresh_expenses(db)?;

    if args.is_empty() {
        app.set_status("Search cleared");
    } else {
        app.set_status(format!("Searching: {args}"));
    }

    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
