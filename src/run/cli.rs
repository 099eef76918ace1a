use anyhow::{bail, Context, Result};
use std::path::PathBuf;

use crate::config::{expand_home, is_dir_like, Config};
use crate::db::Database;
use crate::export;
use crate::models::{Expense, ExpenseFilter, ExpenseInput, DATE_FORMAT};
use crate::ui::util::{format_amount, format_money, format_quantity, parse_fields, truncate};

pub(crate) fn as_cli(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let rest = &args[2..];
    match args[1].as_str() {
        "add" | "a" => cli_add(rest, db, config),
        "update" => cli_update(rest, db, config),
        "delete" | "rm" => cli_delete(rest, db),
        "show" => cli_show(rest, db, config),
        "list" | "ls" => cli_list(rest, db, config),
        "summary" | "s" => cli_summary(db, config),
        "materials" => cli_materials(db, config),
        "monthly" => cli_monthly(db, config),
        "categories" => cli_categories(db, config),
        "export" => cli_export(rest, db, config),
        "export-materials" => cli_export_materials(rest, db, config),
        "downloads" => cli_downloads(db),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("sitebook {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("SiteBook - construction expense ledger");
    println!();
    println!("Usage: sitebook [command]");
    println!();
    println!("Commands:");
    println!("  (none)                        Launch interactive TUI");
    println!("  add <field=value>...          Record a purchase");
    println!("      date=YYYY-MM-DD category=NAME qty=N unit=UNIT price=N");
    println!("      [paid=N] [note=TEXT] [desc=TEXT] [notes=TEXT]");
    println!("  update <id> <field=value>...  Replace every field of an expense");
    println!("  delete <id>                   Delete an expense");
    println!("  show <id>                     Show one expense with its balance");
    println!("  list                          List expenses, newest first");
    println!("    --month <YYYY-MM>           Only this month");
    println!("    --category <name>           Only this category");
    println!("    --search <text>             Match category, description or notes");
    println!("  summary                       Totals across all expenses");
    println!("  materials                     Totals per material and unit");
    println!("  monthly                       Totals for the last 12 months");
    println!("  categories                    Totals per category, largest first");
    println!("  export [dir]                  Write the full report as CSV sheets");
    println!("  export-materials [path]       Write the material summary CSV");
    println!("  downloads                     Show export history");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
}

fn fields_input(args: &[String]) -> Result<ExpenseInput> {
    let fields = parse_fields(&args.join(" "))?;
    Ok(ExpenseInput::from_pairs(
        fields.iter().map(|(k, v)| (k.as_str(), v.as_str())),
    )?)
}

fn parse_id(args: &[String], usage: &str) -> Result<i64> {
    let raw = args.first().with_context(|| format!("Usage: {usage}"))?;
    raw.parse()
        .with_context(|| format!("Invalid expense id: {raw}"))
}

fn flag<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == name)
        .map(|w| w[1].as_str())
}

fn cli_add(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    if args.is_empty() {
        bail!("Usage: sitebook add date=YYYY-MM-DD category=NAME qty=N unit=UNIT price=N [paid=N]");
    }
    let expense = db.create_expense(&fields_input(args)?)?;
    println!("Added expense #{}", expense.id);
    print_expense(&expense, config);
    Ok(())
}

fn cli_update(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let usage = "sitebook update <id> date=.. category=.. qty=.. unit=.. price=.. [paid=..]";
    let id = parse_id(args, usage)?;
    db.update_expense(id, &fields_input(&args[1..])?)?;
    let expense = db.get_expense(id)?;
    println!("Updated expense #{id}");
    print_expense(&expense, config);
    Ok(())
}

fn cli_delete(args: &[String], db: &mut Database) -> Result<()> {
    let id = parse_id(args, "sitebook delete <id>")?;
    db.delete_expense(id)?;
    println!("Deleted expense #{id}");
    Ok(())
}

fn cli_show(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let id = parse_id(args, "sitebook show <id>")?;
    print_expense(&db.get_expense(id)?, config);
    Ok(())
}

fn print_expense(e: &Expense, config: &Config) {
    let figures = e.figures();
    let money = |v| format_money(v, &config.currency);
    println!("{}", "─".repeat(40));
    println!("  Date:        {}", e.date.format(DATE_FORMAT));
    println!("  Category:    {}", e.category);
    if !e.description.is_empty() {
        println!("  Description: {}", e.description);
    }
    println!(
        "  Quantity:    {} {} @ {}",
        format_quantity(e.quantity),
        e.unit_type,
        money(e.unit_price)
    );
    println!("  Total cost:  {}", money(figures.total_cost));
    println!("  Paid:        {}", money(e.amount_paid));
    println!("  Balance:     {}", money(figures.remaining_balance));
    println!("  Status:      {}", figures.status);
    if let Some(note) = &figures.advance_note {
        println!("  Note:        {note}");
    }
    if !e.notes.is_empty() {
        println!("  Notes:       {}", e.notes);
    }
}

fn cli_list(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let filter = ExpenseFilter {
        month: flag(args, "--month").map(str::to_string),
        category: flag(args, "--category").map(str::to_string),
        search: flag(args, "--search").map(str::to_string),
    };
    let expenses = db.search_expenses(&filter)?;
    if expenses.is_empty() {
        println!("No expenses");
        return Ok(());
    }

    println!(
        "{:<5} {:<10} {:<18} {:>10} {:<8} {:>12} {:>14} {:>14} {:<8}",
        "ID", "Date", "Category", "Qty", "Unit", "Price", "Total", "Balance", "Status"
    );
    println!("{}", "─".repeat(106));
    for e in &expenses {
        let figures = e.figures();
        println!(
            "{:<5} {:<10} {:<18} {:>10} {:<8} {:>12} {:>14} {:>14} {:<8}",
            e.id,
            e.date.format(DATE_FORMAT).to_string(),
            truncate(&e.category, 18),
            format_quantity(e.quantity),
            truncate(&e.unit_type, 8),
            format_amount(e.unit_price),
            format_amount(figures.total_cost),
            format_amount(figures.remaining_balance),
            figures.status.to_string(),
        );
    }
    println!();
    println!("{} expenses ({})", expenses.len(), config.currency);
    Ok(())
}

fn cli_summary(db: &mut Database, config: &Config) -> Result<()> {
    let s = db.get_summary()?;
    let money = |v| format_money(v, &config.currency);
    println!("SiteBook summary");
    println!("{}", "─".repeat(40));
    println!("  Total cost:       {}", money(s.total_cost));
    println!("  Total paid:       {}", money(s.total_paid));
    println!("  Balance:          {}", money(s.remaining_balance));
    println!("  Advance paid:     {}", money(s.total_advance));
    println!("  Entries:          {}", s.total_entries);
    println!("  Advance entries:  {}", s.advance_entries);
    Ok(())
}

fn cli_materials(db: &mut Database, config: &Config) -> Result<()> {
    let rows = db.get_material_totals()?;
    if rows.is_empty() {
        println!("No materials");
        return Ok(());
    }
    println!(
        "{:<20} {:>12} {:<8} {:>7} {:>14} {:>14} {:>12}",
        "Material", "Quantity", "Unit", "Entries", "Cost", "Paid", "Advance"
    );
    println!("{}", "─".repeat(93));
    for m in &rows {
        println!(
            "{:<20} {:>12} {:<8} {:>7} {:>14} {:>14} {:>12}",
            truncate(&m.category, 20),
            format_quantity(m.total_quantity),
            truncate(&m.unit_type, 8),
            m.entry_count,
            format_amount(m.total_cost),
            format_amount(m.total_paid),
            format_amount(m.total_advance),
        );
    }
    println!();
    println!("Amounts in {}", config.currency);
    Ok(())
}

fn cli_monthly(db: &mut Database, config: &Config) -> Result<()> {
    let rows = db.get_monthly_totals()?;
    if rows.is_empty() {
        println!("No expenses");
        return Ok(());
    }
    println!(
        "{:<8} {:>7} {:>14} {:>14} {:>12}",
        "Month", "Entries", "Expense", "Paid", "Advance"
    );
    println!("{}", "─".repeat(59));
    for m in &rows {
        println!(
            "{:<8} {:>7} {:>14} {:>14} {:>12}",
            m.month,
            m.entry_count,
            format_amount(m.total_expense),
            format_amount(m.total_paid),
            format_amount(m.total_advance),
        );
    }
    println!();
    println!("Amounts in {}", config.currency);
    Ok(())
}

fn cli_categories(db: &mut Database, config: &Config) -> Result<()> {
    let rows = db.get_category_totals()?;
    if rows.is_empty() {
        println!("No categories");
        return Ok(());
    }
    println!(
        "{:<20} {:<8} {:>7} {:>14} {:>14} {:>14}",
        "Category", "Unit", "Entries", "Expense", "Paid", "Balance"
    );
    println!("{}", "─".repeat(82));
    for c in &rows {
        println!(
            "{:<20} {:<8} {:>7} {:>14} {:>14} {:>14}",
            truncate(&c.category, 20),
            truncate(&c.unit_type, 8),
            c.entry_count,
            format_amount(c.total_expense),
            format_amount(c.total_paid),
            format_amount(c.remaining_balance),
        );
    }
    println!();
    println!("Amounts in {}", config.currency);
    Ok(())
}

fn cli_export(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let dir = args
        .first()
        .map(|a| PathBuf::from(expand_home(a)))
        .unwrap_or_else(|| config.export_dir.clone());
    let today = chrono::Local::now().date_naive();

    let files = export::export_full_report(db, &dir, &config.currency, today)
        .with_context(|| format!("Failed to export report to {}", dir.display()))?;
    println!("Exported {} expenses:", files.expense_count);
    for path in files.all() {
        println!("  {}", path.display());
    }
    Ok(())
}

fn cli_export_materials(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let file_name = export::material_summary_file_name(chrono::Local::now().date_naive());
    let mut path = args
        .first()
        .map(|a| PathBuf::from(expand_home(a)))
        .unwrap_or_else(|| config.export_dir.join(&file_name));
    if is_dir_like(&path) {
        path = path.join(&file_name);
    }

    let count = export::export_material_summary(db, &path, &config.currency)
        .with_context(|| format!("Failed to export material summary to {}", path.display()))?;
    println!("Exported {count} material rows to {}", path.display());
    Ok(())
}

fn cli_downloads(db: &mut Database) -> Result<()> {
    let downloads = db.get_report_downloads()?;
    if downloads.is_empty() {
        println!("No exports yet");
        return Ok(());
    }
    println!("{:<5} {:<18} {:<7} Created", "ID", "Report", "Format");
    println!("{}", "─".repeat(60));
    for d in &downloads {
        println!(
            "{:<5} {:<18} {:<7} {}",
            d.id, d.report_type, d.file_format, d.created_at
        );
    }
    Ok(())
}
