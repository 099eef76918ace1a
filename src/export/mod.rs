//! Spreadsheet export of the report views.
//!
//! Each sheet is a CSV file. The full report writes four of them side by side; the
//! material summary is a single sheet with a grand-total row.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};

use crate::db::Database;
use crate::error::LedgerResult;
use crate::models::{CategoryTotal, Expense, MaterialTotal, ReportKind, Summary};

pub(crate) const FILE_FORMAT: &str = "csv";

/// Paths written by [`export_full_report`].
#[derive(Debug, Clone)]
pub(crate) struct ReportFiles {
    pub(crate) summary: PathBuf,
    pub(crate) materials: PathBuf,
    pub(crate) expenses: PathBuf,
    pub(crate) categories: PathBuf,
    pub(crate) expense_count: usize,
}

impl ReportFiles {
    pub(crate) fn all(&self) -> [&Path; 4] {
        [
            &self.summary,
            &self.materials,
            &self.expenses,
            &self.categories,
        ]
    }
}

pub(crate) fn report_stem(date: NaiveDate) -> String {
    format!("construction_expense_report_{}", date.format("%Y_%m_%d"))
}

pub(crate) fn material_summary_file_name(date: NaiveDate) -> String {
    format!("material_summary_{}.csv", date.format("%Y-%m-%d"))
}

pub(crate) fn export_full_report(
    db: &Database,
    dir: &Path,
    currency: &str,
    date: NaiveDate,
) -> LedgerResult<ReportFiles> {
    std::fs::create_dir_all(dir)?;
    let stem = report_stem(date);
    let sheet = |name: &str| dir.join(format!("{stem}_{name}.csv"));

    let expenses = db.list_expenses()?;
    let summary = crate::report::summary(&expenses)?;
    let materials = crate::report::material_totals(&expenses)?;
    let categories = crate::report::by_category(&expenses)?;

    let files = ReportFiles {
        summary: sheet("summary"),
        materials: sheet("materials"),
        expenses: sheet("expenses"),
        categories: sheet("categories"),
        expense_count: expenses.len(),
    };

    write_summary_sheet(&files.summary, &summary, currency)?;
    write_material_sheet(&files.materials, &materials, currency, false)?;
    write_expense_sheet(&files.expenses, &expenses)?;
    write_category_sheet(&files.categories, &categories)?;

    db.log_report_download(ReportKind::FullReport, FILE_FORMAT)?;
    tracing::info!(dir = %dir.display(), rows = expenses.len(), "full report exported");
    Ok(files)
}

/// Returns the number of material rows written, excluding the total row.
pub(crate) fn export_material_summary(
    db: &Database,
    path: &Path,
    currency: &str,
) -> LedgerResult<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let materials = db.get_material_totals()?;
    write_material_sheet(path, &materials, currency, true)?;
    db.log_report_download(ReportKind::MaterialSummary, FILE_FORMAT)?;
    tracing::info!(path = %path.display(), rows = materials.len(), "material summary exported");
    Ok(materials.len())
}

fn write_summary_sheet(path: &Path, summary: &Summary, currency: &str) -> LedgerResult<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["Metric", "Value", "Currency"])?;
    let money = [
        ("Total Cost", summary.total_cost),
        ("Total Paid", summary.total_paid),
        ("Remaining Balance", summary.remaining_balance),
        ("Total Advance", summary.total_advance),
    ];
    for (label, value) in money {
        wtr.write_record([label, &amount(value), currency])?;
    }
    wtr.write_record(["Total Entries", &summary.total_entries.to_string(), ""])?;
    wtr.write_record(["Advance Entries", &summary.advance_entries.to_string(), ""])?;
    wtr.flush()?;
    Ok(())
}

fn write_material_sheet(
    path: &Path,
    rows: &[MaterialTotal],
    currency: &str,
    with_total: bool,
) -> LedgerResult<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record([
        "Category".to_string(),
        "Total Quantity".to_string(),
        "Unit Type".to_string(),
        "Entry Count".to_string(),
        format!("Total Cost ({currency})"),
        format!("Total Paid ({currency})"),
        format!("Advance ({currency})"),
    ])?;
    for r in rows {
        wtr.write_record([
            r.category.clone(),
            amount(r.total_quantity),
            r.unit_type.clone(),
            r.entry_count.to_string(),
            amount(r.total_cost),
            amount(r.total_paid),
            amount(r.total_advance),
        ])?;
    }

    if with_total {
        let sum = |f: fn(&MaterialTotal) -> Decimal| rows.iter().map(f).sum::<Decimal>();
        let entries: usize = rows.iter().map(|r| r.entry_count).sum();
        wtr.write_record(["", "", "", "", "", "", ""])?;
        wtr.write_record([
            "GRAND TOTAL".to_string(),
            amount(sum(|r| r.total_quantity)),
            String::new(),
            entries.to_string(),
            amount(sum(|r| r.total_cost)),
            amount(sum(|r| r.total_paid)),
            amount(sum(|r| r.total_advance)),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_expense_sheet(path: &Path, expenses: &[Expense]) -> LedgerResult<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record([
        "ID",
        "Date",
        "Category",
        "Description",
        "Quantity",
        "Unit",
        "Unit Price",
        "Total Cost",
        "Amount Paid",
        "Balance",
        "Status",
        "Advance Note",
    ])?;
    for e in expenses {
        let figures = e.figures();
        wtr.write_record([
            e.id.to_string(),
            e.date.format("%Y-%m-%d").to_string(),
            e.category.clone(),
            or_dash(&e.description),
            amount(e.quantity),
            e.unit_type.clone(),
            amount(e.unit_price),
            amount(figures.total_cost),
            amount(e.amount_paid),
            amount(figures.remaining_balance),
            figures.status.to_string(),
            or_dash(figures.advance_note.as_deref().unwrap_or_default()),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_category_sheet(path: &Path, rows: &[CategoryTotal]) -> LedgerResult<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record([
        "Category",
        "Total Quantity",
        "Unit",
        "Entries",
        "Total Cost",
        "Total Paid",
        "Balance",
        "Advance",
    ])?;
    for r in rows {
        wtr.write_record([
            r.category.clone(),
            amount(r.total_quantity),
            or_dash(&r.unit_type),
            r.entry_count.to_string(),
            amount(r.total_expense),
            amount(r.total_paid),
            amount(r.remaining_balance),
            amount(r.total_advance),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Two decimal places, no grouping, so spreadsheets read it as a number.
fn amount(value: Decimal) -> String {
    format!("{:.2}", value)
}

fn or_dash(s: &str) -> String {
    if s.trim().is_empty() {
        "-".to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests;
