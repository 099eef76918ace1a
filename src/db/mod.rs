mod schema;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::error::{LedgerError, LedgerResult};
use crate::ledger;
use crate::models::*;
use crate::report;

const EXPENSE_COLUMNS: &str = "id, date, category, description, quantity, unit_type, unit_price,
     amount_paid, advance_note, notes, created_at, updated_at";

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        tracing::debug!(path = %path.display(), "database opened");
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    // ── Expenses ──────────────────────────────────────────────

    pub(crate) fn create_expense(&self, input: &ExpenseInput) -> LedgerResult<Expense> {
        let valid = validated(input)?;
        let now = chrono::Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO expenses (date, category, description, quantity, unit_type, unit_price,
                                   amount_paid, advance_note, notes, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)",
            params![
                valid.date.format(DATE_FORMAT).to_string(),
                valid.category,
                valid.description,
                valid.quantity.to_string(),
                valid.unit_type,
                valid.unit_price.to_string(),
                valid.amount_paid.to_string(),
                valid.advance_note,
                valid.notes,
                now,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::info!(id, category = %valid.category, "expense created");
        self.get_expense(id)
    }

    pub(crate) fn get_expense(&self, id: i64) -> LedgerResult<Expense> {
        let result = self.conn.query_row(
            &format!("SELECT {EXPENSE_COLUMNS} FROM expenses WHERE id = ?1"),
            params![id],
            ExpenseRow::from_row,
        );
        match result {
            Ok(row) => row.into_expense(),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(LedgerError::NotFound(id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace every input field of an entry. Returns the affected row count.
    pub(crate) fn update_expense(&self, id: i64, input: &ExpenseInput) -> LedgerResult<usize> {
        let valid = validated(input)?;
        let affected = self.conn.execute(
            "UPDATE expenses
             SET date = ?1, category = ?2, description = ?3, quantity = ?4, unit_type = ?5,
                 unit_price = ?6, amount_paid = ?7, advance_note = ?8, notes = ?9,
                 updated_at = ?10
             WHERE id = ?11",
            params![
                valid.date.format(DATE_FORMAT).to_string(),
                valid.category,
                valid.description,
                valid.quantity.to_string(),
                valid.unit_type,
                valid.unit_price.to_string(),
                valid.amount_paid.to_string(),
                valid.advance_note,
                valid.notes,
                chrono::Utc::now().to_rfc3339(),
                id,
            ],
        )?;
        if affected == 0 {
            return Err(LedgerError::NotFound(id));
        }
        tracing::info!(id, "expense updated");
        Ok(affected)
    }

    pub(crate) fn delete_expense(&self, id: i64) -> LedgerResult<usize> {
        let affected = self
            .conn
            .execute("DELETE FROM expenses WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(LedgerError::NotFound(id));
        }
        tracing::info!(id, "expense deleted");
        Ok(affected)
    }

    /// All entries, newest date first.
    pub(crate) fn list_expenses(&self) -> LedgerResult<Vec<Expense>> {
        self.search_expenses(&ExpenseFilter::default())
    }

    pub(crate) fn search_expenses(&self, filter: &ExpenseFilter) -> LedgerResult<Vec<Expense>> {
        let mut sql = format!("SELECT {EXPENSE_COLUMNS} FROM expenses WHERE 1=1");
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(m) = &filter.month {
            sql.push_str(&format!(" AND date LIKE ?{}", param_values.len() + 1));
            param_values.push(Box::new(format!("{m}%")));
        }
        if let Some(c) = &filter.category {
            sql.push_str(&format!(
                " AND LOWER(category) = LOWER(?{})",
                param_values.len() + 1
            ));
            param_values.push(Box::new(c.trim().to_string()));
        }
        if let Some(s) = &filter.search {
            sql.push_str(&format!(
                " AND (category LIKE ?{0} OR description LIKE ?{0} OR notes LIKE ?{0})",
                param_values.len() + 1
            ));
            param_values.push(Box::new(format!("%{s}%")));
        }

        sql.push_str(" ORDER BY date DESC, id DESC");

        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_ref.as_slice(), ExpenseRow::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        rows.into_iter().map(ExpenseRow::into_expense).collect()
    }

    pub(crate) fn get_expense_count(&self) -> LedgerResult<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM expenses", [], |row| row.get(0))?)
    }

    /// Distinct category names, for suggestions in the front ends.
    pub(crate) fn get_categories(&self) -> LedgerResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT category FROM expenses ORDER BY category")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    // ── Reports ───────────────────────────────────────────────

    pub(crate) fn get_summary(&self) -> LedgerResult<Summary> {
        report::summary(&self.list_expenses()?)
    }

    pub(crate) fn get_material_totals(&self) -> LedgerResult<Vec<MaterialTotal>> {
        report::material_totals(&self.list_expenses()?)
    }

    pub(crate) fn get_monthly_totals(&self) -> LedgerResult<Vec<MonthlyTotal>> {
        report::monthly(&self.list_expenses()?)
    }

    pub(crate) fn get_category_totals(&self) -> LedgerResult<Vec<CategoryTotal>> {
        report::by_category(&self.list_expenses()?)
    }

    pub(crate) fn get_dashboard(&self) -> LedgerResult<Dashboard> {
        report::dashboard(&self.list_expenses()?)
    }

    // ── Report downloads ──────────────────────────────────────

    pub(crate) fn log_report_download(&self, kind: ReportKind, format: &str) -> LedgerResult<i64> {
        self.conn.execute(
            "INSERT INTO report_downloads (report_type, file_format, created_at)
             VALUES (?1, ?2, ?3)",
            params![kind.as_str(), format, chrono::Utc::now().to_rfc3339()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub(crate) fn get_report_downloads(&self) -> LedgerResult<Vec<ReportDownload>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, report_type, file_format, created_at FROM report_downloads
             ORDER BY created_at DESC, id DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(ReportDownload {
                id: row.get(0)?,
                report_type: row.get(1)?,
                file_format: row.get(2)?,
                created_at: row.get(3)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }
}

fn validated(input: &ExpenseInput) -> LedgerResult<ValidExpense> {
    input.validate().inspect_err(|e| {
        tracing::warn!(error = %e, "expense rejected");
    })
}

/// Raw column values; amounts are still text until checked.
struct ExpenseRow {
    id: i64,
    date: String,
    category: String,
    description: String,
    quantity: String,
    unit_type: String,
    unit_price: String,
    amount_paid: String,
    advance_note: Option<String>,
    notes: String,
    created_at: String,
    updated_at: String,
}

impl ExpenseRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            date: row.get(1)?,
            category: row.get(2)?,
            description: row.get(3)?,
            quantity: row.get(4)?,
            unit_type: row.get(5)?,
            unit_price: row.get(6)?,
            amount_paid: row.get(7)?,
            advance_note: row.get(8)?,
            notes: row.get(9)?,
            created_at: row.get(10)?,
            updated_at: row.get(11)?,
        })
    }

    fn into_expense(self) -> LedgerResult<Expense> {
        let id = self.id;
        let date = NaiveDate::parse_from_str(&self.date, DATE_FORMAT).map_err(|_| {
            LedgerError::Corrupt {
                id,
                field: "date",
                value: self.date.clone(),
            }
        })?;
        Ok(Expense {
            id,
            date,
            quantity: stored_decimal(id, "quantity", &self.quantity)?,
            unit_price: stored_decimal(id, "unit_price", &self.unit_price)?,
            amount_paid: stored_decimal(id, "amount_paid", &self.amount_paid)?,
            category: self.category,
            description: self.description,
            unit_type: self.unit_type,
            advance_note: self.advance_note,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Rows written before amounts were capped are reported, not computed on.
fn stored_decimal(id: i64, field: &'static str, value: &str) -> LedgerResult<Decimal> {
    Decimal::from_str(value)
        .ok()
        .filter(|d| ledger::within_limit(*d))
        .ok_or_else(|| LedgerError::Corrupt {
            id,
            field,
            value: value.to_string(),
        })
}
