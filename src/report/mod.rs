//! Read-side aggregation over the current store contents.
//!
//! All functions are pure folds over a slice of entries. Per-entry figures come from
//! [`Expense::figures`], so the aggregates can never disagree with what an individual
//! entry shows.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{CategoryTotal, Dashboard, Expense, MaterialTotal, MonthlyTotal, Summary};

/// Months shown by the monthly report.
pub(crate) const MONTHLY_WINDOW: usize = 12;

pub(crate) fn summary(entries: &[Expense]) -> LedgerResult<Summary> {
    let mut acc = Summary::default();
    for e in entries {
        let figures = e.figures();
        add(&mut acc.total_cost, figures.total_cost, "cost")?;
        add(&mut acc.total_paid, e.amount_paid, "paid")?;
        add(&mut acc.remaining_balance, figures.remaining_balance, "balance")?;
        add(&mut acc.total_advance, figures.advance_amount(), "advance")?;
        acc.total_entries += 1;
        if figures.remaining_balance < Decimal::ZERO {
            acc.advance_entries += 1;
        }
    }
    Ok(acc)
}

pub(crate) fn material_totals(entries: &[Expense]) -> LedgerResult<Vec<MaterialTotal>> {
    let mut rows: Vec<MaterialTotal> = group_by_material(entries)?
        .into_values()
        .map(|g| MaterialTotal {
            category: g.category,
            unit_type: g.unit_type,
            total_quantity: g.quantity,
            entry_count: g.count,
            total_cost: g.cost,
            total_paid: g.paid,
            total_advance: g.advance,
        })
        .collect();
    // Grouping is key-ordered and the sort is stable, so ties stay alphabetical
    rows.sort_by(|a, b| b.total_quantity.cmp(&a.total_quantity));
    Ok(rows)
}

pub(crate) fn by_category(entries: &[Expense]) -> LedgerResult<Vec<CategoryTotal>> {
    let mut rows: Vec<CategoryTotal> = group_by_material(entries)?
        .into_values()
        .map(|g| CategoryTotal {
            category: g.category,
            unit_type: g.unit_type,
            total_expense: g.cost,
            total_paid: g.paid,
            remaining_balance: g.balance,
            total_advance: g.advance,
            entry_count: g.count,
            total_quantity: g.quantity,
        })
        .collect();
    rows.sort_by(|a, b| b.total_expense.cmp(&a.total_expense));
    Ok(rows)
}

/// Most recent month first, capped to [`MONTHLY_WINDOW`] months.
pub(crate) fn monthly(entries: &[Expense]) -> LedgerResult<Vec<MonthlyTotal>> {
    let mut months: BTreeMap<String, Group> = BTreeMap::new();
    for e in entries {
        months.entry(e.month()).or_default().add(e)?;
    }
    Ok(months
        .into_iter()
        .rev()
        .take(MONTHLY_WINDOW)
        .map(|(month, g)| MonthlyTotal {
            month,
            total_expense: g.cost,
            total_paid: g.paid,
            total_advance: g.advance,
            entry_count: g.count,
        })
        .collect())
}

pub(crate) fn dashboard(entries: &[Expense]) -> LedgerResult<Dashboard> {
    Ok(Dashboard {
        summary: summary(entries)?,
        monthly: monthly(entries)?,
        categories: by_category(entries)?,
    })
}

fn add(total: &mut Decimal, value: Decimal, what: &'static str) -> LedgerResult<()> {
    *total = total
        .checked_add(value)
        .ok_or(LedgerError::Overflow(what))?;
    Ok(())
}

#[derive(Debug, Default)]
struct Group {
    /// Spelling of the first entry seen for this group.
    category: String,
    unit_type: String,
    quantity: Decimal,
    count: usize,
    cost: Decimal,
    paid: Decimal,
    balance: Decimal,
    advance: Decimal,
}

impl Group {
    fn add(&mut self, e: &Expense) -> LedgerResult<()> {
        if self.count == 0 {
            self.category = e.category.clone();
            self.unit_type = e.unit_type.clone();
        }
        let figures = e.figures();
        add(&mut self.quantity, e.quantity, "quantity")?;
        add(&mut self.cost, figures.total_cost, "cost")?;
        add(&mut self.paid, e.amount_paid, "paid")?;
        add(&mut self.balance, figures.remaining_balance, "balance")?;
        add(&mut self.advance, figures.advance_amount(), "advance")?;
        self.count += 1;
        Ok(())
    }
}

/// Groups by category and unit type, ignoring ASCII case like the store's category filter.
fn group_by_material(entries: &[Expense]) -> LedgerResult<BTreeMap<(String, String), Group>> {
    let mut groups: BTreeMap<(String, String), Group> = BTreeMap::new();
    for e in entries {
        let key = (
            e.category.to_ascii_lowercase(),
            e.unit_type.to_ascii_lowercase(),
        );
        groups.entry(key).or_default().add(e)?;
    }
    Ok(groups)
}

#[cfg(test)]
mod tests;
