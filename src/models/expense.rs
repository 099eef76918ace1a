use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::{LedgerError, LedgerResult};
use crate::ledger::{self, LedgerFigures, PaymentStatus};

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// One recorded purchase as it lives in the store.
///
/// Only the raw inputs are kept. Cost, balance, status and the effective advance note are
/// derived on demand through [`ledger::compute`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Expense {
    pub(crate) id: i64,
    pub(crate) date: NaiveDate,
    pub(crate) category: String,
    pub(crate) description: String,
    pub(crate) quantity: Decimal,
    pub(crate) unit_type: String,
    pub(crate) unit_price: Decimal,
    pub(crate) amount_paid: Decimal,
    /// Note as typed by the user, if any.
    pub(crate) advance_note: Option<String>,
    pub(crate) notes: String,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl Expense {
    pub(crate) fn figures(&self) -> LedgerFigures {
        ledger::compute(
            self.quantity,
            self.unit_price,
            self.amount_paid,
            self.advance_note.as_deref(),
        )
    }

    pub(crate) fn total_cost(&self) -> Decimal {
        self.figures().total_cost
    }

    pub(crate) fn remaining_balance(&self) -> Decimal {
        self.figures().remaining_balance
    }

    pub(crate) fn status(&self) -> PaymentStatus {
        self.figures().status
    }

    /// `YYYY-MM` bucket used by the monthly report.
    pub(crate) fn month(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }
}

/// Unvalidated form input for a create or a full-replace update.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ExpenseInput {
    pub(crate) date: Option<String>,
    pub(crate) category: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) quantity: Option<Decimal>,
    pub(crate) unit_type: Option<String>,
    pub(crate) unit_price: Option<Decimal>,
    pub(crate) amount_paid: Option<Decimal>,
    pub(crate) advance_note: Option<String>,
    pub(crate) notes: Option<String>,
}

/// Input that passed validation and is ready to persist.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ValidExpense {
    pub(crate) date: NaiveDate,
    pub(crate) category: String,
    pub(crate) description: String,
    pub(crate) quantity: Decimal,
    pub(crate) unit_type: String,
    pub(crate) unit_price: Decimal,
    pub(crate) amount_paid: Decimal,
    pub(crate) advance_note: Option<String>,
    pub(crate) notes: String,
}

impl ExpenseInput {
    /// Build an input from `key=value` pairs. Unknown keys are rejected.
    pub(crate) fn from_pairs<'a, I>(pairs: I) -> LedgerResult<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut input = Self::default();
        for (key, value) in pairs {
            match key.to_lowercase().as_str() {
                "date" => input.date = Some(value.to_string()),
                "category" | "cat" | "material" => input.category = Some(value.to_string()),
                "description" | "desc" => input.description = Some(value.to_string()),
                "quantity" | "qty" => input.quantity = parse_amount("quantity", value)?,
                "unit" | "unit_type" => input.unit_type = Some(value.to_string()),
                "price" | "unit_price" => input.unit_price = parse_amount("unit price", value)?,
                "paid" | "amount_paid" => input.amount_paid = parse_amount("amount paid", value)?,
                "note" | "advance_note" => input.advance_note = Some(value.to_string()),
                "notes" => input.notes = Some(value.to_string()),
                other => {
                    return Err(LedgerError::validation(format!("Unknown field: {other}")));
                }
            }
        }
        Ok(input)
    }

    /// Seed an input from a stored entry, so an edit can change a few fields and still
    /// submit a full replacement.
    pub(crate) fn from_expense(expense: &Expense) -> Self {
        Self {
            date: Some(expense.date.format(DATE_FORMAT).to_string()),
            category: Some(expense.category.clone()),
            description: Some(expense.description.clone()),
            quantity: Some(expense.quantity),
            unit_type: Some(expense.unit_type.clone()),
            unit_price: Some(expense.unit_price),
            amount_paid: Some(expense.amount_paid),
            advance_note: expense.advance_note.clone(),
            notes: Some(expense.notes.clone()),
        }
    }

    /// Fields present in `changes` replace the ones here; absent ones are kept.
    pub(crate) fn overlay(self, changes: ExpenseInput) -> Self {
        Self {
            date: changes.date.or(self.date),
            category: changes.category.or(self.category),
            description: changes.description.or(self.description),
            quantity: changes.quantity.or(self.quantity),
            unit_type: changes.unit_type.or(self.unit_type),
            unit_price: changes.unit_price.or(self.unit_price),
            amount_paid: changes.amount_paid.or(self.amount_paid),
            advance_note: changes.advance_note.or(self.advance_note),
            notes: changes.notes.or(self.notes),
        }
    }

    pub(crate) fn validate(&self) -> LedgerResult<ValidExpense> {
        let raw_date = non_blank(self.date.as_deref())
            .ok_or_else(|| LedgerError::validation("Date is required"))?;
        let date = NaiveDate::parse_from_str(raw_date, DATE_FORMAT)
            .map_err(|_| LedgerError::validation(format!("Invalid date: {raw_date}")))?;

        let category = self
            .category
            .as_deref()
            .filter(|c| !c.is_empty())
            .ok_or_else(|| LedgerError::validation("Category is required"))?;
        let category = non_blank(Some(category))
            .ok_or_else(|| LedgerError::validation("Category cannot be empty"))?;

        let quantity = self
            .quantity
            .filter(|q| *q > Decimal::ZERO)
            .ok_or_else(|| LedgerError::validation("Valid quantity is required"))?;

        let unit_type = non_blank(self.unit_type.as_deref())
            .ok_or_else(|| LedgerError::validation("Unit type is required"))?;

        let unit_price = self
            .unit_price
            .filter(|p| *p > Decimal::ZERO)
            .ok_or_else(|| LedgerError::validation("Valid unit price is required"))?;

        let amount_paid = self.amount_paid.unwrap_or(Decimal::ZERO);
        if amount_paid < Decimal::ZERO {
            return Err(LedgerError::validation("Amount paid cannot be negative"));
        }

        for (label, value) in [
            ("Quantity", quantity),
            ("Unit price", unit_price),
            ("Amount paid", amount_paid),
        ] {
            if !ledger::within_limit(value) {
                return Err(LedgerError::validation(format!(
                    "{label} cannot exceed {}",
                    ledger::MAX_AMOUNT
                )));
            }
        }

        Ok(ValidExpense {
            date,
            category: category.to_string(),
            description: trimmed(self.description.as_deref()),
            quantity: quantity.normalize(),
            unit_type: unit_type.to_string(),
            unit_price: unit_price.normalize(),
            amount_paid: amount_paid.normalize(),
            advance_note: non_blank(self.advance_note.as_deref()).map(str::to_string),
            notes: trimmed(self.notes.as_deref()),
        })
    }
}

/// Narrowing applied to `list_expenses`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ExpenseFilter {
    /// `YYYY-MM`
    pub(crate) month: Option<String>,
    pub(crate) category: Option<String>,
    pub(crate) search: Option<String>,
}

impl ExpenseFilter {
    pub(crate) fn is_empty(&self) -> bool {
        self.month.is_none() && self.category.is_none() && self.search.is_none()
    }
}

/// Parse a user-typed amount, tolerating currency symbols and thousands separators.
pub(crate) fn parse_amount(field: &str, raw: &str) -> LedgerResult<Option<Decimal>> {
    let cleaned = raw
        .trim()
        .trim_start_matches("PKR")
        .replace(['$', ',', '"'], "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Ok(None);
    }
    Decimal::from_str(cleaned)
        .map(Some)
        .map_err(|_| LedgerError::validation(format!("Invalid {field}: '{raw}'")))
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

fn trimmed(s: Option<&str>) -> String {
    s.map(str::trim).unwrap_or_default().to_string()
}
