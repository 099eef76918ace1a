//! Ledger arithmetic for a single purchase.
//!
//! Every figure derived from an entry's quantity, unit price and payment is produced here
//! and nowhere else. The store, the report aggregator, the exporter and both front ends
//! all call [`compute`].

use rust_decimal::Decimal;

/// Note attached to an overpaid entry when the user gave none.
pub(crate) const DEFAULT_ADVANCE_NOTE: &str = "Advance payment";

/// Largest quantity, unit price or payment an entry may carry.
///
/// Keeps `quantity * unit_price` and the running report totals inside `Decimal`'s range.
pub(crate) const MAX_AMOUNT: i64 = 1_000_000_000_000;

pub(crate) fn within_limit(value: Decimal) -> bool {
    value.abs() <= Decimal::from(MAX_AMOUNT)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum PaymentStatus {
    Paid,
    Pending,
    Advance,
}

impl PaymentStatus {
    /// Classify by the sign of `total_cost - amount_paid`.
    ///
    /// A zero balance is `Paid`, including an entry that costs nothing and paid nothing.
    pub(crate) fn from_balance(remaining_balance: Decimal) -> Self {
        if remaining_balance.is_zero() {
            Self::Paid
        } else if remaining_balance.is_sign_negative() {
            Self::Advance
        } else {
            Self::Pending
        }
    }

    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Paid => "Paid",
            Self::Pending => "Pending",
            Self::Advance => "Advance",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Everything derived from one entry's raw inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LedgerFigures {
    pub(crate) total_cost: Decimal,
    pub(crate) remaining_balance: Decimal,
    pub(crate) is_advance: bool,
    pub(crate) advance_note: Option<String>,
    pub(crate) status: PaymentStatus,
}

impl LedgerFigures {
    /// Amount paid beyond the total cost, or zero.
    pub(crate) fn advance_amount(&self) -> Decimal {
        if self.remaining_balance.is_sign_negative() {
            self.remaining_balance.abs()
        } else {
            Decimal::ZERO
        }
    }
}

pub(crate) fn compute(
    quantity: Decimal,
    unit_price: Decimal,
    amount_paid: Decimal,
    explicit_advance_note: Option<&str>,
) -> LedgerFigures {
    let total_cost = quantity * unit_price;
    let remaining_balance = total_cost - amount_paid;
    let is_advance = amount_paid > total_cost;

    let advance_note = match explicit_advance_note.map(str::trim) {
        Some(note) if !note.is_empty() => Some(note.to_string()),
        _ if is_advance => Some(DEFAULT_ADVANCE_NOTE.to_string()),
        _ => None,
    };

    LedgerFigures {
        total_cost,
        // -0 and 0 must classify and display identically
        remaining_balance: if remaining_balance.is_zero() {
            Decimal::ZERO
        } else {
            remaining_balance
        },
        is_advance,
        advance_note,
        status: PaymentStatus::from_balance(remaining_balance),
    }
}
