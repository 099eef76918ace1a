use rust_decimal::Decimal;

/// Per `(category, unit_type)` purchase totals, ordered by quantity.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MaterialTotal {
    pub(crate) category: String,
    pub(crate) unit_type: String,
    pub(crate) total_quantity: Decimal,
    pub(crate) entry_count: usize,
    pub(crate) total_cost: Decimal,
    pub(crate) total_paid: Decimal,
    /// Sum of overpayments only; pending balances never offset it.
    pub(crate) total_advance: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Summary {
    pub(crate) total_cost: Decimal,
    pub(crate) total_paid: Decimal,
    /// Net balance: pending minus advances.
    pub(crate) remaining_balance: Decimal,
    pub(crate) total_advance: Decimal,
    pub(crate) total_entries: usize,
    pub(crate) advance_entries: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MonthlyTotal {
    /// `YYYY-MM`
    pub(crate) month: String,
    pub(crate) total_expense: Decimal,
    pub(crate) total_paid: Decimal,
    pub(crate) total_advance: Decimal,
    pub(crate) entry_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CategoryTotal {
    pub(crate) category: String,
    pub(crate) unit_type: String,
    pub(crate) total_expense: Decimal,
    pub(crate) total_paid: Decimal,
    pub(crate) remaining_balance: Decimal,
    pub(crate) total_advance: Decimal,
    pub(crate) entry_count: usize,
    pub(crate) total_quantity: Decimal,
}

/// Everything the dashboard shows, computed from one snapshot of the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Dashboard {
    pub(crate) summary: Summary,
    pub(crate) monthly: Vec<MonthlyTotal>,
    pub(crate) categories: Vec<CategoryTotal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReportKind {
    FullReport,
    MaterialSummary,
}

impl ReportKind {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::FullReport => "full_report",
            Self::MaterialSummary => "material_summary",
        }
    }
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One row of the export history.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ReportDownload {
    pub(crate) id: i64,
    pub(crate) report_type: String,
    pub(crate) file_format: String,
    pub(crate) created_at: String,
}
