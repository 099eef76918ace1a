mod expense;
mod report;

pub(crate) use expense::{Expense, ExpenseFilter, ExpenseInput, ValidExpense, DATE_FORMAT};
pub(crate) use report::{
    CategoryTotal, Dashboard, MaterialTotal, MonthlyTotal, ReportDownload, ReportKind, Summary,
};
