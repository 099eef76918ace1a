use thiserror::Error;

/// Errors surfaced by the expense core.
#[derive(Debug, Error)]
pub(crate) enum LedgerError {
    /// A required field is missing or out of range. The message is shown as-is.
    #[error("{0}")]
    Validation(String),

    #[error("Expense not found: {0}")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Store(#[from] rusqlite::Error),

    /// A stored amount no longer parses as a decimal.
    #[error("Corrupt {field} on expense {id}: '{value}'")]
    Corrupt {
        id: i64,
        field: &'static str,
        value: String,
    },

    /// A running total no longer fits in a decimal.
    #[error("Total {0} is too large to add up")]
    Overflow(&'static str),

    #[error("Export failed: {0}")]
    Export(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LedgerError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub(crate) fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

pub(crate) type LedgerResult<T> = std::result::Result<T, LedgerError>;
