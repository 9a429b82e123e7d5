// ⚠️ Error Kinds - every operation returns one of these, nothing is swallowed

use thiserror::Error;

// ============================================================================
// VALIDATION ERRORS (user-correctable)
// ============================================================================

/// Payload rejected before it reaches storage
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("invalid category: {0}")]
    InvalidCategory(String),

    #[error("invalid date format: {0} (expected YYYY-MM-DD)")]
    InvalidDateFormat(String),

    #[error("invalid amount: {0} (must be greater than zero)")]
    InvalidAmount(f64),

    #[error("invalid description: {0}")]
    InvalidDescription(String),

    #[error("no fields to update")]
    NoFieldsToUpdate,
}

// ============================================================================
// OPERATION ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum ExpenseError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("expense not found: {0}")]
    NotFound(String),

    /// Storage failed to commit or read. Never retried by the core.
    #[error("persistence error: {0}")]
    Persistence(String),
}

impl ExpenseError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ExpenseError::NotFound(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ExpenseError::Validation(_))
    }
}

impl From<rusqlite::Error> for ExpenseError {
    fn from(err: rusqlite::Error) -> Self {
        ExpenseError::Persistence(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ExpenseError>;
