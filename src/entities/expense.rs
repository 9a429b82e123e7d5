// 💸 Expense Entity - the only persisted record
//
// Identity (id) and created_at are assigned by the store and never change.
// Everything else is a value the caller supplies and may later correct.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// EXPENSE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expense {
    /// Stable identity (UUID v4)
    pub id: String,

    pub description: String,

    /// Always strictly positive
    pub amount: f64,

    /// Member of the category registry at write time
    pub category: String,

    /// When the expense happened (not when it was recorded)
    pub date: NaiveDate,

    /// When the record was created, in UTC
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// INCOMING PAYLOADS (unvalidated, as received from a caller)
// ============================================================================

/// Full payload for creating an expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpense {
    pub description: String,
    pub amount: f64,
    pub category: String,
    /// Raw `YYYY-MM-DD` text; parsed by the validator
    pub date: String,
}

impl NewExpense {
    pub fn new(
        description: impl Into<String>,
        amount: f64,
        category: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        NewExpense {
            description: description.into(),
            amount,
            category: category.into(),
            date: date.into(),
        }
    }
}

/// Partial payload for updating an expense; `None` means "leave unchanged"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseUpdate {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

impl ExpenseUpdate {
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.amount.is_none()
            && self.category.is_none()
            && self.date.is_none()
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }
}

// ============================================================================
// VALIDATED PAYLOADS (only the validator builds these)
// ============================================================================

/// A create payload that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseDraft {
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub date: NaiveDate,
}

/// An update payload that passed validation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseChanges {
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
}

impl ExpenseChanges {
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.amount.is_none()
            && self.category.is_none()
            && self.date.is_none()
    }

    /// Merge supplied fields into an existing record; id and created_at are untouched
    pub fn apply_to(&self, expense: &mut Expense) {
        if let Some(description) = &self.description {
            expense.description = description.clone();
        }
        if let Some(amount) = self.amount {
            expense.amount = amount;
        }
        if let Some(category) = &self.category {
            expense.category = category.clone();
        }
        if let Some(date) = self.date {
            expense.date = date;
        }
    }
}
