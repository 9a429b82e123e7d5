// 📐 Shape Layer - Expense Payload Validation
// Validates incoming payloads before they reach the store. Pure: no I/O.

use crate::entities::{CategoryRegistry, ExpenseChanges, ExpenseDraft, ExpenseUpdate, NewExpense};
use crate::error::ValidationError;
use chrono::NaiveDate;

pub const MAX_DESCRIPTION_CHARS: usize = 200;

// ============================================================================
// FIELD RULES
// ============================================================================

/// Parse an exact `YYYY-MM-DD` calendar date
///
/// Rejects unpadded fields (`2024-3-5`), other separators, extra characters
/// and days that do not exist on the calendar.
pub fn parse_expense_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    let invalid = || ValidationError::InvalidDateFormat(raw.to_string());

    let bytes = raw.as_bytes();
    if bytes.len() != 10 {
        return Err(invalid());
    }
    let shape_ok = bytes.iter().enumerate().all(|(i, b)| match i {
        4 | 7 => *b == b'-',
        _ => b.is_ascii_digit(),
    });
    if !shape_ok {
        return Err(invalid());
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| invalid())
}

fn check_description(description: &str) -> Result<(), ValidationError> {
    let chars = description.chars().count();
    if chars == 0 {
        return Err(ValidationError::InvalidDescription(
            "must not be empty".to_string(),
        ));
    }
    if chars > MAX_DESCRIPTION_CHARS {
        return Err(ValidationError::InvalidDescription(format!(
            "must be at most {} characters, got {}",
            MAX_DESCRIPTION_CHARS, chars
        )));
    }
    Ok(())
}

fn check_amount(amount: f64) -> Result<(), ValidationError> {
    // NaN fails the comparison, infinity is rejected explicitly
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidAmount(amount))
    }
}

// ============================================================================
// EXPENSE VALIDATOR
// ============================================================================

#[derive(Debug, Clone)]
pub struct ExpenseValidator {
    categories: CategoryRegistry,
}

impl ExpenseValidator {
    pub fn new(categories: CategoryRegistry) -> Self {
        ExpenseValidator { categories }
    }

    pub fn categories(&self) -> &CategoryRegistry {
        &self.categories
    }

    fn check_category(&self, category: &str) -> Result<(), ValidationError> {
        if self.categories.contains(category) {
            Ok(())
        } else {
            Err(ValidationError::InvalidCategory(category.to_string()))
        }
    }

    /// Validate a full create payload; the first failing field wins
    pub fn validate_new(&self, payload: &NewExpense) -> Result<ExpenseDraft, ValidationError> {
        check_description(&payload.description)?;
        check_amount(payload.amount)?;
        self.check_category(&payload.category)?;
        let date = parse_expense_date(&payload.date)?;

        Ok(ExpenseDraft {
            description: payload.description.clone(),
            amount: payload.amount,
            category: payload.category.clone(),
            date,
        })
    }

    /// Shape checks on a partial payload that need no registry lookup
    /// (description length, amount sign). Run before the record is looked up.
    pub fn check_update_values(&self, payload: &ExpenseUpdate) -> Result<(), ValidationError> {
        if let Some(description) = &payload.description {
            check_description(description)?;
        }
        if let Some(amount) = payload.amount {
            check_amount(amount)?;
        }
        Ok(())
    }

    /// Validate only the fields present in a partial payload
    ///
    /// An empty payload is valid here; the store decides whether there is
    /// anything to write.
    pub fn validate_update(&self, payload: &ExpenseUpdate) -> Result<ExpenseChanges, ValidationError> {
        self.check_update_values(payload)?;
        if let Some(category) = &payload.category {
            self.check_category(category)?;
        }
        let date = payload
            .date
            .as_deref()
            .map(parse_expense_date)
            .transpose()?;

        Ok(ExpenseChanges {
            description: payload.description.clone(),
            amount: payload.amount,
            category: payload.category.clone(),
            date,
        })
    }
}

impl Default for ExpenseValidator {
    fn default() -> Self {
        Self::new(CategoryRegistry::with_defaults())
    }
}
