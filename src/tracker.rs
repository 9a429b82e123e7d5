// 🧾 Expense Tracker - the operations callers (HTTP, CLI) actually use
// Validator in front of the store for writes, store into the reports for reads.

use crate::dashboard::{self, CategorySummary, DashboardStats};
use crate::db::{ExpenseStore, Page};
use crate::entities::{CategoryRegistry, Expense, ExpenseUpdate, NewExpense};
use crate::error::Result;
use crate::schema::ExpenseValidator;
use chrono::{Local, NaiveDate};

pub struct ExpenseTracker {
    validator: ExpenseValidator,
    store: ExpenseStore,
    today: fn() -> NaiveDate,
}

impl ExpenseTracker {
    pub fn new(categories: CategoryRegistry, store: ExpenseStore) -> Self {
        ExpenseTracker {
            validator: ExpenseValidator::new(categories),
            store,
            today,
        }
    }

    /// Replace the calendar used for the current-month reports
    pub fn with_today(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// In-memory store with the default categories
    pub fn in_memory() -> Result<Self> {
        Ok(Self::new(
            CategoryRegistry::with_defaults(),
            ExpenseStore::open_in_memory()?,
        ))
    }

    pub fn store(&self) -> &ExpenseStore {
        &self.store
    }

    // ========================================================================
    // CATEGORIES
    // ========================================================================

    pub fn categories(&self) -> &[String] {
        self.validator.categories().labels()
    }

    // ========================================================================
    // EXPENSES
    // ========================================================================

    pub fn create_expense(&self, payload: &NewExpense) -> Result<Expense> {
        let draft = self.validator.validate_new(payload)?;
        self.store.create(draft)
    }

    pub fn list_expenses(&self, page: Page) -> Result<Vec<Expense>> {
        self.store.list(page)
    }

    pub fn get_expense(&self, id: &str) -> Result<Expense> {
        self.store.get(id)
    }

    /// Check order: description/amount, then existence, then category/date,
    /// then emptiness. Category and date are checked inside the store's lock.
    pub fn update_expense(&self, id: &str, payload: &ExpenseUpdate) -> Result<Expense> {
        self.validator.check_update_values(payload)?;
        self.store
            .update_with(id, |_| Ok(self.validator.validate_update(payload)?))
    }

    pub fn delete_expense(&self, id: &str) -> Result<()> {
        self.store.delete(id)
    }

    // ========================================================================
    // REPORTS
    // ========================================================================

    pub fn dashboard_stats(&self) -> Result<DashboardStats> {
        self.dashboard_stats_on((self.today)())
    }

    pub fn dashboard_stats_on(&self, today: NaiveDate) -> Result<DashboardStats> {
        let snapshot = self.store.all()?;
        Ok(dashboard::dashboard_stats(&snapshot, today))
    }

    pub fn category_summaries(&self) -> Result<Vec<CategorySummary>> {
        self.category_summaries_on((self.today)())
    }

    pub fn category_summaries_on(&self, today: NaiveDate) -> Result<Vec<CategorySummary>> {
        let snapshot = self.store.all()?;
        Ok(dashboard::category_summaries(&snapshot, today))
    }
}

/// Local calendar date, used for the current-month filter
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
