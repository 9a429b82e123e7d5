// Expense Tracker - Core Library
// Exposes all modules for use in the CLI, the API server, and tests

pub mod config;
pub mod csv_io;
pub mod dashboard;
pub mod db;
pub mod entities;
pub mod error;
pub mod schema;
pub mod tracker;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use config::Config;
pub use dashboard::{category_summaries, dashboard_stats, CategorySummary, DashboardStats, MonthRange};
pub use db::{ExpenseStore, Page, DEFAULT_PAGE_LIMIT};
pub use entities::{
    CategoryRegistry, Expense, ExpenseChanges, ExpenseDraft, ExpenseUpdate, NewExpense,
    DEFAULT_CATEGORIES,
};
pub use error::{ExpenseError, ValidationError};
pub use schema::{parse_expense_date, ExpenseValidator};
pub use tracker::ExpenseTracker;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Install the fmt subscriber used by both binaries (`RUST_LOG` overrides the default `info`).
/// Logs go to stderr so CLI output on stdout stays clean.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
