// Entity Models
//
// - Expense: the persisted record plus the payloads that create/update it
// - Category: the fixed registry an expense's category must belong to

pub mod category;
pub mod expense;

pub use category::{CategoryRegistry, DEFAULT_CATEGORIES};
pub use expense::{Expense, ExpenseChanges, ExpenseDraft, ExpenseUpdate, NewExpense};
