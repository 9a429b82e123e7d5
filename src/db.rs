// 🗄️ Expense Store - SQLite-backed collection of expense records
//
// Every operation runs while holding the connection lock, so single-record
// operations never interleave with each other.

use crate::entities::{Expense, ExpenseChanges, ExpenseDraft};
use crate::error::{ExpenseError, Result, ValidationError};
use chrono::{DateTime, NaiveDate, SecondsFormat, SubsecRound, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

pub const DEFAULT_PAGE_LIMIT: usize = 50;

const DATE_FORMAT: &str = "%Y-%m-%d";

const SELECT_COLUMNS: &str = "SELECT id, description, amount, category, date, created_at FROM expenses";

// ============================================================================
// PAGINATION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: usize,
    pub offset: usize,
}

impl Page {
    pub fn new(limit: usize, offset: usize) -> Self {
        Page { limit, offset }
    }
}

impl Default for Page {
    fn default() -> Self {
        Page {
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
        }
    }
}

// ============================================================================
// SCHEMA
// ============================================================================

pub fn setup_database(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS expenses (
            id TEXT PRIMARY KEY NOT NULL,
            description TEXT NOT NULL,
            amount REAL NOT NULL CHECK (amount > 0),
            category TEXT NOT NULL,
            date TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
        [],
    )?;

    // Listing order
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_expenses_created_at ON expenses(created_at DESC, id DESC)",
        [],
    )?;

    // Month filter
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date)",
        [],
    )?;

    Ok(())
}

/// Fixed-width RFC 3339 so that text order equals chronological order
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn row_to_expense(row: &Row) -> rusqlite::Result<Expense> {
    let date_str: String = row.get(4)?;
    let created_at_str: String = row.get(5)?;

    let date = NaiveDate::parse_from_str(&date_str, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;
    let created_at = DateTime::parse_from_rfc3339(&created_at_str)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?
        .with_timezone(&Utc);

    Ok(Expense {
        id: row.get(0)?,
        description: row.get(1)?,
        amount: row.get(2)?,
        category: row.get(3)?,
        date,
        created_at,
    })
}

fn find_by_id(conn: &Connection, id: &str) -> rusqlite::Result<Option<Expense>> {
    conn.query_row(
        &format!("{} WHERE id = ?1", SELECT_COLUMNS),
        [id],
        row_to_expense,
    )
    .optional()
}

// ============================================================================
// EXPENSE STORE
// ============================================================================

pub struct ExpenseStore {
    conn: Mutex<Connection>,
}

impl ExpenseStore {
    /// Open (or create) a database file, with WAL journaling
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        // journal_mode answers with the mode it settled on
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))?;
        Self::from_connection(conn)
    }

    /// Private in-memory database (tests, throwaway sessions)
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    pub fn from_connection(conn: Connection) -> Result<Self> {
        setup_database(&conn)?;
        Ok(ExpenseStore {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| ExpenseError::Persistence("connection lock poisoned".to_string()))
    }

    /// Persist a validated payload under a fresh id and creation timestamp
    pub fn create(&self, draft: ExpenseDraft) -> Result<Expense> {
        let expense = Expense {
            id: uuid::Uuid::new_v4().to_string(),
            description: draft.description,
            amount: draft.amount,
            category: draft.category,
            date: draft.date,
            // stored with microsecond precision; truncate so the returned value matches a re-read
            created_at: Utc::now().trunc_subsecs(6),
        };

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO expenses (id, description, amount, category, date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                expense.id,
                expense.description,
                expense.amount,
                expense.category,
                expense.date.format(DATE_FORMAT).to_string(),
                format_timestamp(&expense.created_at),
            ],
        )?;

        Ok(expense)
    }

    pub fn get(&self, id: &str) -> Result<Expense> {
        let conn = self.conn()?;
        find_by_id(&conn, id)?.ok_or_else(|| ExpenseError::NotFound(id.to_string()))
    }

    /// Most recent first; equal timestamps fall back to id so pages are deterministic
    pub fn list(&self, page: Page) -> Result<Vec<Expense>> {
        let limit = i64::try_from(page.limit).unwrap_or(i64::MAX);
        let offset = i64::try_from(page.offset).unwrap_or(i64::MAX);

        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} ORDER BY created_at DESC, id DESC LIMIT ?1 OFFSET ?2",
            SELECT_COLUMNS
        ))?;

        let expenses = stmt
            .query_map(params![limit, offset], row_to_expense)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(expenses)
    }

    /// Every record, in listing order (snapshot for aggregation)
    pub fn all(&self) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} ORDER BY created_at DESC, id DESC",
            SELECT_COLUMNS
        ))?;

        let expenses = stmt
            .query_map([], row_to_expense)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(expenses)
    }

    /// Merge supplied fields into an existing record and return the re-read result
    ///
    /// Existence check, write and re-read happen under one lock, so a
    /// concurrent delete cannot slip in between them.
    pub fn update(&self, id: &str, changes: &ExpenseChanges) -> Result<Expense> {
        self.update_with(id, |_| Ok(changes.clone()))
    }

    /// Like `update`, but the changes are produced after the record is found
    ///
    /// `prepare` runs under the lock once existence is confirmed, so an unknown
    /// id is reported as `NotFound` before any of its checks.
    pub fn update_with<F>(&self, id: &str, prepare: F) -> Result<Expense>
    where
        F: FnOnce(&Expense) -> Result<ExpenseChanges>,
    {
        let conn = self.conn()?;

        let mut expense =
            find_by_id(&conn, id)?.ok_or_else(|| ExpenseError::NotFound(id.to_string()))?;

        let changes = prepare(&expense)?;
        if changes.is_empty() {
            return Err(ValidationError::NoFieldsToUpdate.into());
        }

        changes.apply_to(&mut expense);

        conn.execute(
            "UPDATE expenses
             SET description = ?1, amount = ?2, category = ?3, date = ?4
             WHERE id = ?5",
            params![
                expense.description,
                expense.amount,
                expense.category,
                expense.date.format(DATE_FORMAT).to_string(),
                id,
            ],
        )?;

        find_by_id(&conn, id)?.ok_or_else(|| ExpenseError::NotFound(id.to_string()))
    }

    /// Permanent removal
    pub fn delete(&self, id: &str) -> Result<()> {
        let conn = self.conn()?;
        let removed = conn.execute("DELETE FROM expenses WHERE id = ?1", [id])?;

        if removed == 0 {
            return Err(ExpenseError::NotFound(id.to_string()));
        }
        Ok(())
    }

    pub fn count(&self) -> Result<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM expenses", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    /// Helper to build a validated payload without going through the validator
    fn draft(description: &str, amount: f64, category: &str, date: &str) -> ExpenseDraft {
        ExpenseDraft {
            description: description.to_string(),
            amount,
            category: category.to_string(),
            date: NaiveDate::parse_from_str(date, DATE_FORMAT).unwrap(),
        }
    }

    #[test]
    fn test_create_then_get_round_trip() {
        let store = ExpenseStore::open_in_memory().unwrap();

        let created = store.create(draft("Coffee", 4.5, "Food", "2024-03-15")).unwrap();
        let fetched = store.get(&created.id).unwrap();

        assert_eq!(created, fetched);
        assert_eq!(created.id.len(), 36, "UUID v4 string expected");
    }

    #[test]
    fn test_ids_are_unique() {
        let store = ExpenseStore::open_in_memory().unwrap();

        let a = store.create(draft("A", 1.0, "Food", "2024-03-15")).unwrap();
        let b = store.create(draft("A", 1.0, "Food", "2024-03-15")).unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let store = ExpenseStore::open_in_memory().unwrap();

        let err = store.get("does-not-exist").unwrap_err();

        assert!(err.is_not_found());
    }

    #[test]
    fn test_list_is_most_recent_first_and_paginates() {
        let store = ExpenseStore::open_in_memory().unwrap();

        let mut created = Vec::new();
        for i in 0..3 {
            created.push(
                store
                    .create(draft(&format!("E{}", i), 10.0, "Food", "2024-03-15"))
                    .unwrap(),
            );
            thread::sleep(std::time::Duration::from_millis(2));
        }

        let first = store.list(Page::new(2, 0)).unwrap();
        let second = store.list(Page::new(2, 1)).unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(first[0].id, created[2].id);
        assert_eq!(first[1], second[0]);

        let beyond = store.list(Page::new(10, 5)).unwrap();
        assert!(beyond.is_empty());
    }

    #[test]
    fn test_list_ties_broken_by_id() {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();
        for id in ["b", "c", "a"] {
            conn.execute(
                "INSERT INTO expenses (id, description, amount, category, date, created_at)
                 VALUES (?1, 'x', 1.0, 'Food', '2024-03-15', '2024-03-15T10:00:00.000000Z')",
                [id],
            )
            .unwrap();
        }
        let store = ExpenseStore::from_connection(conn).unwrap();

        let ids: Vec<String> = store.list(Page::default()).unwrap().into_iter().map(|e| e.id).collect();

        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_update_amount_only() {
        let store = ExpenseStore::open_in_memory().unwrap();
        let original = store.create(draft("Bus", 3.0, "Transport", "2024-03-10")).unwrap();

        let changes = ExpenseChanges {
            amount: Some(3.5),
            ..Default::default()
        };
        let updated = store.update(&original.id, &changes).unwrap();

        assert_eq!(updated.amount, 3.5);
        assert_eq!(updated.id, original.id);
        assert_eq!(updated.description, original.description);
        assert_eq!(updated.category, original.category);
        assert_eq!(updated.date, original.date);
        assert_eq!(updated.created_at, original.created_at);
        assert_eq!(store.get(&original.id).unwrap(), updated);
    }

    #[test]
    fn test_update_missing_then_empty() {
        let store = ExpenseStore::open_in_memory().unwrap();

        let missing = store.update("nope", &ExpenseChanges::default()).unwrap_err();
        assert!(missing.is_not_found(), "existence is checked before emptiness");

        let expense = store.create(draft("Bus", 3.0, "Transport", "2024-03-10")).unwrap();
        let empty = store.update(&expense.id, &ExpenseChanges::default()).unwrap_err();
        assert!(matches!(
            empty,
            ExpenseError::Validation(ValidationError::NoFieldsToUpdate)
        ));
    }

    #[test]
    fn test_update_with_prepares_only_for_existing_records() {
        let store = ExpenseStore::open_in_memory().unwrap();

        let missing = store
            .update_with("nope", |_| Err(ValidationError::InvalidCategory("Invalid".to_string()).into()))
            .unwrap_err();
        assert!(missing.is_not_found(), "unknown id wins over prepare's failure");

        let expense = store.create(draft("Bus", 3.0, "Transport", "2024-03-10")).unwrap();
        let rejected = store
            .update_with(&expense.id, |_| Err(ValidationError::InvalidCategory("Invalid".to_string()).into()))
            .unwrap_err();
        assert!(rejected.is_validation());
        assert_eq!(store.get(&expense.id).unwrap(), expense);
    }

    #[test]
    fn test_update_with_same_values_succeeds() {
        let store = ExpenseStore::open_in_memory().unwrap();
        let expense = store.create(draft("Bus", 3.0, "Transport", "2024-03-10")).unwrap();

        let changes = ExpenseChanges {
            amount: Some(3.0),
            ..Default::default()
        };

        assert_eq!(store.update(&expense.id, &changes).unwrap(), expense);
    }

    #[test]
    fn test_delete_is_final() {
        let store = ExpenseStore::open_in_memory().unwrap();
        let expense = store.create(draft("Movie", 20.0, "Leisure", "2024-03-01")).unwrap();

        store.delete(&expense.id).unwrap();

        assert!(store.get(&expense.id).unwrap_err().is_not_found());
        assert!(store.delete(&expense.id).unwrap_err().is_not_found());
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("expenses.db");

        let created = {
            let store = ExpenseStore::open(&path).unwrap();
            store.create(draft("Rent", 900.0, "Home", "2024-03-01")).unwrap()
        };

        let reopened = ExpenseStore::open(&path).unwrap();
        assert_eq!(reopened.get(&created.id).unwrap(), created);
    }

    #[test]
    fn test_concurrent_creates_all_land() {
        let store = Arc::new(ExpenseStore::open_in_memory().unwrap());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    store
                        .create(draft(&format!("T{}", i), 1.0 + i as f64, "Other", "2024-03-15"))
                        .unwrap()
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.count().unwrap(), 8);
        assert_eq!(store.all().unwrap().len(), 8);
    }
}
