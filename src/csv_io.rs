// 📂 CSV import/export
//
// Import goes through the tracker, so every row is validated exactly like an
// API request. Rows are committed one by one: a bad row stops the import but
// keeps the rows already written before it.

use crate::entities::{Expense, NewExpense};
use crate::tracker::ExpenseTracker;
use anyhow::{Context, Result};
use std::io::{Read, Write};

/// Read `description,amount,category,date` rows and create one expense per row
pub fn import_csv<R: Read>(tracker: &ExpenseTracker, reader: R) -> Result<Vec<Expense>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut created = Vec::new();

    for (index, result) in rdr.deserialize::<NewExpense>().enumerate() {
        // header is line 1
        let line = index + 2;
        let payload = result.with_context(|| format!("Failed to parse CSV line {}", line))?;
        let expense = tracker
            .create_expense(&payload)
            .with_context(|| format!("Rejected CSV line {}", line))?;
        created.push(expense);
    }

    Ok(created)
}

/// Write every given expense with a header row; returns the number of rows written
pub fn export_csv<W: Write>(expenses: &[Expense], writer: W) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(writer);

    for expense in expenses {
        wtr.serialize(expense)
            .with_context(|| format!("Failed to write expense {}", expense.id))?;
    }
    wtr.flush().context("Failed to flush CSV output")?;

    Ok(expenses.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Page;

    #[test]
    fn test_import_creates_validated_rows() {
        let tracker = ExpenseTracker::in_memory().unwrap();
        let data = "description,amount,category,date\n\
                    Groceries,54.20,Food,2024-03-02\n\
                    Metro card,30,Transport,2024-03-03\n";

        let created = import_csv(&tracker, data.as_bytes()).unwrap();

        assert_eq!(created.len(), 2);
        assert_eq!(tracker.store().count().unwrap(), 2);
        assert_eq!(created[1].category, "Transport");
    }

    #[test]
    fn test_import_stops_at_invalid_row() {
        let tracker = ExpenseTracker::in_memory().unwrap();
        let data = "description,amount,category,date\n\
                    Groceries,54.20,Food,2024-03-02\n\
                    Mystery,10,Invalid,2024-03-03\n\
                    Never,5,Food,2024-03-04\n";

        let err = import_csv(&tracker, data.as_bytes()).unwrap_err();

        assert!(err.to_string().contains("line 3"), "got: {}", err);
        assert_eq!(tracker.store().count().unwrap(), 1);
    }

    #[test]
    fn test_import_reports_unparseable_amount() {
        let tracker = ExpenseTracker::in_memory().unwrap();
        let data = "description,amount,category,date\nLunch,abc,Food,2024-03-02\n";

        let err = import_csv(&tracker, data.as_bytes()).unwrap_err();

        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_export_writes_header_and_rows() {
        let tracker = ExpenseTracker::in_memory().unwrap();
        tracker
            .create_expense(&NewExpense::new("Cinema", 12.5, "Leisure", "2024-03-09"))
            .unwrap();

        let expenses = tracker.list_expenses(Page::default()).unwrap();
        let mut out = Vec::new();
        let written = export_csv(&expenses, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(written, 1);
        assert!(text.starts_with("id,description,amount,category,date,created_at\n"));
        assert!(text.contains("Cinema,12.5,Leisure,2024-03-09,"));
    }
}
