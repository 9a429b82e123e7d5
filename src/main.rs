use anyhow::{bail, Context, Result};
use std::env;
use std::fs::File;
use tracing::info;

use expense_tracker::csv_io::{export_csv, import_csv};
use expense_tracker::{Config, ExpenseStore, ExpenseTracker, Page, DEFAULT_PAGE_LIMIT};

const USAGE: &str = "Usage: expense-tracker <command>

Commands:
  categories              List valid categories
  stats                   Dashboard totals and current-month breakdown
  list [limit] [offset]   Most recent expenses first
  import <file.csv>       Create expenses from description,amount,category,date rows
  export <file.csv>       Write every expense to a CSV file

Environment:
  EXPENSES_DB             SQLite database path (default: expenses.db)
  EXPENSES_CATEGORIES     Comma-separated category override";

fn main() -> Result<()> {
    expense_tracker::init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(command) = args.first() else {
        println!("{}", USAGE);
        return Ok(());
    };

    let config = Config::from_env()?;
    let store = ExpenseStore::open(&config.db_path)
        .with_context(|| format!("Failed to open database {:?}", config.db_path))?;
    info!("Database opened: {:?}", config.db_path);
    let tracker = ExpenseTracker::new(config.categories, store);

    match command.as_str() {
        "categories" => run_categories(&tracker),
        "stats" => run_stats(&tracker)?,
        "list" => run_list(&tracker, &args[1..])?,
        "import" => run_import(&tracker, args.get(1))?,
        "export" => run_export(&tracker, args.get(1))?,
        other => bail!("Unknown command: {}\n\n{}", other, USAGE),
    }

    Ok(())
}

fn run_categories(tracker: &ExpenseTracker) {
    for category in tracker.categories() {
        println!("{}", category);
    }
}

fn run_stats(tracker: &ExpenseTracker) -> Result<()> {
    let stats = tracker.dashboard_stats()?;

    println!("📊 Dashboard");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Total expenses:   {:.2}", stats.total_expenses);
    println!("Count:            {}", stats.total_count);
    println!("Average:          {:.2}", stats.average_expense);
    println!("Categories used:  {}", stats.categories_used);
    println!("This month:       {:.2}", stats.monthly_total);

    let summaries = tracker.category_summaries()?;
    if summaries.is_empty() {
        println!("\nNo expenses this month.");
        return Ok(());
    }

    println!("\n🏷️  This month by category");
    for summary in summaries {
        println!(
            "  {:<12} {:>10.2}  {:>3} items  {:>6.2}%",
            summary.category, summary.total, summary.count, summary.percentage
        );
    }

    Ok(())
}

fn run_list(tracker: &ExpenseTracker, rest: &[String]) -> Result<()> {
    let limit = match rest.first() {
        Some(raw) => raw.parse().with_context(|| format!("Invalid limit: {}", raw))?,
        None => DEFAULT_PAGE_LIMIT,
    };
    let offset = match rest.get(1) {
        Some(raw) => raw.parse().with_context(|| format!("Invalid offset: {}", raw))?,
        None => 0,
    };

    for expense in tracker.list_expenses(Page::new(limit, offset))? {
        println!(
            "{}  {}  {:<12} {:>10.2}  {}",
            expense.id, expense.date, expense.category, expense.amount, expense.description
        );
    }

    Ok(())
}

fn run_import(tracker: &ExpenseTracker, path: Option<&String>) -> Result<()> {
    let Some(path) = path else {
        bail!("import needs a CSV file path");
    };

    let file = File::open(path).with_context(|| format!("Failed to open {}", path))?;
    let created = import_csv(tracker, file)?;

    info!("Imported {} expenses from {}", created.len(), path);
    println!("✓ Imported {} expenses", created.len());
    Ok(())
}

fn run_export(tracker: &ExpenseTracker, path: Option<&String>) -> Result<()> {
    let Some(path) = path else {
        bail!("export needs a CSV file path");
    };

    let expenses = tracker.store().all()?;
    let file = File::create(path).with_context(|| format!("Failed to create {}", path))?;
    let written = export_csv(&expenses, file)?;

    info!("Exported {} expenses to {}", written, path);
    println!("✓ Exported {} expenses", written);
    Ok(())
}
