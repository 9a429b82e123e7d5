// 📊 Aggregation Engine - dashboard figures derived from a snapshot
//
// Nothing here is cached: every report recomputes from the records it is
// given. "Today" is an argument so month boundaries are testable.

use crate::entities::Expense;
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

// ============================================================================
// CURRENT MONTH FILTER
// ============================================================================

/// Half-open date range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl MonthRange {
    /// The calendar month containing `today`; December rolls into January
    pub fn containing(today: NaiveDate) -> Self {
        let start = today - Duration::days(i64::from(today.day0()));

        let (year, month) = if today.month() == 12 {
            (today.year() + 1, 1)
        } else {
            (today.year(), today.month() + 1)
        };
        let end = NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MAX);

        MonthRange { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }
}

// ============================================================================
// REPORT TYPES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_expenses: f64,
    pub total_count: usize,
    pub average_expense: f64,
    pub categories_used: usize,
    pub monthly_total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub category: String,
    pub total: f64,
    pub count: usize,
    pub percentage: f64,
}

// ============================================================================
// REPORTS
// ============================================================================

/// Totals over the whole collection, plus the current month's total
pub fn dashboard_stats(expenses: &[Expense], today: NaiveDate) -> DashboardStats {
    let total_expenses: f64 = expenses.iter().map(|e| e.amount).sum();
    let total_count = expenses.len();

    let average_expense = if total_count > 0 {
        total_expenses / total_count as f64
    } else {
        0.0
    };

    let categories_used = expenses
        .iter()
        .map(|e| e.category.as_str())
        .collect::<BTreeSet<_>>()
        .len();

    let month = MonthRange::containing(today);
    let monthly_total = expenses
        .iter()
        .filter(|e| month.contains(e.date))
        .map(|e| e.amount)
        .sum();

    DashboardStats {
        total_expenses,
        total_count,
        average_expense,
        categories_used,
        monthly_total,
    }
}

/// Per-category share of the current month, largest total first
///
/// Equal totals are ordered by category name. A month with no records
/// yields an empty list.
pub fn category_summaries(expenses: &[Expense], today: NaiveDate) -> Vec<CategorySummary> {
    let month = MonthRange::containing(today);

    let mut by_category: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    let mut grand_total = 0.0;

    for expense in expenses.iter().filter(|e| month.contains(e.date)) {
        let entry = by_category.entry(expense.category.as_str()).or_insert((0.0, 0));
        entry.0 += expense.amount;
        entry.1 += 1;
        grand_total += expense.amount;
    }

    let mut summaries: Vec<CategorySummary> = by_category
        .into_iter()
        .map(|(category, (total, count))| CategorySummary {
            category: category.to_string(),
            total,
            count,
            percentage: if grand_total > 0.0 {
                total / grand_total * 100.0
            } else {
                0.0
            },
        })
        .collect();

    summaries.sort_by(|a, b| match b.total.total_cmp(&a.total) {
        Ordering::Equal => a.category.cmp(&b.category),
        other => other,
    });

    summaries
}
