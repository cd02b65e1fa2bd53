//! Expense (despesa) domain type.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use solara_core::{ExpenseCategory, ExpenseId};

/// A salon expense, counted against revenue in the reports.
#[derive(Debug, Clone, Serialize)]
pub struct Expense {
    /// Unique expense ID.
    pub id: ExpenseId,
    /// What the money was spent on.
    pub description: String,
    /// Category used for report grouping.
    pub category: ExpenseCategory,
    /// Always positive.
    pub amount: Decimal,
    /// Day the expense applies to (not necessarily the day it was entered).
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}
