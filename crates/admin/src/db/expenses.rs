//! Expense (despesa) repository.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use solara_core::{ExpenseCategory, ExpenseId};

use super::RepositoryError;
use crate::models::Expense;

#[derive(Debug, sqlx::FromRow)]
struct ExpenseRow {
    id: i32,
    description: String,
    category: String,
    amount: Decimal,
    date: NaiveDate,
    created_at: DateTime<Utc>,
}

impl TryFrom<ExpenseRow> for Expense {
    type Error = RepositoryError;

    fn try_from(row: ExpenseRow) -> Result<Self, Self::Error> {
        let category: ExpenseCategory = row
            .category
            .parse()
            .map_err(RepositoryError::DataCorruption)?;

        Ok(Self {
            id: ExpenseId::new(row.id),
            description: row.description,
            category,
            amount: row.amount,
            date: row.date,
            created_at: row.created_at,
        })
    }
}

const EXPENSE_COLUMNS: &str = "id, description, category, amount, date, created_at";

/// Repository for expense database operations.
pub struct ExpenseRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ExpenseRepository<'a> {
    /// Create a new expense repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List expenses, optionally filtered by date range and category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        category: Option<ExpenseCategory>,
    ) -> Result<Vec<Expense>, RepositoryError> {
        let rows = sqlx::query_as::<_, ExpenseRow>(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expense
             WHERE ($1::date IS NULL OR date >= $1)
               AND ($2::date IS NULL OR date <= $2)
               AND ($3::text IS NULL OR category = $3)
             ORDER BY date DESC, id DESC"
        ))
        .bind(from)
        .bind(to)
        .bind(category.map(|c| c.to_string()))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get an expense by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ExpenseId) -> Result<Option<Expense>, RepositoryError> {
        let row = sqlx::query_as::<_, ExpenseRow>(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expense WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Record an expense.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Invalid` for a non-positive amount.
    pub async fn create(
        &self,
        description: &str,
        category: ExpenseCategory,
        amount: Decimal,
        date: NaiveDate,
    ) -> Result<Expense, RepositoryError> {
        if amount <= Decimal::ZERO {
            return Err(RepositoryError::Invalid(
                "amount must be positive".to_owned(),
            ));
        }

        let row = sqlx::query_as::<_, ExpenseRow>(&format!(
            "INSERT INTO expense (description, category, amount, date)
             VALUES ($1, $2, $3, $4)
             RETURNING {EXPENSE_COLUMNS}"
        ))
        .bind(description)
        .bind(category.to_string())
        .bind(amount)
        .bind(date)
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// Update an expense.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the expense doesn't exist.
    pub async fn update(
        &self,
        id: ExpenseId,
        description: &str,
        category: ExpenseCategory,
        amount: Decimal,
        date: NaiveDate,
    ) -> Result<Expense, RepositoryError> {
        if amount <= Decimal::ZERO {
            return Err(RepositoryError::Invalid(
                "amount must be positive".to_owned(),
            ));
        }

        let row = sqlx::query_as::<_, ExpenseRow>(&format!(
            "UPDATE expense
             SET description = $1, category = $2, amount = $3, date = $4
             WHERE id = $5
             RETURNING {EXPENSE_COLUMNS}"
        ))
        .bind(description)
        .bind(category.to_string())
        .bind(amount)
        .bind(date)
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    /// Delete an expense.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the expense doesn't exist.
    pub async fn delete(&self, id: ExpenseId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM expense WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
