//! Expense (despesa) route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use solara_core::{ExpenseCategory, ExpenseId};

use crate::db::ExpenseRepository;
use crate::error::AppError;
use crate::middleware::RequireAdminAuth;
use crate::models::Expense;
use crate::state::AppState;

/// Expense create/update request.
#[derive(Debug, Deserialize)]
pub struct ExpenseRequest {
    pub description: String,
    #[serde(default)]
    pub category: ExpenseCategory,
    pub amount: Decimal,
    pub date: NaiveDate,
}

/// Expense listing filters.
#[derive(Debug, Deserialize)]
pub struct ExpenseListQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub category: Option<ExpenseCategory>,
}

/// List expenses.
///
/// # Errors
///
/// Returns 500 if the database query fails.
pub async fn list(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Query(query): Query<ExpenseListQuery>,
) -> Result<Json<Vec<Expense>>, AppError> {
    let expenses = ExpenseRepository::new(state.pool())
        .list(query.from, query.to, query.category)
        .await?;
    Ok(Json(expenses))
}

/// Show one expense.
///
/// # Errors
///
/// Returns 404 for unknown expenses.
pub async fn show(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<i32>,
) -> Result<Json<Expense>, AppError> {
    let expense = ExpenseRepository::new(state.pool())
        .get_by_id(ExpenseId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("expense {id}")))?;
    Ok(Json(expense))
}

/// Record an expense.
///
/// # Errors
///
/// Returns 422 for a non-positive amount.
pub async fn create(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Json(body): Json<ExpenseRequest>,
) -> Result<(StatusCode, Json<Expense>), AppError> {
    let expense = ExpenseRepository::new(state.pool())
        .create(body.description.trim(), body.category, body.amount, body.date)
        .await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

/// Update an expense.
///
/// # Errors
///
/// Returns 404 for unknown expenses, 422 for invalid amounts.
pub async fn update(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<i32>,
    Json(body): Json<ExpenseRequest>,
) -> Result<Json<Expense>, AppError> {
    let expense = ExpenseRepository::new(state.pool())
        .update(
            ExpenseId::new(id),
            body.description.trim(),
            body.category,
            body.amount,
            body.date,
        )
        .await?;
    Ok(Json(expense))
}

/// Delete an expense.
///
/// # Errors
///
/// Returns 404 for unknown expenses.
pub async fn remove(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    ExpenseRepository::new(state.pool())
        .delete(ExpenseId::new(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
