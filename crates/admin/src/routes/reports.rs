//! Report route handlers.

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::db::ReportRepository;
use crate::db::reports::{CommissionEntry, RevenueDay, TopServiceEntry};
use crate::error::AppError;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// Default ranking size for the top-services report.
const DEFAULT_TOP_LIMIT: i64 = 10;

/// Date-range query shared by the reports.
#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Top-services query: range plus optional limit.
#[derive(Debug, Deserialize)]
pub struct TopServicesQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub limit: Option<i64>,
}

/// Revenue report: per-day gross split by payment method, with the range's
/// expense total and resulting net.
#[derive(Debug, Serialize)]
pub struct RevenueReport {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub days: Vec<RevenueDay>,
    pub gross_total: Decimal,
    pub expense_total: Decimal,
    pub net_total: Decimal,
}

/// Gross revenue minus expenses over a date range.
///
/// # Errors
///
/// Returns 422 for an inverted range.
pub async fn revenue(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Query(query): Query<RangeQuery>,
) -> Result<Json<RevenueReport>, AppError> {
    validate_range(&query)?;

    let reports = ReportRepository::new(state.pool());
    let days = reports.revenue_by_day(query.from, query.to).await?;
    let expense_total = reports.expense_total(query.from, query.to).await?;

    let gross_total: Decimal = days.iter().map(|d| d.gross).sum();
    let net_total = gross_total - expense_total;

    Ok(Json(RevenueReport {
        from: query.from,
        to: query.to,
        days,
        gross_total,
        expense_total,
        net_total,
    }))
}

/// Commission per professional over a date range.
///
/// # Errors
///
/// Returns 422 for an inverted range.
pub async fn commissions(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Vec<CommissionEntry>>, AppError> {
    validate_range(&query)?;

    let entries = ReportRepository::new(state.pool())
        .commissions(query.from, query.to)
        .await?;
    Ok(Json(entries))
}

/// Services ranked by sales count over a date range.
///
/// # Errors
///
/// Returns 422 for an inverted range or non-positive limit.
pub async fn top_services(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Query(query): Query<TopServicesQuery>,
) -> Result<Json<Vec<TopServiceEntry>>, AppError> {
    if query.to < query.from {
        return Err(AppError::Unprocessable(
            "range must end on or after its start".to_string(),
        ));
    }

    let limit = query.limit.unwrap_or(DEFAULT_TOP_LIMIT);
    if limit <= 0 {
        return Err(AppError::Unprocessable(
            "limit must be positive".to_string(),
        ));
    }

    let entries = ReportRepository::new(state.pool())
        .top_services(query.from, query.to, limit)
        .await?;
    Ok(Json(entries))
}

/// Reject inverted ranges before hitting the database.
fn validate_range(query: &RangeQuery) -> Result<(), AppError> {
    if query.to < query.from {
        return Err(AppError::Unprocessable(
            "range must end on or after its start".to_string(),
        ));
    }
    Ok(())
}
