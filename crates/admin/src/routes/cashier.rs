//! Cash register route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use solara_core::{CashMovementKind, CashRegisterId};

use crate::db::CashierRepository;
use crate::error::AppError;
use crate::middleware::RequireAdminAuth;
use crate::models::{CashMovement, CashRegister, CashRegisterSummary};
use crate::state::AppState;

/// Open-register request.
#[derive(Debug, Deserialize)]
pub struct OpenRegisterRequest {
    pub opening_amount: Decimal,
}

/// Close-register request: the counted drawer amount.
#[derive(Debug, Deserialize)]
pub struct CloseRegisterRequest {
    pub closing_amount: Decimal,
}

/// Manual movement request.
#[derive(Debug, Deserialize)]
pub struct MovementRequest {
    pub kind: CashMovementKind,
    pub amount: Decimal,
    pub description: String,
}

/// History filters.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Open a register shift.
///
/// # Errors
///
/// Returns 409 if a register is already open.
#[instrument(skip(state, body), fields(opening_amount = %body.opening_amount))]
pub async fn open(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Json(body): Json<OpenRegisterRequest>,
) -> Result<(StatusCode, Json<CashRegister>), AppError> {
    let register = CashierRepository::new(state.pool())
        .open(body.opening_amount, admin.id)
        .await?;

    tracing::info!(register_id = %register.id, opened_by = %admin.id, "cash register opened");
    Ok((StatusCode::CREATED, Json(register)))
}

/// Close the open register with the counted amount.
///
/// The response includes the expected amount and the difference, which is
/// the closing report.
///
/// # Errors
///
/// Returns 422 when no register is open.
#[instrument(skip(state, body), fields(closing_amount = %body.closing_amount))]
pub async fn close(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Json(body): Json<CloseRegisterRequest>,
) -> Result<Json<CashRegisterSummary>, AppError> {
    let summary = CashierRepository::new(state.pool())
        .close(body.closing_amount, admin.id)
        .await?;

    tracing::info!(
        register_id = %summary.register.id,
        closed_by = %admin.id,
        expected = %summary.expected_amount,
        "cash register closed"
    );
    Ok(Json(summary))
}

/// Show the open register with running drawer arithmetic.
///
/// # Errors
///
/// Returns 404 when no register is open.
pub async fn current(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
) -> Result<Json<CashRegisterSummary>, AppError> {
    let summary = CashierRepository::new(state.pool())
        .current()
        .await?
        .ok_or_else(|| AppError::NotFound("no open cash register".to_string()))?;
    Ok(Json(summary))
}

/// Record a deposit (reforço) or withdrawal (sangria).
///
/// # Errors
///
/// Returns 422 when no register is open or the amount is not positive.
pub async fn add_movement(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Json(body): Json<MovementRequest>,
) -> Result<(StatusCode, Json<CashMovement>), AppError> {
    let description = body.description.trim();
    if description.is_empty() {
        return Err(AppError::Unprocessable(
            "description cannot be empty".to_string(),
        ));
    }

    let movement = CashierRepository::new(state.pool())
        .add_movement(body.kind, body.amount, description, admin.id)
        .await?;
    Ok((StatusCode::CREATED, Json(movement)))
}

/// List closed register shifts.
///
/// # Errors
///
/// Returns 500 if the database query fails.
pub async fn history(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<CashRegister>>, AppError> {
    let registers = CashierRepository::new(state.pool())
        .history(query.from, query.to)
        .await?;
    Ok(Json(registers))
}

/// List a register's movements.
///
/// # Errors
///
/// Returns 500 if the database query fails.
pub async fn list_movements(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<i32>,
) -> Result<Json<Vec<CashMovement>>, AppError> {
    let movements = CashierRepository::new(state.pool())
        .list_movements(CashRegisterId::new(id))
        .await?;
    Ok(Json(movements))
}
