//! Professional management route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use solara_core::{BlockedHours, BlockedHoursId, Email, Professional, ProfessionalId, WorkingHours};

use crate::db::professionals::{weekday_from_index, weekday_to_index};
use crate::db::{ProfessionalRepository, Removal};
use crate::error::AppError;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// Professional create/update request.
#[derive(Debug, Deserialize)]
pub struct ProfessionalRequest {
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub can_manage_schedule: bool,
    #[serde(default)]
    pub can_sell_products: bool,
    #[serde(default)]
    pub commission_percent: Decimal,
    #[serde(default = "default_active")]
    pub active: bool,
}

const fn default_active() -> bool {
    true
}

/// One weekday window on the wire: weekday is 0-6, Monday first.
#[derive(Debug, Serialize, Deserialize)]
pub struct WorkingHoursDto {
    pub weekday: i16,
    pub starts_at: NaiveTime,
    pub ends_at: NaiveTime,
}

/// Blocked-hours creation request.
#[derive(Debug, Deserialize)]
pub struct BlockedHoursRequest {
    pub date: NaiveDate,
    pub starts_at: NaiveTime,
    pub ends_at: NaiveTime,
    #[serde(default)]
    pub reason: String,
}

/// Query for the blocked-hours listing.
#[derive(Debug, Deserialize)]
pub struct BlockedHoursQuery {
    pub date: Option<NaiveDate>,
}

/// List all professionals.
///
/// # Errors
///
/// Returns 500 if the database query fails.
pub async fn list(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
) -> Result<Json<Vec<Professional>>, AppError> {
    let professionals = ProfessionalRepository::new(state.pool()).list().await?;
    Ok(Json(professionals))
}

/// Show one professional.
///
/// # Errors
///
/// Returns 404 for unknown professionals.
pub async fn show(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<i32>,
) -> Result<Json<Professional>, AppError> {
    let professional = ProfessionalRepository::new(state.pool())
        .get_by_id(ProfessionalId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("professional {id}")))?;
    Ok(Json(professional))
}

/// Create a professional.
///
/// # Errors
///
/// Returns 409 for duplicate emails, 422 for invalid fields.
pub async fn create(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Json(body): Json<ProfessionalRequest>,
) -> Result<(StatusCode, Json<Professional>), AppError> {
    validate_commission(body.commission_percent)?;
    let email = parse_email(&body.email)?;

    let professional = ProfessionalRepository::new(state.pool())
        .create(
            &email,
            body.name.trim(),
            body.can_manage_schedule,
            body.can_sell_products,
            body.commission_percent,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(professional)))
}

/// Update a professional.
///
/// # Errors
///
/// Returns 404 for unknown professionals, 422 for invalid fields.
pub async fn update(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<i32>,
    Json(body): Json<ProfessionalRequest>,
) -> Result<Json<Professional>, AppError> {
    validate_commission(body.commission_percent)?;
    let email = parse_email(&body.email)?;

    let professional = ProfessionalRepository::new(state.pool())
        .update(
            ProfessionalId::new(id),
            &email,
            body.name.trim(),
            body.can_manage_schedule,
            body.can_sell_products,
            body.commission_percent,
            body.active,
        )
        .await?;
    Ok(Json(professional))
}

/// Delete a professional; falls back to deactivation when they carry
/// history.
///
/// # Errors
///
/// Returns 404 for unknown professionals.
pub async fn remove(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    match ProfessionalRepository::new(state.pool())
        .remove(ProfessionalId::new(id))
        .await?
    {
        Removal::Deleted => Ok(StatusCode::NO_CONTENT),
        // Deactivated rather than deleted; the row still exists.
        Removal::Deactivated => Ok(StatusCode::OK),
    }
}

/// Get a professional's weekly working-hours grid.
///
/// # Errors
///
/// Returns 500 if the database query fails.
pub async fn working_hours(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<i32>,
) -> Result<Json<Vec<WorkingHoursDto>>, AppError> {
    let hours = ProfessionalRepository::new(state.pool())
        .working_hours(ProfessionalId::new(id))
        .await?;

    Ok(Json(
        hours
            .into_iter()
            .map(|w| WorkingHoursDto {
                weekday: weekday_to_index(w.weekday),
                starts_at: w.starts_at,
                ends_at: w.ends_at,
            })
            .collect(),
    ))
}

/// Replace a professional's weekly working-hours grid.
///
/// # Errors
///
/// Returns 422 for invalid weekdays or inverted windows.
pub async fn replace_working_hours(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<i32>,
    Json(body): Json<Vec<WorkingHoursDto>>,
) -> Result<StatusCode, AppError> {
    let hours = body
        .into_iter()
        .map(|dto| {
            let weekday = weekday_from_index(dto.weekday).ok_or_else(|| {
                AppError::Unprocessable(format!("invalid weekday {}", dto.weekday))
            })?;
            Ok(WorkingHours {
                weekday,
                starts_at: dto.starts_at,
                ends_at: dto.ends_at,
            })
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    ProfessionalRepository::new(state.pool())
        .replace_working_hours(ProfessionalId::new(id), &hours)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Add a blocked interval.
///
/// # Errors
///
/// Returns 404 for unknown professionals, 422 for inverted intervals.
pub async fn add_blocked_hours(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<i32>,
    Json(body): Json<BlockedHoursRequest>,
) -> Result<(StatusCode, Json<BlockedHours>), AppError> {
    let blocked = ProfessionalRepository::new(state.pool())
        .add_blocked_hours(
            ProfessionalId::new(id),
            body.date,
            body.starts_at,
            body.ends_at,
            body.reason.trim(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(blocked)))
}

/// List blocked intervals, optionally for one date.
///
/// # Errors
///
/// Returns 500 if the database query fails.
pub async fn list_blocked_hours(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<i32>,
    Query(query): Query<BlockedHoursQuery>,
) -> Result<Json<Vec<BlockedHours>>, AppError> {
    let blocked = ProfessionalRepository::new(state.pool())
        .list_blocked_hours(ProfessionalId::new(id), query.date)
        .await?;
    Ok(Json(blocked))
}

/// Delete a blocked interval.
///
/// # Errors
///
/// Returns 404 for unknown intervals.
pub async fn delete_blocked_hours(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path((id, blocked_id)): Path<(i32, i32)>,
) -> Result<StatusCode, AppError> {
    ProfessionalRepository::new(state.pool())
        .delete_blocked_hours(ProfessionalId::new(id), BlockedHoursId::new(blocked_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Commission must be a percentage.
fn validate_commission(percent: Decimal) -> Result<(), AppError> {
    if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
        return Err(AppError::Unprocessable(
            "commission must be between 0 and 100".to_string(),
        ));
    }
    Ok(())
}

/// Parse and 422-map an email field.
fn parse_email(raw: &str) -> Result<Email, AppError> {
    Email::parse(raw.trim()).map_err(|e| AppError::Unprocessable(e.to_string()))
}
