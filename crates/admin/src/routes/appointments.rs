//! Appointment management route handlers (admin side).

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use serde::Deserialize;

use solara_core::{Appointment, AppointmentId, AppointmentStatus, ProfessionalId};

use crate::db::AppointmentRepository;
use crate::error::AppError;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// Appointment listing filters.
#[derive(Debug, Deserialize)]
pub struct AppointmentListQuery {
    pub date: Option<NaiveDate>,
    pub professional_id: Option<ProfessionalId>,
}

/// Status transition request.
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: AppointmentStatus,
}

/// List appointments by date and/or professional.
///
/// # Errors
///
/// Returns 500 if the database query fails.
pub async fn list(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Query(query): Query<AppointmentListQuery>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let appointments = AppointmentRepository::new(state.pool())
        .list(query.date, query.professional_id)
        .await?;
    Ok(Json(appointments))
}

/// Move an appointment through its lifecycle (confirm, complete, cancel,
/// no-show).
///
/// # Errors
///
/// Returns 404 for unknown appointments, 422 for disallowed transitions.
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<i32>,
    Json(body): Json<StatusRequest>,
) -> Result<Json<Appointment>, AppError> {
    let appointment = AppointmentRepository::new(state.pool())
        .update_status(AppointmentId::new(id), body.status)
        .await?;
    Ok(Json(appointment))
}
