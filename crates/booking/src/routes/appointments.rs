//! Appointment booking route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{Datelike, Duration, Local, NaiveDate, NaiveTime};
use serde::Deserialize;
use tracing::instrument;

use solara_core::slots::TimeSlot;
use solara_core::{Appointment, ProfessionalId, ServiceId};

use crate::db::{AppointmentRepository, CatalogRepository};
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Appointment booking request.
#[derive(Debug, Deserialize)]
pub struct CreateAppointmentRequest {
    pub professional_id: ProfessionalId,
    pub service_id: ServiceId,
    pub date: NaiveDate,
    pub starts_at: NaiveTime,
    pub notes: Option<String>,
}

/// Book an appointment.
///
/// Validates that the service and professional are active, the slot lies in
/// the future and inside the professional's working window, then inserts
/// with an in-transaction conflict re-check (the availability endpoint is
/// advisory; this is the authoritative check).
///
/// # Errors
///
/// Returns 404 for unknown service/professional, 422 for past or
/// out-of-window slots, 409 when the slot was taken concurrently.
#[instrument(skip(state, body), fields(client_id = %current.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Json(body): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    let catalog = CatalogRepository::new(state.pool());

    let service = catalog
        .get_service(body.service_id)
        .await?
        .filter(|s| s.active)
        .ok_or_else(|| AppError::NotFound(format!("service {}", body.service_id)))?;

    let professional = catalog
        .get_professional(body.professional_id)
        .await?
        .filter(|p| p.active)
        .ok_or_else(|| AppError::NotFound(format!("professional {}", body.professional_id)))?;

    let now = Local::now();
    if body.date < now.date_naive()
        || (body.date == now.date_naive() && body.starts_at <= now.time())
    {
        return Err(AppError::Unprocessable(
            "appointment must be in the future".to_string(),
        ));
    }

    let duration = Duration::minutes(i64::from(service.duration_minutes));
    let (ends_at, wrapped_days) = body.starts_at.overflowing_add_signed(duration);
    if wrapped_days != 0 {
        return Err(AppError::Unprocessable(
            "appointment cannot cross midnight".to_string(),
        ));
    }

    let appointments = AppointmentRepository::new(state.pool());

    let window = appointments
        .working_window(professional.id, body.date.weekday())
        .await?
        .ok_or_else(|| {
            AppError::Unprocessable("professional does not work on this day".to_string())
        })?;

    let candidate = TimeSlot::new(body.starts_at, ends_at);
    if candidate.start < window.start || candidate.end > window.end {
        return Err(AppError::Unprocessable(
            "slot is outside working hours".to_string(),
        ));
    }

    let appointment = appointments
        .create(
            current.id,
            professional.id,
            service.id,
            body.date,
            body.starts_at,
            ends_at,
            body.notes.as_deref(),
        )
        .await?;

    tracing::info!(appointment_id = %appointment.id, "appointment booked");
    Ok((StatusCode::CREATED, Json(appointment)))
}

/// List the client's own appointments, newest first.
///
/// # Errors
///
/// Returns 500 if the database query fails.
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let appointments = AppointmentRepository::new(state.pool())
        .list_for_client(current.id)
        .await?;
    Ok(Json(appointments))
}

/// Cancel one of the client's own appointments.
///
/// # Errors
///
/// Returns 404 for unknown/foreign appointments, 409 when the appointment
/// is already resolved.
pub async fn cancel(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(id): Path<i32>,
) -> Result<Json<Appointment>, AppError> {
    let appointment = AppointmentRepository::new(state.pool())
        .cancel_for_client(id.into(), current.id)
        .await?;
    Ok(Json(appointment))
}
