//! Appointment availability route handler.

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use solara_core::slots::{TimeSlot, available_starts};
use solara_core::{ProfessionalId, ServiceId};

use crate::db::{AppointmentRepository, CatalogRepository};
use crate::error::AppError;
use crate::state::AppState;

/// Slot grid granularity, in minutes.
pub const SLOT_STEP_MINUTES: u32 = 15;

/// Query parameters for the availability lookup.
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub professional_id: ProfessionalId,
    pub service_id: ServiceId,
    pub date: NaiveDate,
}

/// One bookable slot.
#[derive(Debug, Serialize)]
pub struct SlotResponse {
    pub starts_at: NaiveTime,
    pub ends_at: NaiveTime,
}

/// Availability response.
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub professional_id: ProfessionalId,
    pub service_id: ServiceId,
    pub date: NaiveDate,
    pub duration_minutes: u32,
    pub slots: Vec<SlotResponse>,
}

/// Compute open slots for a professional, service and date.
///
/// Days the professional doesn't work yield an empty slot list, not an
/// error. Time-of-day filtering for "today" is left to the caller.
///
/// # Errors
///
/// Returns 404 for unknown or inactive services/professionals.
pub async fn show(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let catalog = CatalogRepository::new(state.pool());

    let service = catalog
        .get_service(query.service_id)
        .await?
        .filter(|s| s.active)
        .ok_or_else(|| AppError::NotFound(format!("service {}", query.service_id)))?;

    let professional = catalog
        .get_professional(query.professional_id)
        .await?
        .filter(|p| p.active)
        .ok_or_else(|| {
            AppError::NotFound(format!("professional {}", query.professional_id))
        })?;

    let appointments = AppointmentRepository::new(state.pool());

    let slots = match appointments
        .working_window(professional.id, query.date.weekday())
        .await?
    {
        Some(window) => {
            let busy = appointments
                .busy_intervals(professional.id, query.date)
                .await?;
            compute_slots(window, service.duration_minutes, &busy)
        }
        // Day off: no window, no slots.
        None => Vec::new(),
    };

    Ok(Json(AvailabilityResponse {
        professional_id: professional.id,
        service_id: service.id,
        date: query.date,
        duration_minutes: service.duration_minutes,
        slots,
    }))
}

/// Run the core slot computation and pair each start with its end time.
fn compute_slots(window: TimeSlot, duration_minutes: u32, busy: &[TimeSlot]) -> Vec<SlotResponse> {
    let duration = chrono::Duration::minutes(i64::from(duration_minutes));
    available_starts(window, duration_minutes, SLOT_STEP_MINUTES, busy)
        .into_iter()
        .map(|starts_at| SlotResponse {
            starts_at,
            ends_at: starts_at + duration,
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_compute_slots_pairs_ends() {
        let window = TimeSlot::new(t(9, 0), t(10, 0));
        let slots = compute_slots(window, 30, &[]);

        let pairs: Vec<(NaiveTime, NaiveTime)> =
            slots.iter().map(|s| (s.starts_at, s.ends_at)).collect();
        assert_eq!(
            pairs,
            vec![
                (t(9, 0), t(9, 30)),
                (t(9, 15), t(9, 45)),
                (t(9, 30), t(10, 0)),
            ]
        );
    }
}
