//! Scheduling domain types.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use super::id::{AppointmentId, ClientId, ProfessionalId, ServiceId};
use super::status::AppointmentStatus;

/// A booked appointment.
///
/// The end time is fixed at creation as start + service duration; editing a
/// service's duration later never moves existing bookings.
#[derive(Debug, Clone, Serialize)]
pub struct Appointment {
    /// Unique appointment ID.
    pub id: AppointmentId,
    /// Client who booked.
    pub client_id: ClientId,
    /// Professional performing the service.
    pub professional_id: ProfessionalId,
    /// Service to be performed.
    pub service_id: ServiceId,
    /// Salon-local date of the appointment.
    pub date: NaiveDate,
    /// Start time (salon-local wall clock).
    pub starts_at: NaiveTime,
    /// End time (exclusive).
    pub ends_at: NaiveTime,
    /// Lifecycle status.
    pub status: AppointmentStatus,
    /// Optional note from the client ("fringe trim only").
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
