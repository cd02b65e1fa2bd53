//! Appointment repository (admin side): schedule views and status
//! transitions.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::PgPool;

use solara_core::{
    Appointment, AppointmentId, AppointmentStatus, ClientId, ProfessionalId, ServiceId,
};

use super::RepositoryError;

#[derive(Debug, sqlx::FromRow)]
struct AppointmentRow {
    id: i32,
    client_id: i32,
    professional_id: i32,
    service_id: i32,
    date: NaiveDate,
    starts_at: NaiveTime,
    ends_at: NaiveTime,
    status: String,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AppointmentRow> for Appointment {
    type Error = RepositoryError;

    fn try_from(row: AppointmentRow) -> Result<Self, Self::Error> {
        let status: AppointmentStatus = row
            .status
            .parse()
            .map_err(RepositoryError::DataCorruption)?;

        Ok(Self {
            id: AppointmentId::new(row.id),
            client_id: ClientId::new(row.client_id),
            professional_id: ProfessionalId::new(row.professional_id),
            service_id: ServiceId::new(row.service_id),
            date: row.date,
            starts_at: row.starts_at,
            ends_at: row.ends_at,
            status,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const APPOINTMENT_COLUMNS: &str = "id, client_id, professional_id, service_id, date, \
     starts_at, ends_at, status, notes, created_at, updated_at";

/// Repository for appointment database operations (admin side).
pub struct AppointmentRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AppointmentRepository<'a> {
    /// Create a new appointment repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List appointments, optionally filtered by date and professional.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        date: Option<NaiveDate>,
        professional_id: Option<ProfessionalId>,
    ) -> Result<Vec<Appointment>, RepositoryError> {
        let rows = sqlx::query_as::<_, AppointmentRow>(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointment
             WHERE ($1::date IS NULL OR date = $1)
               AND ($2::int IS NULL OR professional_id = $2)
             ORDER BY date DESC, starts_at"
        ))
        .bind(date)
        .bind(professional_id.map(|p| p.as_i32()))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get an appointment by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(
        &self,
        id: AppointmentId,
    ) -> Result<Option<Appointment>, RepositoryError> {
        let row = sqlx::query_as::<_, AppointmentRow>(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointment WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Move an appointment to a new status, enforcing the transition rules.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the appointment doesn't exist.
    /// Returns `RepositoryError::Invalid` for a disallowed transition.
    pub async fn update_status(
        &self,
        id: AppointmentId,
        next: AppointmentStatus,
    ) -> Result<Appointment, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let current: Option<(String,)> =
            sqlx::query_as("SELECT status FROM appointment WHERE id = $1 FOR UPDATE")
                .bind(id.as_i32())
                .fetch_optional(&mut *tx)
                .await?;

        let (current,) = current.ok_or(RepositoryError::NotFound)?;
        let current: AppointmentStatus =
            current.parse().map_err(RepositoryError::DataCorruption)?;

        if !current.can_transition_to(next) {
            return Err(RepositoryError::Invalid(format!(
                "cannot move appointment from {current} to {next}"
            )));
        }

        let row = sqlx::query_as::<_, AppointmentRow>(&format!(
            "UPDATE appointment SET status = $1, updated_at = now()
             WHERE id = $2
             RETURNING {APPOINTMENT_COLUMNS}"
        ))
        .bind(next.to_string())
        .bind(id.as_i32())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        row.try_into()
    }
}
