//! Appointment repository: schedule reads and slot-safe booking writes.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc, Weekday};
use sqlx::PgPool;

use solara_core::slots::TimeSlot;
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

#[derive(Debug, sqlx::FromRow)]
struct IntervalRow {
    starts_at: NaiveTime,
    ends_at: NaiveTime,
}

const APPOINTMENT_COLUMNS: &str = "id, client_id, professional_id, service_id, date, \
     starts_at, ends_at, status, notes, created_at, updated_at";

/// Repository for appointment database operations (booking side).
pub struct AppointmentRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AppointmentRepository<'a> {
    /// Create a new appointment repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a professional's working window for a weekday, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn working_window(
        &self,
        professional_id: ProfessionalId,
        weekday: Weekday,
    ) -> Result<Option<TimeSlot>, RepositoryError> {
        let row = sqlx::query_as::<_, IntervalRow>(
            "SELECT starts_at, ends_at FROM working_hours
             WHERE professional_id = $1 AND weekday = $2",
        )
        .bind(professional_id.as_i32())
        .bind(i16::try_from(weekday.num_days_from_monday()).unwrap_or(0))
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| TimeSlot::new(r.starts_at, r.ends_at)))
    }

    /// Collect every busy interval for a professional on a date:
    /// non-canceled appointments plus blocked hours.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn busy_intervals(
        &self,
        professional_id: ProfessionalId,
        date: NaiveDate,
    ) -> Result<Vec<TimeSlot>, RepositoryError> {
        let rows = sqlx::query_as::<_, IntervalRow>(
            "SELECT starts_at, ends_at FROM appointment
             WHERE professional_id = $1 AND date = $2 AND status <> 'canceled'
             UNION ALL
             SELECT starts_at, ends_at FROM blocked_hours
             WHERE professional_id = $1 AND date = $2",
        )
        .bind(professional_id.as_i32())
        .bind(date)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| TimeSlot::new(r.starts_at, r.ends_at))
            .collect())
    }

    /// Create an appointment, re-checking the slot inside a transaction.
    ///
    /// The professional row is locked `FOR UPDATE` so two competing bookings
    /// for the same professional serialize; the conflict checks then see any
    /// appointment committed by the winner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slot overlaps an existing
    /// appointment or blocked interval.
    /// Returns `RepositoryError::NotFound` if the professional vanished.
    pub async fn create(
        &self,
        client_id: ClientId,
        professional_id: ProfessionalId,
        service_id: ServiceId,
        date: NaiveDate,
        starts_at: NaiveTime,
        ends_at: NaiveTime,
        notes: Option<&str>,
    ) -> Result<Appointment, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let locked: Option<(i32,)> =
            sqlx::query_as("SELECT id FROM professional WHERE id = $1 FOR UPDATE")
                .bind(professional_id.as_i32())
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Err(RepositoryError::NotFound);
        }

        let conflicts: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM (
                 SELECT starts_at, ends_at FROM appointment
                 WHERE professional_id = $1 AND date = $2 AND status <> 'canceled'
                 UNION ALL
                 SELECT starts_at, ends_at FROM blocked_hours
                 WHERE professional_id = $1 AND date = $2
             ) busy
             WHERE busy.starts_at < $4 AND busy.ends_at > $3",
        )
        .bind(professional_id.as_i32())
        .bind(date)
        .bind(starts_at)
        .bind(ends_at)
        .fetch_one(&mut *tx)
        .await?;

        if conflicts > 0 {
            return Err(RepositoryError::Conflict(
                "slot is no longer available".to_owned(),
            ));
        }

        let row = sqlx::query_as::<_, AppointmentRow>(&format!(
            "INSERT INTO appointment
                 (client_id, professional_id, service_id, date, starts_at, ends_at, status, notes)
             VALUES ($1, $2, $3, $4, $5, $6, 'scheduled', $7)
             RETURNING {APPOINTMENT_COLUMNS}"
        ))
        .bind(client_id.as_i32())
        .bind(professional_id.as_i32())
        .bind(service_id.as_i32())
        .bind(date)
        .bind(starts_at)
        .bind(ends_at)
        .bind(notes)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        row.try_into()
    }

    /// List a client's appointments, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_client(
        &self,
        client_id: ClientId,
    ) -> Result<Vec<Appointment>, RepositoryError> {
        let rows = sqlx::query_as::<_, AppointmentRow>(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointment
             WHERE client_id = $1
             ORDER BY date DESC, starts_at DESC"
        ))
        .bind(client_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Cancel a client's own appointment.
    ///
    /// Only `scheduled` and `confirmed` appointments can be canceled.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the appointment doesn't exist
    /// or belongs to another client.
    /// Returns `RepositoryError::Conflict` if it is already resolved.
    pub async fn cancel_for_client(
        &self,
        id: AppointmentId,
        client_id: ClientId,
    ) -> Result<Appointment, RepositoryError> {
        let row = sqlx::query_as::<_, AppointmentRow>(&format!(
            "UPDATE appointment SET status = 'canceled', updated_at = now()
             WHERE id = $1 AND client_id = $2 AND status IN ('scheduled', 'confirmed')
             RETURNING {APPOINTMENT_COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(client_id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(row) => row.try_into(),
            None => {
                // Distinguish "not yours / missing" from "already resolved".
                let exists: Option<(i32,)> = sqlx::query_as(
                    "SELECT id FROM appointment WHERE id = $1 AND client_id = $2",
                )
                .bind(id.as_i32())
                .bind(client_id.as_i32())
                .fetch_optional(self.pool)
                .await?;

                match exists {
                    Some(_) => Err(RepositoryError::Conflict(
                        "appointment can no longer be canceled".to_owned(),
                    )),
                    None => Err(RepositoryError::NotFound),
                }
            }
        }
    }
}
