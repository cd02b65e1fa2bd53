//! Professional repository: CRUD, working hours, and blocked hours.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc, Weekday};
use rust_decimal::Decimal;
use sqlx::PgPool;

use solara_core::{BlockedHours, BlockedHoursId, Email, Professional, ProfessionalId, WorkingHours};

use super::RepositoryError;

#[derive(Debug, sqlx::FromRow)]
struct ProfessionalRow {
    id: i32,
    name: String,
    email: String,
    can_manage_schedule: bool,
    can_sell_products: bool,
    commission_percent: Decimal,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProfessionalRow> for Professional {
    type Error = RepositoryError;

    fn try_from(row: ProfessionalRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: ProfessionalId::new(row.id),
            name: row.name,
            email,
            can_manage_schedule: row.can_manage_schedule,
            can_sell_products: row.can_sell_products,
            commission_percent: row.commission_percent,
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct WorkingHoursRow {
    weekday: i16,
    starts_at: NaiveTime,
    ends_at: NaiveTime,
}

impl TryFrom<WorkingHoursRow> for WorkingHours {
    type Error = RepositoryError;

    fn try_from(row: WorkingHoursRow) -> Result<Self, Self::Error> {
        let weekday = weekday_from_index(row.weekday).ok_or_else(|| {
            RepositoryError::DataCorruption(format!("invalid weekday {}", row.weekday))
        })?;

        Ok(Self {
            weekday,
            starts_at: row.starts_at,
            ends_at: row.ends_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct BlockedHoursRow {
    id: i32,
    professional_id: i32,
    date: NaiveDate,
    starts_at: NaiveTime,
    ends_at: NaiveTime,
    reason: String,
}

impl From<BlockedHoursRow> for BlockedHours {
    fn from(row: BlockedHoursRow) -> Self {
        Self {
            id: BlockedHoursId::new(row.id),
            professional_id: ProfessionalId::new(row.professional_id),
            date: row.date,
            starts_at: row.starts_at,
            ends_at: row.ends_at,
            reason: row.reason,
        }
    }
}

/// Monday-first weekday index (0-6), matching the `working_hours.weekday`
/// column.
#[must_use]
pub fn weekday_to_index(weekday: Weekday) -> i16 {
    i16::try_from(weekday.num_days_from_monday()).unwrap_or(0)
}

/// Inverse of [`weekday_to_index`].
#[must_use]
pub const fn weekday_from_index(index: i16) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Mon),
        1 => Some(Weekday::Tue),
        2 => Some(Weekday::Wed),
        3 => Some(Weekday::Thu),
        4 => Some(Weekday::Fri),
        5 => Some(Weekday::Sat),
        6 => Some(Weekday::Sun),
        _ => None,
    }
}

/// Outcome of a delete request for an entity that may carry history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// Row was deleted outright.
    Deleted,
    /// Row is referenced by history and was deactivated instead.
    Deactivated,
}

const PROFESSIONAL_COLUMNS: &str = "id, name, email, can_manage_schedule, can_sell_products, \
     commission_percent, active, created_at, updated_at";

/// Repository for professional database operations.
pub struct ProfessionalRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProfessionalRepository<'a> {
    /// Create a new professional repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all professionals, active first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Professional>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProfessionalRow>(&format!(
            "SELECT {PROFESSIONAL_COLUMNS} FROM professional ORDER BY active DESC, name"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get a professional by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(
        &self,
        id: ProfessionalId,
    ) -> Result<Option<Professional>, RepositoryError> {
        let row = sqlx::query_as::<_, ProfessionalRow>(&format!(
            "SELECT {PROFESSIONAL_COLUMNS} FROM professional WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Create a professional.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    pub async fn create(
        &self,
        email: &Email,
        name: &str,
        can_manage_schedule: bool,
        can_sell_products: bool,
        commission_percent: Decimal,
    ) -> Result<Professional, RepositoryError> {
        let row = sqlx::query_as::<_, ProfessionalRow>(&format!(
            "INSERT INTO professional
                 (email, name, can_manage_schedule, can_sell_products, commission_percent)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {PROFESSIONAL_COLUMNS}"
        ))
        .bind(email.as_str())
        .bind(name)
        .bind(can_manage_schedule)
        .bind(can_sell_products)
        .bind(commission_percent)
        .fetch_one(self.pool)
        .await
        .map_err(unique_to_conflict)?;

        row.try_into()
    }

    /// Update a professional's details and flags.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the professional doesn't exist.
    /// Returns `RepositoryError::Conflict` if the new email is taken.
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        id: ProfessionalId,
        email: &Email,
        name: &str,
        can_manage_schedule: bool,
        can_sell_products: bool,
        commission_percent: Decimal,
        active: bool,
    ) -> Result<Professional, RepositoryError> {
        let row = sqlx::query_as::<_, ProfessionalRow>(&format!(
            "UPDATE professional
             SET email = $1, name = $2, can_manage_schedule = $3, can_sell_products = $4,
                 commission_percent = $5, active = $6, updated_at = now()
             WHERE id = $7
             RETURNING {PROFESSIONAL_COLUMNS}"
        ))
        .bind(email.as_str())
        .bind(name)
        .bind(can_manage_schedule)
        .bind(can_sell_products)
        .bind(commission_percent)
        .bind(active)
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await
        .map_err(unique_to_conflict)?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    /// Delete a professional, falling back to deactivation when they are
    /// referenced by appointments or comanda history.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the professional doesn't exist.
    pub async fn remove(&self, id: ProfessionalId) -> Result<Removal, RepositoryError> {
        let result = sqlx::query("DELETE FROM professional WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await;

        match result {
            Ok(done) if done.rows_affected() > 0 => Ok(Removal::Deleted),
            Ok(_) => Err(RepositoryError::NotFound),
            Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => {
                sqlx::query(
                    "UPDATE professional SET active = FALSE, updated_at = now() WHERE id = $1",
                )
                .bind(id.as_i32())
                .execute(self.pool)
                .await?;
                Ok(Removal::Deactivated)
            }
            Err(e) => Err(RepositoryError::Database(e)),
        }
    }

    /// Get a professional's weekly working-hours grid.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn working_hours(
        &self,
        id: ProfessionalId,
    ) -> Result<Vec<WorkingHours>, RepositoryError> {
        let rows = sqlx::query_as::<_, WorkingHoursRow>(
            "SELECT weekday, starts_at, ends_at FROM working_hours
             WHERE professional_id = $1
             ORDER BY weekday",
        )
        .bind(id.as_i32())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Replace a professional's weekly working-hours grid atomically.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the professional doesn't exist.
    /// Returns `RepositoryError::Invalid` for windows with `end <= start`.
    pub async fn replace_working_hours(
        &self,
        id: ProfessionalId,
        hours: &[WorkingHours],
    ) -> Result<(), RepositoryError> {
        for window in hours {
            if window.ends_at <= window.starts_at {
                return Err(RepositoryError::Invalid(
                    "working hours must end after they start".to_owned(),
                ));
            }
        }

        let mut tx = self.pool.begin().await?;

        let exists: Option<(i32,)> =
            sqlx::query_as("SELECT id FROM professional WHERE id = $1 FOR UPDATE")
                .bind(id.as_i32())
                .fetch_optional(&mut *tx)
                .await?;
        if exists.is_none() {
            return Err(RepositoryError::NotFound);
        }

        sqlx::query("DELETE FROM working_hours WHERE professional_id = $1")
            .bind(id.as_i32())
            .execute(&mut *tx)
            .await?;

        for window in hours {
            sqlx::query(
                "INSERT INTO working_hours (professional_id, weekday, starts_at, ends_at)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(id.as_i32())
            .bind(weekday_to_index(window.weekday))
            .bind(window.starts_at)
            .bind(window.ends_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_unique_violation()
                {
                    return RepositoryError::Invalid(
                        "at most one working window per weekday".to_owned(),
                    );
                }
                RepositoryError::Database(e)
            })?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Add a blocked interval for a professional on a date.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the professional doesn't exist.
    /// Returns `RepositoryError::Invalid` for intervals with `end <= start`.
    pub async fn add_blocked_hours(
        &self,
        id: ProfessionalId,
        date: NaiveDate,
        starts_at: NaiveTime,
        ends_at: NaiveTime,
        reason: &str,
    ) -> Result<BlockedHours, RepositoryError> {
        if ends_at <= starts_at {
            return Err(RepositoryError::Invalid(
                "blocked hours must end after they start".to_owned(),
            ));
        }

        let row = sqlx::query_as::<_, BlockedHoursRow>(
            "INSERT INTO blocked_hours (professional_id, date, starts_at, ends_at, reason)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, professional_id, date, starts_at, ends_at, reason",
        )
        .bind(id.as_i32())
        .bind(date)
        .bind(starts_at)
        .bind(ends_at)
        .bind(reason)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::NotFound;
            }
            RepositoryError::Database(e)
        })?;

        Ok(row.into())
    }

    /// List a professional's blocked intervals, optionally for one date.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_blocked_hours(
        &self,
        id: ProfessionalId,
        date: Option<NaiveDate>,
    ) -> Result<Vec<BlockedHours>, RepositoryError> {
        let rows = match date {
            Some(d) => {
                sqlx::query_as::<_, BlockedHoursRow>(
                    "SELECT id, professional_id, date, starts_at, ends_at, reason
                     FROM blocked_hours
                     WHERE professional_id = $1 AND date = $2
                     ORDER BY starts_at",
                )
                .bind(id.as_i32())
                .bind(d)
                .fetch_all(self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, BlockedHoursRow>(
                    "SELECT id, professional_id, date, starts_at, ends_at, reason
                     FROM blocked_hours
                     WHERE professional_id = $1
                     ORDER BY date, starts_at",
                )
                .bind(id.as_i32())
                .fetch_all(self.pool)
                .await?
            }
        };

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Delete a blocked interval.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the interval doesn't exist or
    /// belongs to another professional.
    pub async fn delete_blocked_hours(
        &self,
        id: ProfessionalId,
        blocked_id: BlockedHoursId,
    ) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("DELETE FROM blocked_hours WHERE id = $1 AND professional_id = $2")
                .bind(blocked_id.as_i32())
                .bind(id.as_i32())
                .execute(self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

/// Map unique violations to `Conflict`, everything else to `Database`.
fn unique_to_conflict(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict("email already exists".to_owned());
    }
    RepositoryError::Database(e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_index_roundtrip() {
        for weekday in [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ] {
            let index = weekday_to_index(weekday);
            assert_eq!(weekday_from_index(index), Some(weekday));
        }
    }

    #[test]
    fn test_weekday_from_invalid_index() {
        assert_eq!(weekday_from_index(7), None);
        assert_eq!(weekday_from_index(-1), None);
    }
}
