//! Service catalog repository (admin side).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use solara_core::{Price, Service, ServiceCategory, ServiceId};

use super::professionals::Removal;
use super::RepositoryError;

#[derive(Debug, sqlx::FromRow)]
struct ServiceRow {
    id: i32,
    name: String,
    category: String,
    price: Decimal,
    duration_minutes: i32,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ServiceRow> for Service {
    type Error = RepositoryError;

    fn try_from(row: ServiceRow) -> Result<Self, Self::Error> {
        let category: ServiceCategory = row
            .category
            .parse()
            .map_err(RepositoryError::DataCorruption)?;
        let duration_minutes = u32::try_from(row.duration_minutes).map_err(|_| {
            RepositoryError::DataCorruption(format!("negative duration for service {}", row.id))
        })?;

        Ok(Self {
            id: ServiceId::new(row.id),
            name: row.name,
            category,
            price: Price::brl(row.price),
            duration_minutes,
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const SERVICE_COLUMNS: &str =
    "id, name, category, price, duration_minutes, active, created_at, updated_at";

/// Repository for service catalog management.
pub struct ServiceRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ServiceRepository<'a> {
    /// Create a new service repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all services, active first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Service>, RepositoryError> {
        let rows = sqlx::query_as::<_, ServiceRow>(&format!(
            "SELECT {SERVICE_COLUMNS} FROM service ORDER BY active DESC, name"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get a service by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ServiceId) -> Result<Option<Service>, RepositoryError> {
        let row = sqlx::query_as::<_, ServiceRow>(&format!(
            "SELECT {SERVICE_COLUMNS} FROM service WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Create a service.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Invalid` for a non-positive duration or
    /// negative price.
    pub async fn create(
        &self,
        name: &str,
        category: ServiceCategory,
        price: Decimal,
        duration_minutes: u32,
    ) -> Result<Service, RepositoryError> {
        validate_service(price, duration_minutes)?;

        let row = sqlx::query_as::<_, ServiceRow>(&format!(
            "INSERT INTO service (name, category, price, duration_minutes)
             VALUES ($1, $2, $3, $4)
             RETURNING {SERVICE_COLUMNS}"
        ))
        .bind(name)
        .bind(category.to_string())
        .bind(price)
        .bind(i32::try_from(duration_minutes).unwrap_or(i32::MAX))
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// Update a service.
    ///
    /// Duration changes only affect future bookings; existing appointments
    /// keep their end times.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the service doesn't exist.
    pub async fn update(
        &self,
        id: ServiceId,
        name: &str,
        category: ServiceCategory,
        price: Decimal,
        duration_minutes: u32,
        active: bool,
    ) -> Result<Service, RepositoryError> {
        validate_service(price, duration_minutes)?;

        let row = sqlx::query_as::<_, ServiceRow>(&format!(
            "UPDATE service
             SET name = $1, category = $2, price = $3, duration_minutes = $4,
                 active = $5, updated_at = now()
             WHERE id = $6
             RETURNING {SERVICE_COLUMNS}"
        ))
        .bind(name)
        .bind(category.to_string())
        .bind(price)
        .bind(i32::try_from(duration_minutes).unwrap_or(i32::MAX))
        .bind(active)
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    /// Delete a service, falling back to deactivation when appointments or
    /// comanda lines reference it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the service doesn't exist.
    pub async fn remove(&self, id: ServiceId) -> Result<Removal, RepositoryError> {
        let result = sqlx::query("DELETE FROM service WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await;

        match result {
            Ok(done) if done.rows_affected() > 0 => Ok(Removal::Deleted),
            Ok(_) => Err(RepositoryError::NotFound),
            Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => {
                sqlx::query("UPDATE service SET active = FALSE, updated_at = now() WHERE id = $1")
                    .bind(id.as_i32())
                    .execute(self.pool)
                    .await?;
                Ok(Removal::Deactivated)
            }
            Err(e) => Err(RepositoryError::Database(e)),
        }
    }
}

/// Shared service field validation.
fn validate_service(price: Decimal, duration_minutes: u32) -> Result<(), RepositoryError> {
    if price < Decimal::ZERO {
        return Err(RepositoryError::Invalid(
            "price cannot be negative".to_owned(),
        ));
    }
    if duration_minutes == 0 {
        return Err(RepositoryError::Invalid(
            "duration must be positive".to_owned(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_service() {
        assert!(validate_service(Decimal::new(100, 0), 30).is_ok());
        assert!(matches!(
            validate_service(Decimal::new(-1, 0), 30),
            Err(RepositoryError::Invalid(_))
        ));
        assert!(matches!(
            validate_service(Decimal::ZERO, 0),
            Err(RepositoryError::Invalid(_))
        ));
    }
}
