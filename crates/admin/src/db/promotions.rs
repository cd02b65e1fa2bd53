//! Promotion repository (admin side).

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use solara_core::{Promotion, PromotionId};

use super::RepositoryError;

#[derive(Debug, sqlx::FromRow)]
struct PromotionRow {
    id: i32,
    name: String,
    description: String,
    discount_percent: i16,
    starts_on: NaiveDate,
    ends_on: NaiveDate,
    active: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<PromotionRow> for Promotion {
    type Error = RepositoryError;

    fn try_from(row: PromotionRow) -> Result<Self, Self::Error> {
        let discount_percent = u8::try_from(row.discount_percent).map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "discount out of range for promotion {}",
                row.id
            ))
        })?;

        Ok(Self {
            id: PromotionId::new(row.id),
            name: row.name,
            description: row.description,
            discount_percent,
            starts_on: row.starts_on,
            ends_on: row.ends_on,
            active: row.active,
            created_at: row.created_at,
        })
    }
}

const PROMOTION_COLUMNS: &str =
    "id, name, description, discount_percent, starts_on, ends_on, active, created_at";

/// Repository for promotion management.
pub struct PromotionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PromotionRepository<'a> {
    /// Create a new promotion repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all promotions, newest campaign first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Promotion>, RepositoryError> {
        let rows = sqlx::query_as::<_, PromotionRow>(&format!(
            "SELECT {PROMOTION_COLUMNS} FROM promotion ORDER BY starts_on DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get a promotion by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: PromotionId) -> Result<Option<Promotion>, RepositoryError> {
        let row = sqlx::query_as::<_, PromotionRow>(&format!(
            "SELECT {PROMOTION_COLUMNS} FROM promotion WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Create a promotion.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Invalid` for an inverted date range or a
    /// discount outside 0-100.
    pub async fn create(
        &self,
        name: &str,
        description: &str,
        discount_percent: u8,
        starts_on: NaiveDate,
        ends_on: NaiveDate,
    ) -> Result<Promotion, RepositoryError> {
        validate_promotion(discount_percent, starts_on, ends_on)?;

        let row = sqlx::query_as::<_, PromotionRow>(&format!(
            "INSERT INTO promotion (name, description, discount_percent, starts_on, ends_on)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {PROMOTION_COLUMNS}"
        ))
        .bind(name)
        .bind(description)
        .bind(i16::from(discount_percent))
        .bind(starts_on)
        .bind(ends_on)
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// Update a promotion.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the promotion doesn't exist.
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        id: PromotionId,
        name: &str,
        description: &str,
        discount_percent: u8,
        starts_on: NaiveDate,
        ends_on: NaiveDate,
        active: bool,
    ) -> Result<Promotion, RepositoryError> {
        validate_promotion(discount_percent, starts_on, ends_on)?;

        let row = sqlx::query_as::<_, PromotionRow>(&format!(
            "UPDATE promotion
             SET name = $1, description = $2, discount_percent = $3,
                 starts_on = $4, ends_on = $5, active = $6
             WHERE id = $7
             RETURNING {PROMOTION_COLUMNS}"
        ))
        .bind(name)
        .bind(description)
        .bind(i16::from(discount_percent))
        .bind(starts_on)
        .bind(ends_on)
        .bind(active)
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    /// Delete a promotion. Promotions carry no history; deletes are hard.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the promotion doesn't exist.
    pub async fn delete(&self, id: PromotionId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM promotion WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

/// Shared promotion field validation.
fn validate_promotion(
    discount_percent: u8,
    starts_on: NaiveDate,
    ends_on: NaiveDate,
) -> Result<(), RepositoryError> {
    if discount_percent > 100 {
        return Err(RepositoryError::Invalid(
            "discount must be between 0 and 100".to_owned(),
        ));
    }
    if ends_on < starts_on {
        return Err(RepositoryError::Invalid(
            "promotion must end on or after its start".to_owned(),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_promotion() {
        let start = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 5, 31).unwrap();

        assert!(validate_promotion(15, start, end).is_ok());
        assert!(validate_promotion(15, start, start).is_ok());
        assert!(matches!(
            validate_promotion(101, start, end),
            Err(RepositoryError::Invalid(_))
        ));
        assert!(matches!(
            validate_promotion(10, end, start),
            Err(RepositoryError::Invalid(_))
        ));
    }
}
