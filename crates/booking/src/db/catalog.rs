//! Read-only catalog repository: services, products, promotions, and the
//! public professional roster.
//!
//! The booking API never mutates the catalog; management lives in the admin
//! binary.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use solara_core::{
    Email, Price, Product, ProductId, Professional, ProfessionalId, Promotion, PromotionId,
    Service, ServiceCategory, ServiceId,
};

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
            RepositoryError::DataCorruption(format!(
                "negative duration for service {}",
                row.id
            ))
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

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    price: Decimal,
    stock_quantity: i32,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            price: Price::brl(row.price),
            stock_quantity: row.stock_quantity,
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

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

const PROFESSIONAL_COLUMNS: &str = "id, name, email, can_manage_schedule, \
     can_sell_products, commission_percent, active, created_at, updated_at";

const SERVICE_COLUMNS: &str =
    "id, name, category, price, duration_minutes, active, created_at, updated_at";

/// Repository for read-only catalog queries.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List active services, optionally filtered by category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_active_services(
        &self,
        category: Option<ServiceCategory>,
    ) -> Result<Vec<Service>, RepositoryError> {
        let rows = match category {
            Some(cat) => {
                sqlx::query_as::<_, ServiceRow>(&format!(
                    "SELECT {SERVICE_COLUMNS} FROM service
                     WHERE active AND category = $1
                     ORDER BY name"
                ))
                .bind(cat.to_string())
                .fetch_all(self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, ServiceRow>(&format!(
                    "SELECT {SERVICE_COLUMNS} FROM service WHERE active ORDER BY name"
                ))
                .fetch_all(self.pool)
                .await?
            }
        };

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get a single service by ID (active or not).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_service(&self, id: ServiceId) -> Result<Option<Service>, RepositoryError> {
        let row = sqlx::query_as::<_, ServiceRow>(&format!(
            "SELECT {SERVICE_COLUMNS} FROM service WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// List active products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_active_products(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, price, stock_quantity, active, created_at, updated_at
             FROM product WHERE active ORDER BY name",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// List promotions in effect on the given date.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_active_promotions(
        &self,
        on: NaiveDate,
    ) -> Result<Vec<Promotion>, RepositoryError> {
        let rows = sqlx::query_as::<_, PromotionRow>(
            "SELECT id, name, description, discount_percent, starts_on, ends_on, active, created_at
             FROM promotion
             WHERE active AND starts_on <= $1 AND ends_on >= $1
             ORDER BY starts_on",
        )
        .bind(on)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// List active professionals for the public booking roster.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_active_professionals(&self) -> Result<Vec<Professional>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProfessionalRow>(&format!(
            "SELECT {PROFESSIONAL_COLUMNS} FROM professional WHERE active ORDER BY name"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get a single professional by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_professional(
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
}
