//! Product catalog repository (admin side).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use solara_core::{Price, Product, ProductId};

use super::professionals::Removal;
use super::RepositoryError;

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

const PRODUCT_COLUMNS: &str = "id, name, price, stock_quantity, active, created_at, updated_at";

/// Repository for product catalog management.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all products, active first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product ORDER BY active DESC, name"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Invalid` for a negative price or stock.
    pub async fn create(
        &self,
        name: &str,
        price: Decimal,
        stock_quantity: i32,
    ) -> Result<Product, RepositoryError> {
        if price < Decimal::ZERO {
            return Err(RepositoryError::Invalid(
                "price cannot be negative".to_owned(),
            ));
        }
        if stock_quantity < 0 {
            return Err(RepositoryError::Invalid(
                "stock cannot be negative".to_owned(),
            ));
        }

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO product (name, price, stock_quantity)
             VALUES ($1, $2, $3)
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(name)
        .bind(price)
        .bind(stock_quantity)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Update a product's name, price, and active flag.
    ///
    /// Stock is adjusted through [`Self::adjust_stock`], not here, so a
    /// stale edit form can't clobber concurrent sales.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    pub async fn update(
        &self,
        id: ProductId,
        name: &str,
        price: Decimal,
        active: bool,
    ) -> Result<Product, RepositoryError> {
        if price < Decimal::ZERO {
            return Err(RepositoryError::Invalid(
                "price cannot be negative".to_owned(),
            ));
        }

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "UPDATE product
             SET name = $1, price = $2, active = $3, updated_at = now()
             WHERE id = $4
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(name)
        .bind(price)
        .bind(active)
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Adjust stock by a signed delta (restock or shrinkage correction).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Invalid` if the adjustment would drive the
    /// stock negative.
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    pub async fn adjust_stock(
        &self,
        id: ProductId,
        delta: i32,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "UPDATE product
             SET stock_quantity = stock_quantity + $1, updated_at = now()
             WHERE id = $2
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(delta)
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_check_violation()
            {
                return RepositoryError::Invalid("insufficient stock".to_owned());
            }
            RepositoryError::Database(e)
        })?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Delete a product, falling back to deactivation when comanda lines
    /// reference it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    pub async fn remove(&self, id: ProductId) -> Result<Removal, RepositoryError> {
        let result = sqlx::query("DELETE FROM product WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await;

        match result {
            Ok(done) if done.rows_affected() > 0 => Ok(Removal::Deleted),
            Ok(_) => Err(RepositoryError::NotFound),
            Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => {
                sqlx::query("UPDATE product SET active = FALSE, updated_at = now() WHERE id = $1")
                    .bind(id.as_i32())
                    .execute(self.pool)
                    .await?;
                Ok(Removal::Deactivated)
            }
            Err(e) => Err(RepositoryError::Database(e)),
        }
    }
}
