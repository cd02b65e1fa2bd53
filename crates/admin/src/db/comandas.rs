//! Comanda repository: ticket lifecycle and line items.
//!
//! Every mutation that touches both a comanda and product stock happens in
//! one transaction, with the comanda row locked first, so totals and stock
//! can never drift apart under concurrent tills.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

use solara_core::{
    ClientId, ComandaId, ComandaItemId, ComandaStatus, PaymentMethod, Price, ProductId,
    ProfessionalId, ServiceId,
};

use super::RepositoryError;
use crate::models::{Comanda, ComandaItem, ComandaItemKind, ComandaSummary};

/// A line item to add to an open comanda.
#[derive(Debug, Clone, Copy)]
pub enum NewComandaItem {
    /// A performed service, attributed to a professional for commission.
    Service {
        service_id: ServiceId,
        professional_id: ProfessionalId,
    },
    /// A retail product sale.
    Product { product_id: ProductId, quantity: i32 },
}

#[derive(Debug, sqlx::FromRow)]
struct ComandaRow {
    id: i32,
    client_id: i32,
    status: String,
    payment_method: Option<String>,
    discount: Decimal,
    opened_at: DateTime<Utc>,
    closed_at: Option<DateTime<Utc>>,
}

impl ComandaRow {
    fn into_comanda(self, items: Vec<ComandaItem>) -> Result<Comanda, RepositoryError> {
        let status: ComandaStatus = self
            .status
            .parse()
            .map_err(RepositoryError::DataCorruption)?;
        let payment_method = self
            .payment_method
            .as_deref()
            .map(str::parse::<PaymentMethod>)
            .transpose()
            .map_err(RepositoryError::DataCorruption)?;

        Ok(Comanda {
            id: ComandaId::new(self.id),
            client_id: ClientId::new(self.client_id),
            status,
            payment_method,
            discount: self.discount,
            opened_at: self.opened_at,
            closed_at: self.closed_at,
            items,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ComandaItemRow {
    id: i32,
    comanda_id: i32,
    kind: String,
    service_id: Option<i32>,
    product_id: Option<i32>,
    professional_id: Option<i32>,
    name: String,
    unit_price: Decimal,
    quantity: i32,
    created_at: DateTime<Utc>,
}

impl TryFrom<ComandaItemRow> for ComandaItem {
    type Error = RepositoryError;

    fn try_from(row: ComandaItemRow) -> Result<Self, Self::Error> {
        let kind: ComandaItemKind = row.kind.parse().map_err(RepositoryError::DataCorruption)?;

        Ok(Self {
            id: ComandaItemId::new(row.id),
            comanda_id: ComandaId::new(row.comanda_id),
            kind,
            service_id: row.service_id.map(ServiceId::new),
            product_id: row.product_id.map(ProductId::new),
            professional_id: row.professional_id.map(ProfessionalId::new),
            name: row.name,
            unit_price: Price::brl(row.unit_price),
            quantity: row.quantity,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ComandaSummaryRow {
    #[sqlx(flatten)]
    comanda: ComandaRow,
    subtotal: Decimal,
}

impl TryFrom<ComandaSummaryRow> for ComandaSummary {
    type Error = RepositoryError;

    fn try_from(row: ComandaSummaryRow) -> Result<Self, Self::Error> {
        let comanda = row.comanda.into_comanda(Vec::new())?;
        let total = (row.subtotal - comanda.discount).max(Decimal::ZERO);

        Ok(Self {
            id: comanda.id,
            client_id: comanda.client_id,
            status: comanda.status,
            payment_method: comanda.payment_method,
            discount: comanda.discount,
            opened_at: comanda.opened_at,
            closed_at: comanda.closed_at,
            subtotal: row.subtotal,
            total,
        })
    }
}

const COMANDA_COLUMNS: &str =
    "id, client_id, status, payment_method, discount, opened_at, closed_at";
const ITEM_COLUMNS: &str = "id, comanda_id, kind, service_id, product_id, professional_id, \
     name, unit_price, quantity, created_at";

/// Repository for comanda database operations.
pub struct ComandaRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ComandaRepository<'a> {
    /// Create a new comanda repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Open a comanda for a client.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the client already has an
    /// open comanda.
    /// Returns `RepositoryError::NotFound` if the client doesn't exist.
    pub async fn open(&self, client_id: ClientId) -> Result<Comanda, RepositoryError> {
        let row = sqlx::query_as::<_, ComandaRow>(&format!(
            "INSERT INTO comanda (client_id) VALUES ($1) RETURNING {COMANDA_COLUMNS}"
        ))
        .bind(client_id.as_i32())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.is_unique_violation() {
                    return RepositoryError::Conflict(
                        "client already has an open comanda".to_owned(),
                    );
                }
                if db_err.is_foreign_key_violation() {
                    return RepositoryError::NotFound;
                }
            }
            RepositoryError::Database(e)
        })?;

        row.into_comanda(Vec::new())
    }

    /// List comandas with precomputed totals, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        status: Option<ComandaStatus>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<ComandaSummary>, RepositoryError> {
        let rows = sqlx::query_as::<_, ComandaSummaryRow>(
            "SELECT c.id, c.client_id, c.status, c.payment_method, c.discount,
                    c.opened_at, c.closed_at, COALESCE(i.subtotal, 0) AS subtotal
             FROM comanda c
             LEFT JOIN (
                 SELECT comanda_id, SUM(unit_price * quantity) AS subtotal
                 FROM comanda_item GROUP BY comanda_id
             ) i ON i.comanda_id = c.id
             WHERE ($1::text IS NULL OR c.status = $1)
               AND ($2::date IS NULL OR c.opened_at::date >= $2)
               AND ($3::date IS NULL OR c.opened_at::date <= $3)
             ORDER BY c.opened_at DESC",
        )
        .bind(status.map(|s| s.to_string()))
        .bind(from)
        .bind(to)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get a comanda with its items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the comanda doesn't exist.
    pub async fn get_with_items(&self, id: ComandaId) -> Result<Comanda, RepositoryError> {
        let row = sqlx::query_as::<_, ComandaRow>(&format!(
            "SELECT {COMANDA_COLUMNS} FROM comanda WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        let items = sqlx::query_as::<_, ComandaItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM comanda_item WHERE comanda_id = $1 ORDER BY created_at"
        ))
        .bind(id.as_i32())
        .fetch_all(self.pool)
        .await?
        .into_iter()
        .map(TryInto::try_into)
        .collect::<Result<Vec<_>, _>>()?;

        row.into_comanda(items)
    }

    /// Add a line item to an open comanda.
    ///
    /// Service lines snapshot the service's current name and price; product
    /// lines additionally decrement stock in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown comanda.
    /// Returns `RepositoryError::Invalid` for closed comandas, unknown or
    /// inactive services/products, non-positive quantity, or insufficient
    /// stock.
    pub async fn add_item(
        &self,
        comanda_id: ComandaId,
        item: NewComandaItem,
    ) -> Result<ComandaItem, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        lock_open_comanda(&mut tx, comanda_id).await?;

        let row = match item {
            NewComandaItem::Service {
                service_id,
                professional_id,
            } => {
                let service: Option<(String, Decimal, bool)> =
                    sqlx::query_as("SELECT name, price, active FROM service WHERE id = $1")
                        .bind(service_id.as_i32())
                        .fetch_optional(&mut *tx)
                        .await?;
                let (name, price, active) = service
                    .ok_or_else(|| RepositoryError::Invalid("service not found".to_owned()))?;
                if !active {
                    return Err(RepositoryError::Invalid("service is inactive".to_owned()));
                }

                sqlx::query_as::<_, ComandaItemRow>(&format!(
                    "INSERT INTO comanda_item
                         (comanda_id, kind, service_id, professional_id, name, unit_price, quantity)
                     VALUES ($1, 'service', $2, $3, $4, $5, 1)
                     RETURNING {ITEM_COLUMNS}"
                ))
                .bind(comanda_id.as_i32())
                .bind(service_id.as_i32())
                .bind(professional_id.as_i32())
                .bind(name)
                .bind(price)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| {
                    if let sqlx::Error::Database(ref db_err) = e
                        && db_err.is_foreign_key_violation()
                    {
                        return RepositoryError::Invalid("professional not found".to_owned());
                    }
                    RepositoryError::Database(e)
                })?
            }
            NewComandaItem::Product {
                product_id,
                quantity,
            } => {
                if quantity <= 0 {
                    return Err(RepositoryError::Invalid(
                        "quantity must be positive".to_owned(),
                    ));
                }

                // Decrement stock and snapshot price in one guarded update.
                let product: Option<(String, Decimal, bool)> = sqlx::query_as(
                    "UPDATE product SET stock_quantity = stock_quantity - $2, updated_at = now()
                     WHERE id = $1 AND active AND stock_quantity >= $2
                     RETURNING name, price, active",
                )
                .bind(product_id.as_i32())
                .bind(quantity)
                .fetch_optional(&mut *tx)
                .await?;

                let Some((name, price, _)) = product else {
                    let exists: Option<(bool,)> =
                        sqlx::query_as("SELECT active FROM product WHERE id = $1")
                            .bind(product_id.as_i32())
                            .fetch_optional(&mut *tx)
                            .await?;
                    return Err(match exists {
                        None => RepositoryError::Invalid("product not found".to_owned()),
                        Some((false,)) => {
                            RepositoryError::Invalid("product is inactive".to_owned())
                        }
                        Some((true,)) => RepositoryError::Invalid("insufficient stock".to_owned()),
                    });
                };

                sqlx::query_as::<_, ComandaItemRow>(&format!(
                    "INSERT INTO comanda_item
                         (comanda_id, kind, product_id, name, unit_price, quantity)
                     VALUES ($1, 'product', $2, $3, $4, $5)
                     RETURNING {ITEM_COLUMNS}"
                ))
                .bind(comanda_id.as_i32())
                .bind(product_id.as_i32())
                .bind(name)
                .bind(price)
                .bind(quantity)
                .fetch_one(&mut *tx)
                .await?
            }
        };

        tx.commit().await?;
        row.try_into()
    }

    /// Remove a line item from an open comanda, restocking product lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown comanda or item.
    /// Returns `RepositoryError::Invalid` for closed comandas.
    pub async fn remove_item(
        &self,
        comanda_id: ComandaId,
        item_id: ComandaItemId,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;
        lock_open_comanda(&mut tx, comanda_id).await?;

        let item: Option<(String, Option<i32>, i32)> = sqlx::query_as(
            "SELECT kind, product_id, quantity FROM comanda_item
             WHERE id = $1 AND comanda_id = $2
             FOR UPDATE",
        )
        .bind(item_id.as_i32())
        .bind(comanda_id.as_i32())
        .fetch_optional(&mut *tx)
        .await?;

        let (kind, product_id, quantity) = item.ok_or(RepositoryError::NotFound)?;

        if kind == "product"
            && let Some(product_id) = product_id
        {
            sqlx::query(
                "UPDATE product SET stock_quantity = stock_quantity + $2, updated_at = now()
                 WHERE id = $1",
            )
            .bind(product_id)
            .bind(quantity)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("DELETE FROM comanda_item WHERE id = $1")
            .bind(item_id.as_i32())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Close an open comanda with a payment method and optional discount.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Invalid` for a discount that is negative or
    /// exceeds the subtotal, or a comanda that is not open.
    pub async fn close(
        &self,
        comanda_id: ComandaId,
        payment_method: PaymentMethod,
        discount: Decimal,
    ) -> Result<Comanda, RepositoryError> {
        if discount < Decimal::ZERO {
            return Err(RepositoryError::Invalid(
                "discount cannot be negative".to_owned(),
            ));
        }

        let mut tx = self.pool.begin().await?;
        lock_open_comanda(&mut tx, comanda_id).await?;

        let subtotal: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(unit_price * quantity), 0) FROM comanda_item
             WHERE comanda_id = $1",
        )
        .bind(comanda_id.as_i32())
        .fetch_one(&mut *tx)
        .await?;

        if discount > subtotal {
            return Err(RepositoryError::Invalid(
                "discount cannot exceed the subtotal".to_owned(),
            ));
        }

        sqlx::query(
            "UPDATE comanda
             SET status = 'closed', payment_method = $2, discount = $3, closed_at = now()
             WHERE id = $1",
        )
        .bind(comanda_id.as_i32())
        .bind(payment_method.to_string())
        .bind(discount)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        self.get_with_items(comanda_id).await
    }

    /// Cancel an open comanda, restocking all product lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Invalid` for a comanda that is not open.
    pub async fn cancel(&self, comanda_id: ComandaId) -> Result<Comanda, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        lock_open_comanda(&mut tx, comanda_id).await?;

        sqlx::query(
            "UPDATE product p
             SET stock_quantity = p.stock_quantity + i.quantity, updated_at = now()
             FROM comanda_item i
             WHERE i.comanda_id = $1 AND i.kind = 'product' AND i.product_id = p.id",
        )
        .bind(comanda_id.as_i32())
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE comanda SET status = 'canceled', closed_at = now() WHERE id = $1")
            .bind(comanda_id.as_i32())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        self.get_with_items(comanda_id).await
    }
}

/// Lock a comanda row and ensure it is still open.
async fn lock_open_comanda(
    tx: &mut Transaction<'_, Postgres>,
    comanda_id: ComandaId,
) -> Result<(), RepositoryError> {
    let status: Option<(String,)> =
        sqlx::query_as("SELECT status FROM comanda WHERE id = $1 FOR UPDATE")
            .bind(comanda_id.as_i32())
            .fetch_optional(&mut **tx)
            .await?;

    match status {
        None => Err(RepositoryError::NotFound),
        Some((s,)) if s == "open" => Ok(()),
        Some(_) => Err(RepositoryError::Invalid("comanda is not open".to_owned())),
    }
}
