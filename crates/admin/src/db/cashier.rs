//! Cash register repository: shifts, movements, and drawer arithmetic.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

use solara_core::{
    AdminUserId, CashMovementId, CashMovementKind, CashRegisterId, CashRegisterStatus,
};

use super::RepositoryError;
use crate::models::cashier::{CashMovement, CashRegister, CashRegisterSummary, expected_amount};

#[derive(Debug, sqlx::FromRow)]
struct CashRegisterRow {
    id: i32,
    status: String,
    opening_amount: Decimal,
    closing_amount: Option<Decimal>,
    opened_by: i32,
    closed_by: Option<i32>,
    opened_at: DateTime<Utc>,
    closed_at: Option<DateTime<Utc>>,
}

impl TryFrom<CashRegisterRow> for CashRegister {
    type Error = RepositoryError;

    fn try_from(row: CashRegisterRow) -> Result<Self, Self::Error> {
        let status: CashRegisterStatus = row
            .status
            .parse()
            .map_err(RepositoryError::DataCorruption)?;

        Ok(Self {
            id: CashRegisterId::new(row.id),
            status,
            opening_amount: row.opening_amount,
            closing_amount: row.closing_amount,
            opened_by: AdminUserId::new(row.opened_by),
            closed_by: row.closed_by.map(AdminUserId::new),
            opened_at: row.opened_at,
            closed_at: row.closed_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CashMovementRow {
    id: i32,
    register_id: i32,
    kind: String,
    amount: Decimal,
    description: String,
    created_by: i32,
    created_at: DateTime<Utc>,
}

impl TryFrom<CashMovementRow> for CashMovement {
    type Error = RepositoryError;

    fn try_from(row: CashMovementRow) -> Result<Self, Self::Error> {
        let kind: CashMovementKind = row.kind.parse().map_err(RepositoryError::DataCorruption)?;

        Ok(Self {
            id: CashMovementId::new(row.id),
            register_id: CashRegisterId::new(row.register_id),
            kind,
            amount: row.amount,
            description: row.description,
            created_by: AdminUserId::new(row.created_by),
            created_at: row.created_at,
        })
    }
}

/// Shift component sums used for the expected-amount arithmetic.
#[derive(Debug, Clone, Copy)]
struct DrawerComponents {
    cash_sales: Decimal,
    deposits: Decimal,
    withdrawals: Decimal,
}

const REGISTER_COLUMNS: &str = "id, status, opening_amount, closing_amount, opened_by, \
     closed_by, opened_at, closed_at";
const MOVEMENT_COLUMNS: &str =
    "id, register_id, kind, amount, description, created_by, created_at";

/// Repository for cash register database operations.
pub struct CashierRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CashierRepository<'a> {
    /// Create a new cashier repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Open a register shift.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a register is already open.
    /// Returns `RepositoryError::Invalid` for a negative opening amount.
    pub async fn open(
        &self,
        opening_amount: Decimal,
        opened_by: AdminUserId,
    ) -> Result<CashRegister, RepositoryError> {
        if opening_amount < Decimal::ZERO {
            return Err(RepositoryError::Invalid(
                "opening amount cannot be negative".to_owned(),
            ));
        }

        let row = sqlx::query_as::<_, CashRegisterRow>(&format!(
            "INSERT INTO cash_register (opening_amount, opened_by)
             VALUES ($1, $2)
             RETURNING {REGISTER_COLUMNS}"
        ))
        .bind(opening_amount)
        .bind(opened_by.as_i32())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict(
                    "a cash register is already open".to_owned(),
                );
            }
            RepositoryError::Database(e)
        })?;

        row.try_into()
    }

    /// Get the open register with its running drawer arithmetic, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn current(&self) -> Result<Option<CashRegisterSummary>, RepositoryError> {
        let row = sqlx::query_as::<_, CashRegisterRow>(&format!(
            "SELECT {REGISTER_COLUMNS} FROM cash_register WHERE status = 'open'"
        ))
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let register: CashRegister = row.try_into()?;
        let components = self.drawer_components(&register).await?;

        Ok(Some(summarize(register, components)))
    }

    /// Record a manual drawer movement against the open register.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Invalid` if no register is open or the
    /// amount is not positive.
    pub async fn add_movement(
        &self,
        kind: CashMovementKind,
        amount: Decimal,
        description: &str,
        created_by: AdminUserId,
    ) -> Result<CashMovement, RepositoryError> {
        if amount <= Decimal::ZERO {
            return Err(RepositoryError::Invalid(
                "amount must be positive".to_owned(),
            ));
        }

        let mut tx = self.pool.begin().await?;
        let register_id = lock_open_register(&mut tx).await?;

        let row = sqlx::query_as::<_, CashMovementRow>(&format!(
            "INSERT INTO cash_movement (register_id, kind, amount, description, created_by)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {MOVEMENT_COLUMNS}"
        ))
        .bind(register_id)
        .bind(kind.to_string())
        .bind(amount)
        .bind(description)
        .bind(created_by.as_i32())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        row.try_into()
    }

    /// Close the open register with the counted amount.
    ///
    /// The returned summary carries the expected amount and the counted
    /// difference, which is what the closing report shows.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Invalid` if no register is open or the
    /// counted amount is negative.
    pub async fn close(
        &self,
        closing_amount: Decimal,
        closed_by: AdminUserId,
    ) -> Result<CashRegisterSummary, RepositoryError> {
        if closing_amount < Decimal::ZERO {
            return Err(RepositoryError::Invalid(
                "closing amount cannot be negative".to_owned(),
            ));
        }

        let mut tx = self.pool.begin().await?;
        let register_id = lock_open_register(&mut tx).await?;

        let row = sqlx::query_as::<_, CashRegisterRow>(&format!(
            "UPDATE cash_register
             SET status = 'closed', closing_amount = $1, closed_by = $2, closed_at = now()
             WHERE id = $3
             RETURNING {REGISTER_COLUMNS}"
        ))
        .bind(closing_amount)
        .bind(closed_by.as_i32())
        .bind(register_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        // closed_at is now fixed, so the component sums are stable.
        let register: CashRegister = row.try_into()?;
        let components = self.drawer_components(&register).await?;

        Ok(summarize(register, components))
    }

    /// List closed registers in a date range, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn history(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<CashRegister>, RepositoryError> {
        let rows = sqlx::query_as::<_, CashRegisterRow>(&format!(
            "SELECT {REGISTER_COLUMNS} FROM cash_register
             WHERE status = 'closed'
               AND ($1::date IS NULL OR opened_at::date >= $1)
               AND ($2::date IS NULL OR opened_at::date <= $2)
             ORDER BY opened_at DESC"
        ))
        .bind(from)
        .bind(to)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// List a register's movements, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_movements(
        &self,
        register_id: CashRegisterId,
    ) -> Result<Vec<CashMovement>, RepositoryError> {
        let rows = sqlx::query_as::<_, CashMovementRow>(&format!(
            "SELECT {MOVEMENT_COLUMNS} FROM cash_movement
             WHERE register_id = $1 ORDER BY created_at"
        ))
        .bind(register_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Sum the shift's cash sales and manual movements.
    ///
    /// Cash sales are closed cash-paid comandas whose close fell inside the
    /// shift (net of their discounts, floored per comanda at zero).
    async fn drawer_components(
        &self,
        register: &CashRegister,
    ) -> Result<DrawerComponents, RepositoryError> {
        let shift_end = register.closed_at.unwrap_or_else(Utc::now);

        let cash_sales: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(GREATEST(i.subtotal - c.discount, 0)), 0)
             FROM comanda c
             JOIN LATERAL (
                 SELECT COALESCE(SUM(unit_price * quantity), 0) AS subtotal
                 FROM comanda_item WHERE comanda_id = c.id
             ) i ON TRUE
             WHERE c.status = 'closed' AND c.payment_method = 'cash'
               AND c.closed_at >= $1 AND c.closed_at <= $2",
        )
        .bind(register.opened_at)
        .bind(shift_end)
        .fetch_one(self.pool)
        .await?;

        let (deposits, withdrawals): (Decimal, Decimal) = sqlx::query_as(
            "SELECT
                 COALESCE(SUM(amount) FILTER (WHERE kind = 'deposit'), 0),
                 COALESCE(SUM(amount) FILTER (WHERE kind = 'withdrawal'), 0)
             FROM cash_movement WHERE register_id = $1",
        )
        .bind(register.id.as_i32())
        .fetch_one(self.pool)
        .await?;

        Ok(DrawerComponents {
            cash_sales,
            deposits,
            withdrawals,
        })
    }
}

/// Build the summary from a register and its component sums.
fn summarize(register: CashRegister, components: DrawerComponents) -> CashRegisterSummary {
    let expected = expected_amount(
        register.opening_amount,
        components.cash_sales,
        components.deposits,
        components.withdrawals,
    );
    let difference = register.closing_amount.map(|counted| counted - expected);

    CashRegisterSummary {
        register,
        cash_sales: components.cash_sales,
        deposits: components.deposits,
        withdrawals: components.withdrawals,
        expected_amount: expected,
        difference,
    }
}

/// Lock the open register row and return its ID.
async fn lock_open_register(
    tx: &mut Transaction<'_, Postgres>,
) -> Result<i32, RepositoryError> {
    let row: Option<(i32,)> =
        sqlx::query_as("SELECT id FROM cash_register WHERE status = 'open' FOR UPDATE")
            .fetch_optional(&mut **tx)
            .await?;

    row.map(|(id,)| id)
        .ok_or_else(|| RepositoryError::Invalid("no open cash register".to_owned()))
}
