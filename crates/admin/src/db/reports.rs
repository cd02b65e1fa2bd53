//! Reporting repository: read-only aggregates over closed comandas and
//! expenses.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;

use solara_core::{ProfessionalId, ServiceId};

use super::RepositoryError;

/// One day of revenue, split by payment method.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct RevenueDay {
    pub date: NaiveDate,
    pub gross: Decimal,
    pub cash: Decimal,
    pub credit_card: Decimal,
    pub debit_card: Decimal,
    pub pix: Decimal,
}

/// Commission earned by one professional over a period.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CommissionEntry {
    pub professional_id: ProfessionalId,
    pub professional_name: String,
    pub commission_percent: Decimal,
    /// Sum of the professional's service line subtotals on closed comandas.
    pub service_revenue: Decimal,
    /// `service_revenue * commission_percent / 100`, rounded to centavos.
    pub commission_amount: Decimal,
}

#[derive(Debug, sqlx::FromRow)]
struct CommissionRow {
    professional_id: i32,
    professional_name: String,
    commission_percent: Decimal,
    service_revenue: Decimal,
}

/// A service ranked by how often it sold over a period.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TopServiceEntry {
    pub service_id: ServiceId,
    pub name: String,
    pub times_sold: i64,
    pub revenue: Decimal,
}

#[derive(Debug, sqlx::FromRow)]
struct TopServiceRow {
    service_id: i32,
    name: String,
    times_sold: i64,
    revenue: Decimal,
}

/// Compute a commission amount, rounded to centavos (midpoints to even).
#[must_use]
pub fn commission_amount(service_revenue: Decimal, commission_percent: Decimal) -> Decimal {
    (service_revenue * commission_percent / Decimal::ONE_HUNDRED).round_dp(2)
}

/// Repository for report queries.
pub struct ReportRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReportRepository<'a> {
    /// Create a new report repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Per-day gross revenue from closed comandas in the range, split by
    /// payment method. Comanda totals are net of their discounts.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn revenue_by_day(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<RevenueDay>, RepositoryError> {
        let rows = sqlx::query_as::<_, RevenueDay>(
            "SELECT c.closed_at::date AS date,
                    COALESCE(SUM(GREATEST(i.subtotal - c.discount, 0)), 0) AS gross,
                    COALESCE(SUM(GREATEST(i.subtotal - c.discount, 0))
                        FILTER (WHERE c.payment_method = 'cash'), 0) AS cash,
                    COALESCE(SUM(GREATEST(i.subtotal - c.discount, 0))
                        FILTER (WHERE c.payment_method = 'credit_card'), 0) AS credit_card,
                    COALESCE(SUM(GREATEST(i.subtotal - c.discount, 0))
                        FILTER (WHERE c.payment_method = 'debit_card'), 0) AS debit_card,
                    COALESCE(SUM(GREATEST(i.subtotal - c.discount, 0))
                        FILTER (WHERE c.payment_method = 'pix'), 0) AS pix
             FROM comanda c
             JOIN LATERAL (
                 SELECT COALESCE(SUM(unit_price * quantity), 0) AS subtotal
                 FROM comanda_item WHERE comanda_id = c.id
             ) i ON TRUE
             WHERE c.status = 'closed'
               AND c.closed_at::date >= $1 AND c.closed_at::date <= $2
             GROUP BY c.closed_at::date
             ORDER BY c.closed_at::date",
        )
        .bind(from)
        .bind(to)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Total expenses recorded in the range.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn expense_total(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Decimal, RepositoryError> {
        let total: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount), 0) FROM expense WHERE date >= $1 AND date <= $2",
        )
        .bind(from)
        .bind(to)
        .fetch_one(self.pool)
        .await?;

        Ok(total)
    }

    /// Commission per professional from service lines on closed comandas.
    ///
    /// Comanda-level discounts are not allocated to lines; the commission
    /// basis is the undiscounted service subtotal.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn commissions(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<CommissionEntry>, RepositoryError> {
        let rows = sqlx::query_as::<_, CommissionRow>(
            "SELECT p.id AS professional_id,
                    p.name AS professional_name,
                    p.commission_percent,
                    COALESCE(SUM(i.unit_price * i.quantity), 0) AS service_revenue
             FROM comanda_item i
             JOIN comanda c ON c.id = i.comanda_id
             JOIN professional p ON p.id = i.professional_id
             WHERE i.kind = 'service'
               AND c.status = 'closed'
               AND c.closed_at::date >= $1 AND c.closed_at::date <= $2
             GROUP BY p.id, p.name, p.commission_percent
             ORDER BY service_revenue DESC",
        )
        .bind(from)
        .bind(to)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| CommissionEntry {
                professional_id: ProfessionalId::new(row.professional_id),
                professional_name: row.professional_name,
                commission_percent: row.commission_percent,
                service_revenue: row.service_revenue,
                commission_amount: commission_amount(
                    row.service_revenue,
                    row.commission_percent,
                ),
            })
            .collect())
    }

    /// Services ranked by sales count over the range.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn top_services(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        limit: i64,
    ) -> Result<Vec<TopServiceEntry>, RepositoryError> {
        let rows = sqlx::query_as::<_, TopServiceRow>(
            "SELECT s.id AS service_id,
                    s.name,
                    COUNT(*) AS times_sold,
                    COALESCE(SUM(i.unit_price * i.quantity), 0) AS revenue
             FROM comanda_item i
             JOIN comanda c ON c.id = i.comanda_id
             JOIN service s ON s.id = i.service_id
             WHERE i.kind = 'service'
               AND c.status = 'closed'
               AND c.closed_at::date >= $1 AND c.closed_at::date <= $2
             GROUP BY s.id, s.name
             ORDER BY times_sold DESC, revenue DESC
             LIMIT $3",
        )
        .bind(from)
        .bind(to)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| TopServiceEntry {
                service_id: ServiceId::new(row.service_id),
                name: row.name,
                times_sold: row.times_sold,
                revenue: row.revenue,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commission_amount_rounds_to_centavos() {
        // 333.33 at 12.5% = 41.66625 -> 41.67
        let revenue = Decimal::new(33333, 2);
        let percent = Decimal::new(125, 1);
        assert_eq!(commission_amount(revenue, percent), Decimal::new(4167, 2));
    }

    #[test]
    fn test_commission_amount_zero_percent() {
        assert_eq!(
            commission_amount(Decimal::new(10000, 2), Decimal::ZERO),
            Decimal::ZERO
        );
    }
}
