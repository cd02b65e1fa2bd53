//! Cash register domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use solara_core::{AdminUserId, CashMovementId, CashMovementKind, CashRegisterId, CashRegisterStatus};

/// A cash register shift. At most one is open at a time.
#[derive(Debug, Clone, Serialize)]
pub struct CashRegister {
    /// Unique register ID.
    pub id: CashRegisterId,
    /// Open or closed.
    pub status: CashRegisterStatus,
    /// Cash counted into the drawer at open.
    pub opening_amount: Decimal,
    /// Cash counted at close; `None` while open.
    pub closing_amount: Option<Decimal>,
    /// Admin who opened the shift.
    pub opened_by: AdminUserId,
    /// Admin who closed the shift.
    pub closed_by: Option<AdminUserId>,
    pub opened_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

/// A manual drawer movement during a shift.
#[derive(Debug, Clone, Serialize)]
pub struct CashMovement {
    /// Unique movement ID.
    pub id: CashMovementId,
    /// Register (shift) the movement belongs to.
    pub register_id: CashRegisterId,
    /// Deposit (reforço) or withdrawal (sangria).
    pub kind: CashMovementKind,
    /// Always positive; the kind carries the sign.
    pub amount: Decimal,
    /// Why the cash moved.
    pub description: String,
    /// Admin who recorded it.
    pub created_by: AdminUserId,
    pub created_at: DateTime<Utc>,
}

/// A register plus the running drawer arithmetic.
#[derive(Debug, Clone, Serialize)]
pub struct CashRegisterSummary {
    #[serde(flatten)]
    pub register: CashRegister,
    /// Revenue from closed cash-paid comandas during the shift.
    pub cash_sales: Decimal,
    /// Sum of deposit movements.
    pub deposits: Decimal,
    /// Sum of withdrawal movements.
    pub withdrawals: Decimal,
    /// What should be in the drawer right now.
    pub expected_amount: Decimal,
    /// Counted minus expected; `None` while the shift is open.
    pub difference: Option<Decimal>,
}

/// Drawer arithmetic: opening + cash sales + deposits - withdrawals.
#[must_use]
pub fn expected_amount(
    opening: Decimal,
    cash_sales: Decimal,
    deposits: Decimal,
    withdrawals: Decimal,
) -> Decimal {
    opening + cash_sales + deposits - withdrawals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }

    #[test]
    fn test_expected_amount() {
        // Opened with 100.00, sold 350.50 in cash, added 50.00 change,
        // removed 200.00 mid-shift.
        assert_eq!(
            expected_amount(d(10000), d(35050), d(5000), d(20000)),
            d(30050)
        );
    }

    #[test]
    fn test_expected_amount_can_go_negative() {
        // Over-withdrawal shows up as a negative expectation rather than
        // being hidden.
        assert_eq!(expected_amount(d(1000), d(0), d(0), d(5000)), d(-4000));
    }
}
