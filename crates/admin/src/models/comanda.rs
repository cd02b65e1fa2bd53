//! Comanda (service ticket) domain types.
//!
//! A comanda records everything a client consumes during a visit. Line
//! items snapshot name and unit price at add time, so later catalog edits
//! never rewrite history. The total is always derived from the items;
//! nothing denormalized is stored.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use solara_core::{
    ClientId, ComandaId, ComandaItemId, ComandaStatus, PaymentMethod, Price, ProductId,
    ProfessionalId, ServiceId,
};

/// Whether a line item is a performed service or a retail product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComandaItemKind {
    Service,
    Product,
}

impl std::fmt::Display for ComandaItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Service => write!(f, "service"),
            Self::Product => write!(f, "product"),
        }
    }
}

impl std::str::FromStr for ComandaItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "service" => Ok(Self::Service),
            "product" => Ok(Self::Product),
            _ => Err(format!("invalid comanda item kind: {s}")),
        }
    }
}

/// One line on a comanda.
#[derive(Debug, Clone, Serialize)]
pub struct ComandaItem {
    /// Unique item ID.
    pub id: ComandaItemId,
    /// Comanda this line belongs to.
    pub comanda_id: ComandaId,
    /// Service or product line.
    pub kind: ComandaItemKind,
    /// Set for service lines.
    pub service_id: Option<ServiceId>,
    /// Set for product lines.
    pub product_id: Option<ProductId>,
    /// Professional who performed a service line (commission basis).
    pub professional_id: Option<ProfessionalId>,
    /// Name snapshot at add time.
    pub name: String,
    /// Unit price snapshot at add time.
    pub unit_price: Price,
    /// Units; always 1 for service lines.
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

impl ComandaItem {
    /// Line subtotal: unit price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.unit_price.amount * Decimal::from(self.quantity)
    }
}

/// A comanda with its line items.
#[derive(Debug, Clone, Serialize)]
pub struct Comanda {
    /// Unique comanda ID.
    pub id: ComandaId,
    /// Client the ticket belongs to.
    pub client_id: ClientId,
    /// Lifecycle status.
    pub status: ComandaStatus,
    /// Payment method, set at close.
    pub payment_method: Option<PaymentMethod>,
    /// Flat discount applied at close. Zero while open.
    pub discount: Decimal,
    pub opened_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    /// Line items, oldest first.
    pub items: Vec<ComandaItem>,
}

impl Comanda {
    /// Sum of the line subtotals, before discount.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(ComandaItem::subtotal).sum()
    }

    /// Amount due: subtotal minus discount, floored at zero.
    #[must_use]
    pub fn total(&self) -> Decimal {
        (self.subtotal() - self.discount).max(Decimal::ZERO)
    }
}

/// Listing view of a comanda: no items, but totals precomputed by the
/// repository's aggregate query.
#[derive(Debug, Clone, Serialize)]
pub struct ComandaSummary {
    pub id: ComandaId,
    pub client_id: ClientId,
    pub status: ComandaStatus,
    pub payment_method: Option<PaymentMethod>,
    pub discount: Decimal,
    pub opened_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    /// Sum of line subtotals.
    pub subtotal: Decimal,
    /// Subtotal minus discount, floored at zero.
    pub total: Decimal,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(kind: ComandaItemKind, cents: i64, quantity: i32) -> ComandaItem {
        ComandaItem {
            id: ComandaItemId::new(1),
            comanda_id: ComandaId::new(1),
            kind,
            service_id: None,
            product_id: None,
            professional_id: None,
            name: "item".to_owned(),
            unit_price: Price::brl(Decimal::new(cents, 2)),
            quantity,
            created_at: Utc::now(),
        }
    }

    fn comanda(items: Vec<ComandaItem>, discount: Decimal) -> Comanda {
        Comanda {
            id: ComandaId::new(1),
            client_id: ClientId::new(1),
            status: ComandaStatus::Open,
            payment_method: None,
            discount,
            opened_at: Utc::now(),
            closed_at: None,
            items,
        }
    }

    #[test]
    fn test_item_subtotal_multiplies_quantity() {
        let line = item(ComandaItemKind::Product, 2550, 3);
        assert_eq!(line.subtotal(), Decimal::new(7650, 2));
    }

    #[test]
    fn test_total_is_sum_of_items_minus_discount() {
        let c = comanda(
            vec![
                item(ComandaItemKind::Service, 12000, 1),
                item(ComandaItemKind::Product, 4500, 2),
            ],
            Decimal::new(1000, 2),
        );

        assert_eq!(c.subtotal(), Decimal::new(21000, 2));
        assert_eq!(c.total(), Decimal::new(20000, 2));
    }

    #[test]
    fn test_empty_comanda_totals_zero() {
        let c = comanda(vec![], Decimal::ZERO);
        assert_eq!(c.subtotal(), Decimal::ZERO);
        assert_eq!(c.total(), Decimal::ZERO);
    }

    #[test]
    fn test_discount_never_drives_total_negative() {
        let c = comanda(
            vec![item(ComandaItemKind::Service, 5000, 1)],
            Decimal::new(9000, 2),
        );
        assert_eq!(c.total(), Decimal::ZERO);
    }

    #[test]
    fn test_item_kind_string_roundtrip() {
        for kind in [ComandaItemKind::Service, ComandaItemKind::Product] {
            let parsed: ComandaItemKind = kind.to_string().parse().unwrap();
            assert_eq!(parsed, kind);
        }
        assert!("voucher".parse::<ComandaItemKind>().is_err());
    }
}
