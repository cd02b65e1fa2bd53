//! Catalog domain types: services, retail products, and promotions.
//!
//! These are validated domain objects, separate from the database row types
//! that live in each binary's `db` layer.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::id::{ProductId, PromotionId, ServiceId};
use super::price::Price;
use super::status::ServiceCategory;

/// A salon service offered to clients (cut, color, manicure, ...).
#[derive(Debug, Clone, Serialize)]
pub struct Service {
    /// Unique service ID.
    pub id: ServiceId,
    /// Display name.
    pub name: String,
    /// Category used for filtering in the booking UI.
    pub category: ServiceCategory,
    /// Current price. Comanda line items snapshot this at add time.
    pub price: Price,
    /// Duration in minutes; determines the appointment window.
    pub duration_minutes: u32,
    /// Inactive services are hidden from booking but kept for history.
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A retail product sold at the counter.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Current price. Comanda line items snapshot this at add time.
    pub price: Price,
    /// Units on hand. Never negative.
    pub stock_quantity: i32,
    /// Inactive products are hidden from the catalog but kept for history.
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A time-bounded percent discount campaign.
#[derive(Debug, Clone, Serialize)]
pub struct Promotion {
    /// Unique promotion ID.
    pub id: PromotionId,
    /// Display name.
    pub name: String,
    /// Marketing copy shown on the booking site.
    pub description: String,
    /// Percent discount (0-100).
    pub discount_percent: u8,
    /// First day the promotion applies.
    pub starts_on: NaiveDate,
    /// Last day the promotion applies (inclusive).
    pub ends_on: NaiveDate,
    /// Kill switch independent of the date range.
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Promotion {
    /// Whether the promotion applies on the given date.
    #[must_use]
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.active && self.starts_on <= date && date <= self.ends_on
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn promo(starts: NaiveDate, ends: NaiveDate, active: bool) -> Promotion {
        Promotion {
            id: PromotionId::new(1),
            name: "Spring".to_owned(),
            description: String::new(),
            discount_percent: 10,
            starts_on: starts,
            ends_on: ends,
            active,
            created_at: DateTime::<Utc>::MIN_UTC,
        }
    }

    #[test]
    fn test_promotion_active_window_is_inclusive() {
        let start = NaiveDate::from_ymd_opt(2026, 3, 1).expect("valid date");
        let end = NaiveDate::from_ymd_opt(2026, 3, 31).expect("valid date");
        let p = promo(start, end, true);

        assert!(p.is_active_on(start));
        assert!(p.is_active_on(end));
        assert!(p.is_active_on(NaiveDate::from_ymd_opt(2026, 3, 15).expect("valid date")));
        assert!(!p.is_active_on(NaiveDate::from_ymd_opt(2026, 4, 1).expect("valid date")));
        assert!(!p.is_active_on(NaiveDate::from_ymd_opt(2026, 2, 28).expect("valid date")));
    }

    #[test]
    fn test_promotion_flag_overrides_range() {
        let start = NaiveDate::from_ymd_opt(2026, 3, 1).expect("valid date");
        let end = NaiveDate::from_ymd_opt(2026, 3, 31).expect("valid date");
        let p = promo(start, end, false);
        assert!(!p.is_active_on(start));
    }

    #[test]
    fn test_service_serializes_price_object() {
        let service = Service {
            id: ServiceId::new(2),
            name: "Corte feminino".to_owned(),
            category: ServiceCategory::Hair,
            price: Price::brl(Decimal::new(12000, 2)),
            duration_minutes: 45,
            active: true,
            created_at: DateTime::<Utc>::MIN_UTC,
            updated_at: DateTime::<Utc>::MIN_UTC,
        };

        let json = serde_json::to_value(&service).expect("serializable");
        assert_eq!(json["price"]["amount"], "120.00");
        assert_eq!(json["category"], "hair");
    }
}
