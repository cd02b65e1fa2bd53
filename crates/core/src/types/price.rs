//! Type-safe price representation using decimal arithmetic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with currency information.
///
/// The amount is held in the currency's standard unit (reais, not centavos)
/// as a [`Decimal`], so arithmetic on totals never goes through floats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit.
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price in the salon's default currency (BRL).
    #[must_use]
    pub const fn brl(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::BRL)
    }

    /// Zero in the salon's default currency.
    #[must_use]
    pub const fn zero() -> Self {
        Self::brl(Decimal::ZERO)
    }

    /// Format for display (e.g., "R$ 19.90").
    #[must_use]
    pub fn display(&self) -> String {
        format!("{} {:.2}", self.currency_code.symbol(), self.amount)
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    BRL,
    USD,
    EUR,
}

impl CurrencyCode {
    /// Currency symbol for display.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::BRL => "R$",
            Self::USD => "$",
            Self::EUR => "€",
        }
    }

    /// ISO 4217 code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::BRL => "BRL",
            Self::USD => "USD",
            Self::EUR => "EUR",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_two_decimal_places() {
        let price = Price::brl(Decimal::new(199, 1));
        assert_eq!(price.display(), "R$ 19.90");
    }

    #[test]
    fn test_default_currency_is_brl() {
        assert_eq!(CurrencyCode::default(), CurrencyCode::BRL);
        assert_eq!(Price::zero().currency_code, CurrencyCode::BRL);
    }

    #[test]
    fn test_serde_amount_as_string() {
        // serde-with-str keeps decimal amounts exact on the wire
        let price = Price::brl(Decimal::new(4500, 2));
        let json = serde_json::to_string(&price).unwrap();
        assert!(json.contains("\"45.00\""));
        assert!(json.contains("\"BRL\""));

        let parsed: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, price);
    }
}
