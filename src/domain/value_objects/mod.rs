//! Value Objects for the candle storefront

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Money value object
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: String,
}

impl Money {
    pub fn new(amount: Decimal, currency: &str) -> Self {
        Self { amount, currency: currency.to_string() }
    }
    pub fn eur(amount: Decimal) -> Self { Self::new(amount, "EUR") }
    pub fn zero(currency: &str) -> Self { Self::new(Decimal::ZERO, currency) }
    pub fn amount(&self) -> Decimal { self.amount }
    pub fn currency(&self) -> &str { &self.currency }
    pub fn is_zero(&self) -> bool { self.amount.is_zero() }
    pub fn add(&self, other: &Money) -> Result<Money, MoneyError> {
        if self.currency != other.currency { return Err(MoneyError::CurrencyMismatch); }
        Ok(Money::new(self.amount + other.amount, &self.currency))
    }
    pub fn multiply(&self, qty: u32) -> Money {
        Money::new(self.amount * Decimal::from(qty), &self.currency)
    }
}

impl Default for Money { fn default() -> Self { Self::zero("EUR") } }

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Order summaries render euro amounts as "€12.50".
        if self.currency == "EUR" { write!(f, "€{:.2}", self.amount) }
        else { write!(f, "{:.2} {}", self.amount, self.currency) }
    }
}

#[derive(Debug, Clone)] pub enum MoneyError { CurrencyMismatch }
impl std::error::Error for MoneyError {}
impl fmt::Display for MoneyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "Currency mismatch") }
}

/// Cart line identity, derived deterministically from the product id and the
/// selected variant keys. Two adds with the same combination produce the same
/// `LineId` and therefore merge into one line.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineId(String);

impl LineId {
    pub fn derive(product_id: &str, color_value: &str, scent_value: Option<&str>) -> Self {
        match scent_value {
            Some(scent) => Self(format!("{product_id}-{color_value}-{scent}")),
            None => Self(format!("{product_id}-{color_value}")),
        }
    }
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

/// One selectable variant choice (a color or a scent).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantOption {
    /// Display name, e.g. "Rojo Clásico"
    pub name: String,
    /// Unique key within its option set, e.g. "rojo"
    pub value: String,
    /// Hex color code used for the swatch, e.g. "#dc2626"
    pub swatch: String,
}

impl VariantOption {
    pub fn new(name: impl Into<String>, value: impl Into<String>, swatch: impl Into<String>) -> Self {
        Self { name: name.into(), value: value.into(), swatch: swatch.into() }
    }

    /// Perceived-luminance test for the swatch, used to pick a contrasting
    /// label color. Unparseable swatches count as light.
    pub fn swatch_is_light(&self) -> bool {
        let hex = match self.swatch.strip_prefix('#') {
            Some(h) if h.len() >= 6 => h,
            _ => return true,
        };
        let channel = |i: usize| {
            hex.get(i..i + 2)
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .unwrap_or(0xFF) as f64
        };
        let luminance = (0.299 * channel(0) + 0.587 * channel(2) + 0.114 * channel(4)) / 255.0;
        luminance > 0.75
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_add_and_multiply() {
        let a = Money::eur(Decimal::new(1050, 2));
        let b = Money::eur(Decimal::new(450, 2));
        assert_eq!(a.add(&b).unwrap().amount(), Decimal::new(1500, 2));
        assert_eq!(a.multiply(3).amount(), Decimal::new(3150, 2));
    }

    #[test]
    fn test_money_currency_mismatch() {
        let a = Money::eur(Decimal::ONE);
        let b = Money::new(Decimal::ONE, "USD");
        assert!(a.add(&b).is_err());
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::eur(Decimal::new(5, 0)).to_string(), "€5.00");
        assert_eq!(Money::eur(Decimal::new(1234, 2)).to_string(), "€12.34");
    }

    #[test]
    fn test_line_id_derivation() {
        let plain = LineId::derive("vela-01", "rojo", None);
        assert_eq!(plain.as_str(), "vela-01-rojo");
        let scented = LineId::derive("vela-01", "rojo", Some("lavanda"));
        assert_eq!(scented.as_str(), "vela-01-rojo-lavanda");
        assert_ne!(plain, scented);
    }

    #[test]
    fn test_swatch_luminance() {
        assert!(VariantOption::new("Blanco Nieve", "blanco", "#FFFFFF").swatch_is_light());
        assert!(!VariantOption::new("Negro Ónix", "negro", "#000000").swatch_is_light());
        assert!(!VariantOption::new("Rojo Clásico", "rojo", "#dc2626").swatch_is_light());
        // Malformed swatches default to light.
        assert!(VariantOption::new("?", "x", "dc2626").swatch_is_light());
    }
}
