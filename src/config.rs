//! Store configuration: seller identity, pricing fees, variant option sets.
//!
//! Defaults live in code; `StoreConfig::from_env` applies `MARIVELAS_*`
//! overrides after loading `.env`. The variant catalog is static data loaded
//! once at startup, either the built-in sets or a JSON replacement.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::domain::value_objects::{Money, VariantOption};
use crate::{Result, StorefrontError};

pub const DEFAULT_SELLER_EMAIL: &str = "pedidos@marivelas.es";
pub const DEFAULT_ORDER_ID_PREFIX: &str = "MV";
pub const DEFAULT_CART_SLOT_FILE: &str = "marivelas-cart.json";
pub const DEFAULT_PAGE_SIZE: usize = 6;

// =============================================================================
// Pricing
// =============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct PricingConfig {
    /// One flat fee per order when standard packaging is selected.
    pub standard_packaging: Money,
    /// Per-candle fee when premium packaging is selected.
    pub premium_packaging_per_unit: Money,
    /// Flat fee for any non-empty cart.
    pub shipping: Money,
}

impl PricingConfig {
    pub fn currency(&self) -> &str { self.shipping.currency() }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            standard_packaging: Money::eur(Decimal::new(250, 2)),
            premium_packaging_per_unit: Money::eur(Decimal::new(150, 2)),
            shipping: Money::eur(Decimal::new(495, 2)),
        }
    }
}

// =============================================================================
// Store configuration
// =============================================================================

#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Where the customer sends the order email.
    pub seller_email: String,
    /// Short prefix for generated order ids ("MV" → "MV-1717171717171").
    pub order_id_prefix: String,
    pub pricing: PricingConfig,
    /// Durable slot holding the serialized cart between sessions.
    pub cart_slot_path: PathBuf,
    /// Catalog page size for the infinite scroll.
    pub page_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            seller_email: DEFAULT_SELLER_EMAIL.to_string(),
            order_id_prefix: DEFAULT_ORDER_ID_PREFIX.to_string(),
            pricing: PricingConfig::default(),
            cart_slot_path: PathBuf::from(DEFAULT_CART_SLOT_FILE),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl StoreConfig {
    /// Defaults overridden by `MARIVELAS_*` environment variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let mut config = Self::default();
        if let Ok(v) = std::env::var("MARIVELAS_SELLER_EMAIL") {
            config.seller_email = v;
        }
        if let Ok(v) = std::env::var("MARIVELAS_ORDER_ID_PREFIX") {
            config.order_id_prefix = v;
        }
        if let Ok(v) = std::env::var("MARIVELAS_CART_SLOT") {
            config.cart_slot_path = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("MARIVELAS_PAGE_SIZE") {
            config.page_size = v
                .parse()
                .map_err(|_| StorefrontError::Config(format!("invalid MARIVELAS_PAGE_SIZE: {v}")))?;
        }
        config.pricing.standard_packaging =
            env_money("MARIVELAS_STANDARD_PACKAGING_COST", config.pricing.standard_packaging)?;
        config.pricing.premium_packaging_per_unit = env_money(
            "MARIVELAS_PREMIUM_PACKAGING_COST_PER_ITEM",
            config.pricing.premium_packaging_per_unit,
        )?;
        config.pricing.shipping = env_money("MARIVELAS_SHIPPING_COST", config.pricing.shipping)?;
        Ok(config)
    }
}

fn env_money(var: &str, default: Money) -> Result<Money> {
    match std::env::var(var) {
        Ok(raw) => {
            let amount = raw
                .parse::<Decimal>()
                .map_err(|_| StorefrontError::Config(format!("invalid {var}: {raw}")))?;
            Ok(Money::new(amount, default.currency()))
        }
        Err(_) => Ok(default),
    }
}

// =============================================================================
// Variant option sets
// =============================================================================

/// Ordered set of variant options, looked up by `value` key.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionSet(Vec<VariantOption>);

impl OptionSet {
    pub fn new(options: Vec<VariantOption>) -> Self { Self(options) }
    pub fn get(&self, value: &str) -> Option<&VariantOption> {
        self.0.iter().find(|o| o.value == value)
    }
    pub fn iter(&self) -> impl Iterator<Item = &VariantOption> { self.0.iter() }
    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

/// The two static option dimensions, Color and Scent, loaded once at startup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VariantCatalog {
    pub colors: OptionSet,
    #[serde(default)]
    pub scents: OptionSet,
}

impl VariantCatalog {
    pub fn builtin() -> Self {
        let opt = |name: &str, value: &str, swatch: &str| VariantOption::new(name, value, swatch);
        Self {
            colors: OptionSet::new(vec![
                opt("Rojo Clásico", "rojo", "#dc2626"),
                opt("Azul Océano", "azul", "#2563eb"),
                opt("Verde Bosque", "verde", "#16a34a"),
                opt("Rosa Pastel", "rosa", "#fbcfe8"),
                opt("Beige Arena", "beige", "#f5e7c4"),
                opt("Marrón Tierra", "marron", "#78350f"),
                opt("Blanco Nieve", "blanco", "#FFFFFF"),
                opt("Negro Ónix", "negro", "#000000"),
            ]),
            scents: OptionSet::new(vec![
                opt("Lavanda", "lavanda", "#a78bfa"),
                opt("Vainilla", "vainilla", "#fde68a"),
                opt("Canela", "canela", "#b45309"),
                opt("Jazmín", "jazmin", "#f9fafb"),
                opt("Sin Aroma", "neutro", "#e5e7eb"),
            ]),
        }
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        serde_json::from_str(raw)
            .map_err(|e| StorefrontError::Config(format!("variant catalog: {e}")))
    }
}
