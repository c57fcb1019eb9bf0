//! Cart Aggregate
//!
//! Line items plus the cart-wide packaging choice, with the derived cost
//! breakdown. Pure state and arithmetic: persistence and change notification
//! live in `crate::store` / `crate::storage`.

use serde::{Deserialize, Serialize};

use crate::config::PricingConfig;
use crate::domain::aggregates::product::Product;
use crate::domain::value_objects::{LineId, Money, VariantOption};

/// Cart-wide packaging choice. Affects one derived fee, never per-line data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackagingOption {
    None,
    #[default]
    Standard,
    Premium,
}

impl PackagingOption {
    /// Key used in summaries and stored state ("none" / "standard" / "premium").
    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Standard => "standard",
            Self::Premium => "premium",
        }
    }
}

/// One distinct product+variant combination in the cart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub line_id: LineId,
    /// Snapshot of the product at the time it was added.
    pub product: Product,
    pub color: VariantOption,
    /// Absent on products without a scent dimension, and on cart data saved
    /// before scents existed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scent: Option<VariantOption>,
    pub quantity: u32,
}

impl CartLine {
    pub fn line_total(&self) -> Money { self.product.price.multiply(self.quantity) }

    /// "Color: Rojo Clásico" or "Color: Rojo Clásico, Aroma: Lavanda".
    pub fn variant_label(&self) -> String {
        match &self.scent {
            Some(scent) => format!("Color: {}, Aroma: {}", self.color.name, scent.name),
            None => format!("Color: {}", self.color.name),
        }
    }
}

/// Serialized cart shape: what goes into the persistence slot and over the
/// snapshot channel. Insertion order of lines is preserved.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CartState {
    pub lines: Vec<CartLine>,
    #[serde(default)]
    pub packaging: PackagingOption,
}

/// Derived cost lines for display and the order summary.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub subtotal: Money,
    pub packaging: Money,
    pub shipping: Money,
    pub total: Money,
}

#[derive(Clone, Debug, Default)]
pub struct Cart {
    state: CartState,
}

impl Cart {
    pub fn new() -> Self { Self::default() }

    pub fn from_state(state: CartState) -> Self { Self { state } }

    pub fn snapshot(&self) -> CartState { self.state.clone() }

    pub fn lines(&self) -> &[CartLine] { &self.state.lines }
    pub fn packaging(&self) -> PackagingOption { self.state.packaging }
    pub fn is_empty(&self) -> bool { self.state.lines.is_empty() }
    pub fn line_count(&self) -> usize { self.state.lines.len() }

    /// Total candle units across all lines.
    pub fn item_count(&self) -> u32 {
        self.state.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn add_item(&mut self, product: Product, color: VariantOption, scent: Option<VariantOption>) -> LineId {
        self.add_items(product, color, scent, 1)
    }

    /// Bulk add. Identical product+variant combinations merge into one line;
    /// new lines append at the end. Always succeeds: product/variant validity
    /// is the caller's responsibility.
    pub fn add_items(
        &mut self,
        product: Product,
        color: VariantOption,
        scent: Option<VariantOption>,
        count: u32,
    ) -> LineId {
        let count = count.max(1);
        let line_id = LineId::derive(&product.id, &color.value, scent.as_ref().map(|s| s.value.as_str()));
        if let Some(existing) = self.state.lines.iter_mut().find(|l| l.line_id == line_id) {
            existing.quantity = existing.quantity.saturating_add(count);
        } else {
            self.state.lines.push(CartLine {
                line_id: line_id.clone(),
                product,
                color,
                scent,
                quantity: count,
            });
        }
        line_id
    }

    /// Delete the matching line. No-op (returns false) when absent.
    pub fn remove_item(&mut self, line_id: &LineId) -> bool {
        let before = self.state.lines.len();
        self.state.lines.retain(|l| &l.line_id != line_id);
        self.state.lines.len() != before
    }

    /// A quantity below 1 removes the line. Returns false when no line
    /// matched. Non-numeric input is a UI-boundary concern, excluded here by
    /// the type.
    pub fn update_quantity(&mut self, line_id: &LineId, quantity: u32) -> bool {
        if quantity < 1 {
            return self.remove_item(line_id);
        }
        match self.state.lines.iter_mut().find(|l| &l.line_id == line_id) {
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    pub fn set_packaging(&mut self, option: PackagingOption) {
        self.state.packaging = option;
    }

    /// Empties the lines and resets packaging to the standard default.
    pub fn clear(&mut self) {
        self.state.lines.clear();
        self.state.packaging = PackagingOption::default();
    }

    pub fn subtotal(&self, pricing: &PricingConfig) -> Money {
        self.state
            .lines
            .iter()
            .fold(Money::zero(pricing.currency()), |acc, l| acc.add(&l.line_total()).unwrap_or(acc))
    }

    /// Packaging fee policy: none is free; standard is one flat fee per
    /// order; premium charges per candle unit.
    pub fn packaging_cost(&self, pricing: &PricingConfig) -> Money {
        match self.state.packaging {
            PackagingOption::None => Money::zero(pricing.currency()),
            PackagingOption::Standard => {
                if self.is_empty() { Money::zero(pricing.currency()) } else { pricing.standard_packaging.clone() }
            }
            PackagingOption::Premium => pricing.premium_packaging_per_unit.multiply(self.item_count()),
        }
    }

    /// Flat fee for any non-empty cart, independent of item count.
    pub fn shipping_cost(&self, pricing: &PricingConfig) -> Money {
        if self.is_empty() { Money::zero(pricing.currency()) } else { pricing.shipping.clone() }
    }

    pub fn total(&self, pricing: &PricingConfig) -> Money {
        self.costs(pricing).total
    }

    pub fn costs(&self, pricing: &PricingConfig) -> CostBreakdown {
        let subtotal = self.subtotal(pricing);
        let packaging = self.packaging_cost(pricing);
        let shipping = self.shipping_cost(pricing);
        let total = subtotal
            .add(&packaging)
            .and_then(|t| t.add(&shipping))
            .unwrap_or_else(|_| subtotal.clone());
        CostBreakdown { subtotal, packaging, shipping, total }
    }
}
