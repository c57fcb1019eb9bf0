//! Cart store: the one mutable owner of cart state.
//!
//! UI components receive a reference to this store instead of reaching into
//! ambient globals. Mutations go through named methods; each one on a loaded
//! store publishes a fresh `CartState` snapshot to subscribers (the persister
//! among them) and records a domain event. Snapshots are suppressed until the
//! initial restore finishes, so a fresh empty cart can never clobber
//! persisted state that has not been read yet.

use tokio::sync::watch;

use crate::config::PricingConfig;
use crate::domain::aggregates::cart::{Cart, CartState, CostBreakdown, PackagingOption};
use crate::domain::aggregates::product::Product;
use crate::domain::events::{CartEvent, DomainEvent};
use crate::domain::value_objects::{LineId, Money, VariantOption};
use crate::storage::CartSlot;

#[derive(Debug)]
pub struct CartStore {
    cart: Cart,
    pricing: PricingConfig,
    loaded: bool,
    snapshots: watch::Sender<CartState>,
    events: Vec<DomainEvent>,
}

impl CartStore {
    /// Store that has not yet restored persisted state. Mutations apply in
    /// memory but publish nothing until `finish_load` runs.
    pub fn new_unloaded(pricing: PricingConfig) -> Self {
        let (snapshots, _) = watch::channel(CartState::default());
        Self { cart: Cart::new(), pricing, loaded: false, snapshots, events: vec![] }
    }

    /// Restore from the durable slot. Read or parse failures fall back to an
    /// empty cart with a diagnostic; they are never surfaced as errors.
    pub async fn restore<S: CartSlot>(slot: &S, pricing: PricingConfig) -> Self {
        let mut store = Self::new_unloaded(pricing);
        let state = match slot.load().await {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(error = %e, "could not restore persisted cart, starting empty");
                None
            }
        };
        store.finish_load(state);
        store
    }

    /// Adopt the persisted state (if any) and start publishing snapshots.
    pub fn finish_load(&mut self, state: Option<CartState>) {
        if let Some(state) = state {
            self.cart = Cart::from_state(state);
        }
        self.loaded = true;
        tracing::debug!(items = self.cart.item_count(), "cart loaded");
    }

    pub fn is_loaded(&self) -> bool { self.loaded }

    /// Change-notification channel; each receiver always sees the newest
    /// snapshot, with intermediate states coalesced.
    pub fn subscribe(&self) -> watch::Receiver<CartState> { self.snapshots.subscribe() }

    pub fn cart(&self) -> &Cart { &self.cart }
    pub fn pricing(&self) -> &PricingConfig { &self.pricing }
    pub fn packaging(&self) -> PackagingOption { self.cart.packaging() }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    pub fn add_item(&mut self, product: Product, color: VariantOption, scent: Option<VariantOption>) -> LineId {
        self.add_items(product, color, scent, 1)
    }

    pub fn add_items(
        &mut self,
        product: Product,
        color: VariantOption,
        scent: Option<VariantOption>,
        count: u32,
    ) -> LineId {
        let line_id = self.cart.add_items(product, color, scent, count);
        let quantity = self
            .cart
            .lines()
            .iter()
            .find(|l| l.line_id == line_id)
            .map(|l| l.quantity)
            .unwrap_or(0);
        tracing::debug!(line_id = %line_id, quantity, "cart line added");
        self.raise(CartEvent::LineAdded { line_id: line_id.clone(), quantity });
        self.publish();
        line_id
    }

    pub fn remove_item(&mut self, line_id: &LineId) {
        if self.cart.remove_item(line_id) {
            self.raise(CartEvent::LineRemoved { line_id: line_id.clone() });
            self.publish();
        }
    }

    pub fn update_quantity(&mut self, line_id: &LineId, quantity: u32) {
        if !self.cart.update_quantity(line_id, quantity) {
            return;
        }
        if quantity < 1 {
            self.raise(CartEvent::LineRemoved { line_id: line_id.clone() });
        } else {
            self.raise(CartEvent::QuantityChanged { line_id: line_id.clone(), quantity });
        }
        self.publish();
    }

    pub fn set_packaging(&mut self, option: PackagingOption) {
        self.cart.set_packaging(option);
        self.raise(CartEvent::PackagingChanged { option });
        self.publish();
    }

    pub fn clear(&mut self) {
        self.cart.clear();
        self.raise(CartEvent::Cleared);
        self.publish();
    }

    // -------------------------------------------------------------------------
    // Derived values, recomputed on read
    // -------------------------------------------------------------------------

    pub fn item_count(&self) -> u32 { self.cart.item_count() }
    pub fn is_empty(&self) -> bool { self.cart.is_empty() }
    pub fn subtotal(&self) -> Money { self.cart.subtotal(&self.pricing) }
    pub fn packaging_cost(&self) -> Money { self.cart.packaging_cost(&self.pricing) }
    pub fn shipping_cost(&self) -> Money { self.cart.shipping_cost(&self.pricing) }
    pub fn total(&self) -> Money { self.cart.total(&self.pricing) }
    pub fn costs(&self) -> CostBreakdown { self.cart.costs(&self.pricing) }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }
    fn raise(&mut self, e: CartEvent) { self.events.push(DomainEvent::Cart(e)); }

    fn publish(&self) {
        if !self.loaded {
            return;
        }
        self.snapshots.send_replace(self.cart.snapshot());
    }
}
