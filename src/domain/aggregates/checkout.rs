//! Checkout Flow
//!
//! A finite-state machine over the confirmation dialogs. Placing an order
//! produces an ephemeral `Order` (generated id plus a formatted summary);
//! nothing is sent anywhere — the customer copies the summary into an email
//! to the seller. Clearing the cart is gated behind a second explicit
//! confirmation because the summary is lost with it.

use chrono::{DateTime, Utc};
use std::fmt::Write as _;

use crate::config::StoreConfig;
use crate::domain::aggregates::cart::{CartLine, CostBreakdown, PackagingOption};
use crate::domain::events::{CheckoutEvent, DomainEvent};
use crate::store::CartStore;
use crate::{Result, StorefrontError};

/// Where the flow currently is: one variable, not a pile of dialog booleans.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CheckoutState {
    #[default]
    Idle,
    /// Summary dialog open; user may cancel or acknowledge the instructions.
    SummaryPresented,
    /// Second dialog: confirm clearing the cart (destructive, irreversible).
    AwaitingClearConfirmation,
}

/// Ephemeral order: exists only while the dialogs are open. Never persisted;
/// a lost id simply means an untrackable order, by design of the manual
/// fulfillment model.
#[derive(Clone, Debug)]
pub struct Order {
    order_id: String,
    placed_at: DateTime<Utc>,
    summary: String,
}

impl Order {
    pub fn order_id(&self) -> &str { &self.order_id }
    pub fn placed_at(&self) -> DateTime<Utc> { self.placed_at }
    pub fn summary(&self) -> &str { &self.summary }
}

/// Durable user-visible notice handed back once the cart has been cleared:
/// repeats the order id and the manual next steps.
#[derive(Clone, Debug)]
pub struct CheckoutReceipt {
    pub order_id: String,
    pub message: String,
}

/// Optional copy-to-clipboard hook. Implementations report failure through
/// `StorefrontError::Clipboard`; a failed copy never touches cart or flow
/// state.
pub trait Clipboard {
    fn write_text(&self, text: &str) -> Result<()>;
}

#[derive(Debug)]
pub struct CheckoutFlow {
    seller_email: String,
    order_id_prefix: String,
    state: CheckoutState,
    order: Option<Order>,
    last_issued: i64,
    events: Vec<DomainEvent>,
}

impl CheckoutFlow {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            seller_email: config.seller_email.clone(),
            order_id_prefix: config.order_id_prefix.clone(),
            state: CheckoutState::Idle,
            order: None,
            last_issued: 0,
            events: vec![],
        }
    }

    pub fn state(&self) -> CheckoutState { self.state }
    pub fn order(&self) -> Option<&Order> { self.order.as_ref() }

    /// Place-order action. Only valid from `Idle` and with a non-empty cart.
    /// Generates a fresh order id and the email-ready summary.
    pub fn begin(&mut self, store: &CartStore) -> Result<&Order> {
        if self.state != CheckoutState::Idle {
            return Err(StorefrontError::CheckoutState("checkout already in progress"));
        }
        if store.is_empty() {
            return Err(StorefrontError::EmptyCart);
        }
        let placed_at = Utc::now();
        let order_id = self.next_order_id(placed_at);
        let summary = render_summary(
            &order_id,
            store.cart().lines(),
            store.packaging(),
            &store.costs(),
            &self.seller_email,
        );
        self.state = CheckoutState::SummaryPresented;
        self.raise(CheckoutEvent::SummaryPresented { order_id: order_id.clone() });
        tracing::debug!(order_id = %order_id, "order summary presented");
        Ok(self.order.insert(Order { order_id, placed_at, summary }))
    }

    /// User backs out of the summary dialog. Cart untouched, id discarded.
    pub fn cancel(&mut self) -> Result<()> {
        if self.state != CheckoutState::SummaryPresented {
            return Err(StorefrontError::CheckoutState("no summary to cancel"));
        }
        if let Some(order) = self.order.take() {
            self.raise(CheckoutEvent::Cancelled { order_id: order.order_id });
        }
        self.state = CheckoutState::Idle;
        Ok(())
    }

    /// User confirms having read the instructions; advance to the explicit
    /// clear-cart confirmation.
    pub fn acknowledge(&mut self) -> Result<()> {
        if self.state != CheckoutState::SummaryPresented {
            return Err(StorefrontError::CheckoutState("no summary presented"));
        }
        self.state = CheckoutState::AwaitingClearConfirmation;
        Ok(())
    }

    /// Second confirmation: clear the cart and finish the flow.
    pub fn confirm_clear(&mut self, store: &mut CartStore) -> Result<CheckoutReceipt> {
        if self.state != CheckoutState::AwaitingClearConfirmation {
            return Err(StorefrontError::CheckoutState("cart clear not pending"));
        }
        let order = self
            .order
            .take()
            .ok_or(StorefrontError::CheckoutState("no active order"))?;
        let total = store.total();
        store.clear();
        self.state = CheckoutState::Idle;
        self.raise(CheckoutEvent::Completed {
            order_id: order.order_id.clone(),
            total: total.amount(),
        });
        tracing::info!(order_id = %order.order_id, total = %total, "checkout completed, cart cleared");
        let message = completion_message(&order.order_id, &self.seller_email);
        Ok(CheckoutReceipt { order_id: order.order_id, message })
    }

    /// Back out of the clear confirmation. The cart stays as it was; the
    /// order id is discarded and a new attempt will generate a fresh one.
    pub fn cancel_clear(&mut self) -> Result<()> {
        if self.state != CheckoutState::AwaitingClearConfirmation {
            return Err(StorefrontError::CheckoutState("cart clear not pending"));
        }
        if let Some(order) = self.order.take() {
            self.raise(CheckoutEvent::ClearCancelled { order_id: order.order_id });
        }
        self.state = CheckoutState::Idle;
        Ok(())
    }

    /// Copy the current summary for the customer's email client. Failure is
    /// reported to the caller and changes neither cart nor flow state.
    pub fn copy_summary(&self, clipboard: &dyn Clipboard) -> Result<()> {
        let order = self
            .order
            .as_ref()
            .ok_or(StorefrontError::CheckoutState("no summary to copy"))?;
        clipboard.write_text(order.summary())
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }
    fn raise(&mut self, e: CheckoutEvent) { self.events.push(DomainEvent::Checkout(e)); }

    /// Timestamp-derived integer, bumped past the last issued value so two
    /// invocations in the same millisecond still get distinct ids.
    fn next_order_id(&mut self, now: DateTime<Utc>) -> String {
        let stamp = now.timestamp_millis().max(self.last_issued + 1);
        self.last_issued = stamp;
        format!("{}-{}", self.order_id_prefix, stamp)
    }
}

fn render_summary(
    order_id: &str,
    lines: &[CartLine],
    packaging: PackagingOption,
    costs: &CostBreakdown,
    seller_email: &str,
) -> String {
    let mut s = String::new();
    let _ = writeln!(s, "Asunto: Nuevo Pedido - ID: {order_id}");
    s.push('\n');
    s.push_str("Estimado equipo de Marivelas,\n\n");
    s.push_str("Quisiera realizar el siguiente pedido:\n\n");
    for line in lines {
        let _ = writeln!(
            s,
            "- {} ({}) x {} - {}",
            line.product.name,
            line.variant_label(),
            line.quantity,
            line.line_total()
        );
    }
    s.push('\n');
    let _ = writeln!(s, "Subtotal: {}", costs.subtotal);
    let _ = writeln!(s, "Coste de Packaging ({}): {}", packaging.label(), costs.packaging);
    let _ = writeln!(s, "Coste de Envío: {}", costs.shipping);
    s.push_str("-------------------------------------\n");
    let _ = writeln!(s, "TOTAL DEL PEDIDO: {}", costs.total);
    s.push_str("-------------------------------------\n\n");
    s.push_str("Mis datos de contacto son:\n");
    s.push_str("[Por favor, completa aquí tu Nombre, Email y Teléfono si es necesario]\n\n");
    s.push_str("--- Instrucciones para el Cliente ---\n");
    let _ = writeln!(s, "Para finalizar tu pedido, por favor, envía un correo electrónico a: {seller_email}");
    let _ = writeln!(s, "1. Asunto del correo: Nuevo Pedido - ID: {order_id} (¡Copia y pega esto!)");
    s.push_str("2. Cuerpo del correo: Copia y pega TODO este resumen del pedido, incluyendo tus datos de contacto si lo deseas.\n");
    let _ = writeln!(
        s,
        "3. Pago: Realiza el pago del TOTAL DEL PEDIDO ({}) por Bizum al número que te facilitaremos por correo tras recibir tu email.",
        costs.total
    );
    let _ = writeln!(s, "4. Importante: Indica el ID del Pedido ({order_id}) en el concepto del Bizum.");
    s.push_str("Tu pedido comenzará a elaborarse una vez recibido el pago y el correo.\n");
    s.push_str("¡Gracias por tu compra!\n");
    s
}

fn completion_message(order_id: &str, seller_email: &str) -> String {
    format!(
        "¡Instrucciones Recibidas! Tu ID de Pedido es: {order_id}. Por favor, envía ahora el \
         correo electrónico a {seller_email} con el resumen de tu pedido y este ID para \
         finalizar la compra. Tu pedido se procesará una vez recibido el correo y el pago."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PricingConfig;
    use crate::domain::aggregates::product::Product;
    use crate::domain::value_objects::{Money, VariantOption};
    use rust_decimal::Decimal;

    fn loaded_store() -> CartStore {
        let mut store = CartStore::new_unloaded(PricingConfig::default());
        store.finish_load(None);
        store
    }

    fn add_candle(store: &mut CartStore, id: &str, cents: i64, qty: u32) {
        store.add_items(
            Product::new(id, format!("Vela {id}"), Money::eur(Decimal::new(cents, 2))),
            VariantOption::new("Rojo Clásico", "rojo", "#dc2626"),
            Some(VariantOption::new("Lavanda", "lavanda", "#a78bfa")),
            qty,
        );
    }

    fn flow() -> CheckoutFlow {
        CheckoutFlow::new(&StoreConfig::default())
    }

    struct BrokenClipboard;
    impl Clipboard for BrokenClipboard {
        fn write_text(&self, _text: &str) -> Result<()> {
            Err(StorefrontError::Clipboard("permission denied".into()))
        }
    }

    struct RecordingClipboard(std::cell::RefCell<String>);
    impl Clipboard for RecordingClipboard {
        fn write_text(&self, text: &str) -> Result<()> {
            *self.0.borrow_mut() = text.to_string();
            Ok(())
        }
    }

    #[test]
    fn test_begin_requires_non_empty_cart() {
        let store = loaded_store();
        let mut flow = flow();
        assert!(matches!(flow.begin(&store), Err(StorefrontError::EmptyCart)));
        assert_eq!(flow.state(), CheckoutState::Idle);
    }

    #[test]
    fn test_summary_contains_subject_items_and_totals() {
        let mut store = loaded_store();
        add_candle(&mut store, "vela-a", 1250, 2);
        let mut flow = flow();
        let order = flow.begin(&store).unwrap();
        let id = order.order_id().to_string();
        let summary = order.summary();
        assert!(id.starts_with("MV-"));
        assert!(summary.contains(&format!("Asunto: Nuevo Pedido - ID: {id}")));
        assert!(summary.contains("Vela vela-a (Color: Rojo Clásico, Aroma: Lavanda) x 2 - €25.00"));
        assert!(summary.contains("Subtotal: €25.00"));
        assert!(summary.contains("Coste de Packaging (standard): €2.50"));
        assert!(summary.contains("Coste de Envío: €4.95"));
        assert!(summary.contains("TOTAL DEL PEDIDO: €32.45"));
        assert!(summary.contains("pedidos@marivelas.es"));
    }

    #[test]
    fn test_full_flow_clears_cart_once_confirmed() {
        let mut store = loaded_store();
        add_candle(&mut store, "vela-a", 1000, 1);
        let mut flow = flow();
        let id = flow.begin(&store).unwrap().order_id().to_string();
        flow.acknowledge().unwrap();
        assert_eq!(flow.state(), CheckoutState::AwaitingClearConfirmation);
        // The cart must stay intact until the second confirmation.
        assert!(!store.is_empty());
        let receipt = flow.confirm_clear(&mut store).unwrap();
        assert_eq!(receipt.order_id, id);
        assert!(receipt.message.contains(&id));
        assert!(store.is_empty());
        assert_eq!(flow.state(), CheckoutState::Idle);
        assert!(flow.order().is_none());
    }

    #[test]
    fn test_cancelled_then_completed_yields_distinct_ids() {
        let mut store = loaded_store();
        add_candle(&mut store, "vela-a", 1000, 1);
        let mut flow = flow();

        let first = flow.begin(&store).unwrap().order_id().to_string();
        flow.cancel().unwrap();
        assert!(!store.is_empty());

        let second = flow.begin(&store).unwrap().order_id().to_string();
        assert_ne!(first, second);
        flow.acknowledge().unwrap();
        flow.confirm_clear(&mut store).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_cancel_clear_keeps_cart() {
        let mut store = loaded_store();
        add_candle(&mut store, "vela-a", 1000, 2);
        let mut flow = flow();
        flow.begin(&store).unwrap();
        flow.acknowledge().unwrap();
        flow.cancel_clear().unwrap();
        assert_eq!(flow.state(), CheckoutState::Idle);
        assert!(flow.order().is_none());
        assert_eq!(store.item_count(), 2);
    }

    #[test]
    fn test_invalid_transitions_are_rejected() {
        let mut store = loaded_store();
        add_candle(&mut store, "vela-a", 1000, 1);
        let mut flow = flow();
        assert!(flow.cancel().is_err());
        assert!(flow.acknowledge().is_err());
        assert!(flow.cancel_clear().is_err());
        assert!(flow.confirm_clear(&mut store).is_err());

        flow.begin(&store).unwrap();
        // Can't start a second checkout mid-flow.
        assert!(matches!(
            flow.begin(&store),
            Err(StorefrontError::CheckoutState(_))
        ));
        // Can't confirm the clear before acknowledging the summary.
        assert!(flow.confirm_clear(&mut store).is_err());
    }

    #[test]
    fn test_order_ids_are_strictly_monotonic() {
        let mut store = loaded_store();
        add_candle(&mut store, "vela-a", 1000, 1);
        let mut flow = flow();
        let mut previous = String::new();
        for _ in 0..5 {
            let id = flow.begin(&store).unwrap().order_id().to_string();
            assert_ne!(id, previous);
            previous = id;
            flow.cancel().unwrap();
        }
    }

    #[test]
    fn test_clipboard_failure_leaves_state_untouched() {
        let mut store = loaded_store();
        add_candle(&mut store, "vela-a", 1000, 1);
        let mut flow = flow();
        flow.begin(&store).unwrap();
        assert!(matches!(
            flow.copy_summary(&BrokenClipboard),
            Err(StorefrontError::Clipboard(_))
        ));
        assert_eq!(flow.state(), CheckoutState::SummaryPresented);
        assert!(!store.is_empty());

        let clipboard = RecordingClipboard(std::cell::RefCell::new(String::new()));
        flow.copy_summary(&clipboard).unwrap();
        assert!(clipboard.0.borrow().contains("TOTAL DEL PEDIDO"));
    }

    #[test]
    fn test_copy_without_order_is_rejected() {
        let flow = flow();
        assert!(flow.copy_summary(&BrokenClipboard).is_err());
    }
}
