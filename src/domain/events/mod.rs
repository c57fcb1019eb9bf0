//! Domain events
//!
//! Raised by the cart store and the checkout flow, drained with
//! `take_events` by whoever drives the UI (notifications, badges).

use rust_decimal::Decimal;

use crate::domain::aggregates::cart::PackagingOption;
use crate::domain::value_objects::LineId;

#[derive(Clone, Debug)]
pub enum DomainEvent {
    Cart(CartEvent),
    Checkout(CheckoutEvent),
}

#[derive(Clone, Debug)]
pub enum CartEvent {
    LineAdded { line_id: LineId, quantity: u32 },
    LineRemoved { line_id: LineId },
    QuantityChanged { line_id: LineId, quantity: u32 },
    PackagingChanged { option: PackagingOption },
    Cleared,
}

#[derive(Clone, Debug)]
pub enum CheckoutEvent {
    SummaryPresented { order_id: String },
    Cancelled { order_id: String },
    ClearCancelled { order_id: String },
    Completed { order_id: String, total: Decimal },
}
