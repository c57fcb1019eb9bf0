//! Aggregates module
pub mod cart;
pub mod checkout;
pub mod product;

pub use cart::{Cart, CartLine, CartState, CostBreakdown, PackagingOption};
pub use checkout::{CheckoutFlow, CheckoutReceipt, CheckoutState, Order};
pub use product::Product;
