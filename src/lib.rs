//! Marivelas Storefront
//!
//! Storefront core for a small handcrafted-candle shop.
//!
//! ## Features
//! - Product catalog with offset paging (infinite scroll backend)
//! - Shopping cart with color/scent variants and merge-on-add lines
//! - Cost breakdown: subtotal, packaging options, flat shipping
//! - Manual checkout: order id, email-ready summary, confirm-before-clear
//! - Durable cart persistence in a local JSON slot
//!
//! There is no payment processing and no server-side order record: checkout
//! produces a text summary the customer emails to the seller, quoting the
//! generated order id.

pub mod catalog;
pub mod config;
pub mod contact;
pub mod domain;
pub mod storage;
pub mod store;

pub use catalog::{CatalogPager, CatalogProvider, StaticCatalog};
pub use config::{OptionSet, PricingConfig, StoreConfig, VariantCatalog};
pub use contact::ContactDetails;
pub use domain::aggregates::cart::{Cart, CartLine, CartState, CostBreakdown, PackagingOption};
pub use domain::aggregates::checkout::{
    CheckoutFlow, CheckoutReceipt, CheckoutState, Clipboard, Order,
};
pub use domain::aggregates::product::Product;
pub use domain::value_objects::{LineId, Money, VariantOption};
pub use storage::{CartSlot, JsonFileSlot};
pub use store::CartStore;

use thiserror::Error;

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum StorefrontError {
    #[error("Cart is empty")]
    EmptyCart,

    #[error("Checkout step not allowed: {0}")]
    CheckoutState(&'static str),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Catalog fetch failed: {0}")]
    Catalog(String),

    #[error("Clipboard unavailable: {0}")]
    Clipboard(String),

    #[error("Invalid contact details")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, StorefrontError>;
