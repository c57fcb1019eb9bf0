//! Product catalog record

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Money;

/// A catalog item. Immutable: the cart takes snapshots of products and never
/// writes back, and the catalog itself is a static data source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: Money,
    /// Carousel images, in display order.
    #[serde(default)]
    pub images: Vec<String>,
    /// Whether this product takes color/scent selections.
    #[serde(default = "default_variant_compatible")]
    pub variant_compatible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_variant_compatible() -> bool { true }

impl Product {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            images: vec![],
            variant_compatible: true,
            description: None,
        }
    }

    pub fn with_images(mut self, images: Vec<String>) -> Self {
        self.images = images;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
