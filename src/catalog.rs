//! Catalog provider and paging.
//!
//! The storefront renders the catalog as an infinite scroll: fetch a page at
//! the current offset, append, stop when the provider runs out. A failed
//! fetch halts pagination but everything already fetched stays usable.

use std::future::Future;

use crate::domain::aggregates::product::Product;
use crate::{Result, StorefrontError};

pub trait CatalogProvider {
    /// Products starting at `offset`, at most one page. An empty page means
    /// the end of the catalog.
    fn fetch_page(&self, offset: usize) -> impl Future<Output = Result<Vec<Product>>> + Send;
    fn total_count(&self) -> usize;
}

/// In-memory catalog backed by a static product list, the storefront's data
/// source. Loadable from a JSON array.
#[derive(Clone, Debug)]
pub struct StaticCatalog {
    products: Vec<Product>,
    page_size: usize,
}

impl StaticCatalog {
    pub fn new(products: Vec<Product>, page_size: usize) -> Self {
        Self { products, page_size: page_size.max(1) }
    }

    pub fn from_json_str(raw: &str, page_size: usize) -> Result<Self> {
        let products: Vec<Product> = serde_json::from_str(raw)
            .map_err(|e| StorefrontError::Catalog(format!("catalog data: {e}")))?;
        Ok(Self::new(products, page_size))
    }

    pub fn page_size(&self) -> usize { self.page_size }
}

impl CatalogProvider for StaticCatalog {
    async fn fetch_page(&self, offset: usize) -> Result<Vec<Product>> {
        if offset >= self.products.len() {
            return Ok(vec![]);
        }
        let end = (offset + self.page_size).min(self.products.len());
        Ok(self.products[offset..end].to_vec())
    }

    fn total_count(&self) -> usize { self.products.len() }
}

/// Infinite-scroll cursor over a catalog provider. Accumulates fetched
/// products and tracks whether more remain.
#[derive(Debug)]
pub struct CatalogPager<P> {
    provider: P,
    items: Vec<Product>,
    offset: usize,
    exhausted: bool,
}

impl<P: CatalogProvider> CatalogPager<P> {
    pub fn new(provider: P) -> Self {
        Self { provider, items: vec![], offset: 0, exhausted: false }
    }

    /// Everything fetched so far, in catalog order.
    pub fn items(&self) -> &[Product] { &self.items }

    pub fn has_more(&self) -> bool {
        !self.exhausted && self.offset < self.provider.total_count()
    }

    /// Fetch and append the next page, returning the freshly added products.
    /// A fetch failure halts pagination (single attempt per page, no retry);
    /// what was already fetched stays available.
    pub async fn load_more(&mut self) -> Result<&[Product]> {
        if !self.has_more() {
            return Ok(&[]);
        }
        let page = match self.provider.fetch_page(self.offset).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(offset = self.offset, error = %e, "catalog fetch failed, halting pagination");
                self.exhausted = true;
                return Err(e);
            }
        };
        if page.is_empty() {
            self.exhausted = true;
            return Ok(&[]);
        }
        self.offset += page.len();
        let start = self.items.len();
        self.items.extend(page);
        Ok(&self.items[start..])
    }
}
