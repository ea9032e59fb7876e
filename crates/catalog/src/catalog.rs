//! The immutable product catalog.

use std::collections::HashMap;

use serde::Serialize;

use vibecart_core::{DomainError, DomainResult};

use crate::product::{Category, Product, ProductId, ProductRecord};
use crate::query::{self, FilterSpec};

const STOREFRONT_PRODUCTS: &str = include_str!("../data/products.json");

/// Header figures shown above the product grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub product_count: usize,
    pub on_sale_count: usize,
}

/// Read-only list of validated products in declaration order.
///
/// A catalog is built once and shared (typically behind an `Arc`) by every
/// session; nothing in it can be mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
    index: HashMap<ProductId, usize>,
}

impl Catalog {
    /// Validate raw records and build a catalog.
    ///
    /// The whole load is rejected if any record is malformed or an id repeats.
    pub fn from_records(records: impl IntoIterator<Item = ProductRecord>) -> DomainResult<Self> {
        let mut products = Vec::new();
        let mut index = HashMap::new();

        for record in records {
            let product = record.validate()?;
            let id = product.id_typed();
            if index.insert(id, products.len()).is_some() {
                return Err(DomainError::validation(format!("duplicate {id}")));
            }
            products.push(product);
        }

        Ok(Self { products, index })
    }

    /// Parse a JSON array of product records.
    pub fn from_json(json: &str) -> DomainResult<Self> {
        let records: Vec<ProductRecord> = serde_json::from_str(json)
            .map_err(|e| DomainError::validation(format!("malformed catalog: {e}")))?;
        Self::from_records(records)
    }

    /// The built-in storefront catalog.
    pub fn storefront() -> DomainResult<Self> {
        let catalog = Self::from_json(STOREFRONT_PRODUCTS)?;
        tracing::debug!(products = catalog.len(), "storefront catalog loaded");
        Ok(catalog)
    }

    /// All products in declaration order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.index.get(&id).map(|&i| &self.products[i])
    }

    /// Like [`Catalog::get`] but failing with `NotFound` for unknown ids.
    pub fn require(&self, id: ProductId) -> DomainResult<&Product> {
        self.get(id).ok_or_else(|| DomainError::not_found(id.to_string()))
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn on_sale(&self) -> Vec<&Product> {
        self.products.iter().filter(|p| p.on_sale()).collect()
    }

    /// Distinct categories in order of first appearance.
    pub fn categories(&self) -> Vec<Category> {
        let mut seen = Vec::new();
        for product in &self.products {
            if !seen.contains(&product.category()) {
                seen.push(product.category());
            }
        }
        seen
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            product_count: self.products.len(),
            on_sale_count: self.products.iter().filter(|p| p.on_sale()).count(),
        }
    }

    /// Filter and sort the whole catalog. The catalog itself is untouched.
    pub fn query(&self, spec: &FilterSpec) -> Vec<&Product> {
        query::query(&self.products, spec)
    }
}
