//! Wishlist: membership-only set of products, kept in insertion order.

use vibecart_catalog::{Catalog, Product, ProductId};
use vibecart_core::{AggregateRoot, DomainResult, SessionId};

/// Aggregate root: the session's wishlist. Independent of the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WishlistSet {
    id: SessionId,
    members: Vec<ProductId>,
    version: u64,
}

impl WishlistSet {
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            members: Vec::new(),
            version: 0,
        }
    }

    /// Flip membership; returns the new state (`true` = now wishlisted).
    pub fn toggle(&mut self, catalog: &Catalog, product_id: ProductId) -> DomainResult<bool> {
        catalog.require(product_id)?;
        let now_member = match self.members.iter().position(|&id| id == product_id) {
            Some(i) => {
                self.members.remove(i);
                false
            }
            None => {
                self.members.push(product_id);
                true
            }
        };
        self.version += 1;
        tracing::info!(product_id = product_id.get(), wishlisted = now_member, "wishlist toggled");
        Ok(now_member)
    }

    pub fn contains(&self, product_id: ProductId) -> bool {
        self.members.contains(&product_id)
    }

    /// Member ids, oldest first.
    pub fn ids(&self) -> &[ProductId] {
        &self.members
    }

    /// Member products, oldest first. Ids the catalog lacks are skipped.
    pub fn list<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Product> {
        self.members.iter().filter_map(|&id| catalog.get(id)).collect()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl AggregateRoot for WishlistSet {
    type Id = SessionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}
