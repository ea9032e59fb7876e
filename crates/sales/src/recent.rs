//! Bounded "recently viewed" buffer.

use serde::Serialize;

use vibecart_catalog::ProductId;

/// First-touch ordered, duplicate-free buffer of product ids.
///
/// Re-recording an id already present does not move it. When full, the oldest
/// entry is evicted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentlyViewed {
    capacity: usize,
    ids: Vec<ProductId>,
}

impl RecentlyViewed {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ids: Vec::with_capacity(capacity),
        }
    }

    /// Returns `true` if the id was newly recorded.
    pub fn record(&mut self, id: ProductId) -> bool {
        if self.capacity == 0 || self.ids.contains(&id) {
            return false;
        }
        self.ids.push(id);
        if self.ids.len() > self.capacity {
            self.ids.remove(0);
        }
        true
    }

    /// Oldest first.
    pub fn ids(&self) -> &[ProductId] {
        &self.ids
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
