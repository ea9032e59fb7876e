//! Cart ledger: product id → quantity for one session.

use serde::{Deserialize, Serialize};

use vibecart_catalog::{Catalog, Product, ProductId};
use vibecart_core::{AggregateRoot, DomainError, DomainResult, Money, SessionId};

use crate::recent::RecentlyViewed;

/// Per-session cart limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLimits {
    /// Hard cap on a single line, applied on top of the product's stock.
    pub max_quantity_per_line: u32,
    pub recently_viewed_capacity: usize,
}

impl Default for CartLimits {
    fn default() -> Self {
        Self {
            max_quantity_per_line: 10,
            recently_viewed_capacity: 5,
        }
    }
}

/// A product and how many of it are in the cart. `quantity >= 1` always.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// What an `add_item` call actually did.
///
/// Requests beyond the line cap are clamped rather than rejected; `added`
/// tells the caller how much of the request went in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AddOutcome {
    pub product_id: ProductId,
    pub requested: u32,
    pub added: u32,
    /// Line quantity after the add.
    pub line_quantity: u32,
    /// `min(max_quantity_per_line, stock)` for this product.
    pub cap: u32,
}

impl AddOutcome {
    pub fn clamped(&self) -> bool {
        self.added < self.requested
    }
}

/// Aggregate root: the session's cart.
///
/// Lines keep first-insertion order. Adding also feeds the recently viewed
/// buffer, which survives `clear()` and checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLedger {
    id: SessionId,
    limits: CartLimits,
    lines: Vec<CartLine>,
    recently_viewed: RecentlyViewed,
    version: u64,
}

impl CartLedger {
    pub fn new(id: SessionId, limits: CartLimits) -> Self {
        Self {
            id,
            limits,
            lines: Vec::new(),
            recently_viewed: RecentlyViewed::new(limits.recently_viewed_capacity),
            version: 0,
        }
    }

    pub fn limits(&self) -> CartLimits {
        self.limits
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn recently_viewed(&self) -> &RecentlyViewed {
        &self.recently_viewed
    }

    pub fn get_quantity(&self, product_id: ProductId) -> u32 {
        self.position(product_id)
            .map(|i| self.lines[i].quantity)
            .unwrap_or(0)
    }

    /// Sum of all line quantities.
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Largest quantity a line for `product` may hold.
    pub fn line_cap(&self, product: &Product) -> u32 {
        self.limits.max_quantity_per_line.min(product.stock())
    }

    /// Add `quantity` of a product, clamping to the line cap.
    ///
    /// Fails with `NotFound` for unknown products, `OutOfStock` when the product
    /// has no stock, and `QuantityExceeded` when the line is already at its cap
    /// (nothing could be added). A zero quantity is a validation error.
    pub fn add_item(
        &mut self,
        catalog: &Catalog,
        product_id: ProductId,
        quantity: u32,
    ) -> DomainResult<AddOutcome> {
        if quantity == 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }
        let product = catalog.require(product_id)?;
        if !product.in_stock() {
            return Err(DomainError::out_of_stock(product_id.to_string()));
        }

        let cap = self.line_cap(product);
        let current = self.get_quantity(product_id);
        let room = cap.saturating_sub(current);
        if room == 0 {
            return Err(DomainError::quantity_exceeded(product_id.to_string(), quantity, cap));
        }

        let added = quantity.min(room);
        let line_quantity = current + added;
        match self.position(product_id) {
            Some(i) => self.lines[i].quantity = line_quantity,
            None => self.lines.push(CartLine {
                product_id,
                quantity: line_quantity,
            }),
        }
        self.recently_viewed.record(product_id);
        self.version += 1;

        let outcome = AddOutcome {
            product_id,
            requested: quantity,
            added,
            line_quantity,
            cap,
        };
        if outcome.clamped() {
            tracing::warn!(
                product_id = product_id.get(),
                requested = quantity,
                added,
                cap,
                "cart line clamped to cap"
            );
        } else {
            tracing::info!(product_id = product_id.get(), quantity = added, line_quantity, "cart item added");
        }
        Ok(outcome)
    }

    /// Replace a line's quantity outright. Zero removes the line.
    ///
    /// Unlike `add_item`, an explicit quantity above the cap is rejected.
    pub fn set_quantity(
        &mut self,
        catalog: &Catalog,
        product_id: ProductId,
        quantity: u32,
    ) -> DomainResult<()> {
        if quantity == 0 {
            self.remove_item(product_id);
            return Ok(());
        }
        let product = catalog.require(product_id)?;
        if !product.in_stock() {
            return Err(DomainError::out_of_stock(product_id.to_string()));
        }
        let cap = self.line_cap(product);
        if quantity > cap {
            return Err(DomainError::quantity_exceeded(product_id.to_string(), quantity, cap));
        }

        match self.position(product_id) {
            Some(i) if self.lines[i].quantity == quantity => return Ok(()),
            Some(i) => self.lines[i].quantity = quantity,
            None => self.lines.push(CartLine {
                product_id,
                quantity,
            }),
        }
        self.version += 1;
        tracing::info!(product_id = product_id.get(), quantity, "cart line quantity set");
        Ok(())
    }

    /// Remove a line. Absent lines are a no-op; returns whether anything was removed.
    pub fn remove_item(&mut self, product_id: ProductId) -> bool {
        let Some(i) = self.position(product_id) else {
            return false;
        };
        self.lines.remove(i);
        self.version += 1;
        tracing::info!(product_id = product_id.get(), "cart item removed");
        true
    }

    pub fn clear(&mut self) {
        if self.lines.is_empty() {
            return;
        }
        self.lines.clear();
        self.version += 1;
        tracing::info!("cart cleared");
    }

    /// Σ unit price × quantity over current lines.
    ///
    /// Fails with `NotFound` if a line references a product the catalog lacks.
    pub fn subtotal(&self, catalog: &Catalog) -> DomainResult<Money> {
        self.lines
            .iter()
            .map(|line| {
                catalog
                    .require(line.product_id)
                    .map(|p| p.price().times(line.quantity))
            })
            .sum()
    }

    /// Current lines joined with their catalog products.
    pub fn lines_with_products<'a>(
        &self,
        catalog: &'a Catalog,
    ) -> DomainResult<Vec<(&'a Product, u32)>> {
        self.lines
            .iter()
            .map(|line| catalog.require(line.product_id).map(|p| (p, line.quantity)))
            .collect()
    }

    /// Owned copy of the current lines.
    pub fn snapshot(&self) -> Vec<CartLine> {
        self.lines.clone()
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.lines.iter().position(|l| l.product_id == product_id)
    }
}

impl AggregateRoot for CartLedger {
    type Id = SessionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vibecart_catalog::{Category, ProductRecord};

    fn test_catalog() -> Catalog {
        Catalog::from_records(vec![
            ProductRecord::new(1, "Rainbow Sneakers", 89.99, Category::Footwear, 12),
            ProductRecord::new(2, "Gradient Smart Watch", 329.99, Category::Electronics, 3),
            ProductRecord::new(3, "Tie-Dye T-Shirt", 45.00, Category::Clothing, 20),
            ProductRecord::new(4, "Sold Out Mug", 19.99, Category::Home, 0),
        ])
        .unwrap()
    }

    fn test_cart() -> CartLedger {
        CartLedger::new(SessionId::new(), CartLimits::default())
    }

    #[test]
    fn add_item_creates_then_increments_line() {
        let catalog = test_catalog();
        let mut cart = test_cart();

        let outcome = cart.add_item(&catalog, ProductId(1), 1).unwrap();
        assert_eq!(outcome.line_quantity, 1);
        assert!(!outcome.clamped());

        let outcome = cart.add_item(&catalog, ProductId(1), 2).unwrap();
        assert_eq!(outcome.line_quantity, 3);
        assert_eq!(cart.get_quantity(ProductId(1)), 3);
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn add_item_clamps_to_per_line_cap() {
        let catalog = test_catalog();
        let mut cart = test_cart();

        let outcome = cart.add_item(&catalog, ProductId(1), 15).unwrap();
        assert_eq!(outcome.cap, 10);
        assert_eq!(outcome.added, 10);
        assert!(outcome.clamped());
        assert_eq!(cart.get_quantity(ProductId(1)), 10);
    }

    #[test]
    fn add_item_clamps_to_stock_below_cap() {
        let catalog = test_catalog();
        let mut cart = test_cart();

        cart.add_item(&catalog, ProductId(2), 2).unwrap();
        let outcome = cart.add_item(&catalog, ProductId(2), 5).unwrap();
        assert_eq!(outcome.cap, 3);
        assert_eq!(outcome.added, 1);
        assert_eq!(cart.get_quantity(ProductId(2)), 3);
    }

    #[test]
    fn add_item_at_cap_is_rejected_without_mutation() {
        let catalog = test_catalog();
        let mut cart = test_cart();
        cart.add_item(&catalog, ProductId(2), 3).unwrap();
        let version = cart.version();

        let err = cart.add_item(&catalog, ProductId(2), 1).unwrap_err();
        match err {
            DomainError::QuantityExceeded { requested, cap, .. } => {
                // The amount asked for in this call, same as AddOutcome::requested.
                assert_eq!(requested, 1);
                assert_eq!(cap, 3);
            }
            other => panic!("Expected QuantityExceeded, got {other:?}"),
        }
        assert_eq!(cart.get_quantity(ProductId(2)), 3);
        assert_eq!(cart.version(), version);
    }

    #[test]
    fn add_item_rejects_unknown_product() {
        let catalog = test_catalog();
        let mut cart = test_cart();
        match cart.add_item(&catalog, ProductId(42), 1).unwrap_err() {
            DomainError::NotFound(_) => {}
            other => panic!("Expected NotFound, got {other:?}"),
        }
        assert!(cart.is_empty());
        assert!(cart.recently_viewed().is_empty());
    }

    #[test]
    fn add_item_rejects_out_of_stock_and_zero_quantity() {
        let catalog = test_catalog();
        let mut cart = test_cart();
        assert!(matches!(
            cart.add_item(&catalog, ProductId(4), 1),
            Err(DomainError::OutOfStock(_))
        ));
        assert!(matches!(
            cart.add_item(&catalog, ProductId(1), 0),
            Err(DomainError::Validation(_))
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn add_item_records_recently_viewed() {
        let catalog = test_catalog();
        let mut cart = test_cart();
        cart.add_item(&catalog, ProductId(3), 1).unwrap();
        cart.add_item(&catalog, ProductId(1), 1).unwrap();
        cart.add_item(&catalog, ProductId(3), 1).unwrap();
        assert_eq!(cart.recently_viewed().ids(), &[ProductId(3), ProductId(1)]);

        cart.clear();
        assert_eq!(cart.recently_viewed().len(), 2);
    }

    #[test]
    fn remove_absent_line_is_a_no_op() {
        let mut cart = test_cart();
        assert!(!cart.remove_item(ProductId(1)));
        assert_eq!(cart.version(), 0);
    }

    #[test]
    fn remove_and_clear() {
        let catalog = test_catalog();
        let mut cart = test_cart();
        cart.add_item(&catalog, ProductId(1), 1).unwrap();
        cart.add_item(&catalog, ProductId(3), 2).unwrap();

        assert!(cart.remove_item(ProductId(1)));
        assert_eq!(cart.get_quantity(ProductId(1)), 0);
        assert_eq!(cart.item_count(), 2);

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn set_quantity_replaces_removes_and_rejects_over_cap() {
        let catalog = test_catalog();
        let mut cart = test_cart();
        cart.add_item(&catalog, ProductId(1), 1).unwrap();

        cart.set_quantity(&catalog, ProductId(1), 7).unwrap();
        assert_eq!(cart.get_quantity(ProductId(1)), 7);

        match cart.set_quantity(&catalog, ProductId(1), 11).unwrap_err() {
            DomainError::QuantityExceeded { cap: 10, .. } => {}
            other => panic!("Expected QuantityExceeded, got {other:?}"),
        }
        assert_eq!(cart.get_quantity(ProductId(1)), 7);

        cart.set_quantity(&catalog, ProductId(1), 0).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn subtotal_sums_exact_cents() {
        let catalog = test_catalog();
        let mut cart = test_cart();
        cart.add_item(&catalog, ProductId(1), 1).unwrap();
        cart.add_item(&catalog, ProductId(3), 2).unwrap();
        assert_eq!(cart.subtotal(&catalog).unwrap(), Money::from_cents(17_999));
    }

    #[test]
    fn subtotal_fails_on_line_missing_from_catalog() {
        let catalog = test_catalog();
        let mut cart = test_cart();
        cart.add_item(&catalog, ProductId(1), 1).unwrap();

        let other = Catalog::from_records(vec![ProductRecord::new(9, "Other", 1.0, Category::Art, 1)])
            .unwrap();
        assert!(matches!(cart.subtotal(&other), Err(DomainError::NotFound(_))));
    }

    #[test]
    fn lines_with_products_preserves_insertion_order() {
        let catalog = test_catalog();
        let mut cart = test_cart();
        cart.add_item(&catalog, ProductId(3), 2).unwrap();
        cart.add_item(&catalog, ProductId(1), 1).unwrap();

        let lines = cart.lines_with_products(&catalog).unwrap();
        let view: Vec<(u32, u32)> = lines.iter().map(|(p, q)| (p.id_typed().get(), *q)).collect();
        assert_eq!(view, vec![(3, 2), (1, 1)]);
    }

    #[test]
    fn version_counts_effective_mutations() {
        let catalog = test_catalog();
        let mut cart = test_cart();
        assert_eq!(cart.version(), 0);
        cart.add_item(&catalog, ProductId(1), 1).unwrap();
        cart.set_quantity(&catalog, ProductId(1), 1).unwrap();
        cart.clear();
        cart.clear();
        assert_eq!(cart.version(), 2);
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Add(u32, u32),
            Remove(u32),
            Set(u32, u32),
            Clear,
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                4 => (1u32..6, 0u32..15).prop_map(|(id, q)| Op::Add(id, q)),
                2 => (1u32..6).prop_map(Op::Remove),
                2 => (1u32..6, 0u32..12).prop_map(|(id, q)| Op::Set(id, q)),
                1 => Just(Op::Clear),
            ]
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: item count equals the sum of line quantities, every line
            /// stays within [1, cap], and the subtotal is the exact line sum.
            #[test]
            fn ledger_invariants_hold(ops in proptest::collection::vec(op(), 0..40)) {
                let catalog = test_catalog();
                let mut cart = test_cart();

                for op in ops {
                    let before = cart.clone();
                    let result = match op {
                        Op::Add(id, q) => cart.add_item(&catalog, ProductId(id), q).map(|_| ()),
                        Op::Remove(id) => {
                            cart.remove_item(ProductId(id));
                            Ok(())
                        }
                        Op::Set(id, q) => cart.set_quantity(&catalog, ProductId(id), q),
                        Op::Clear => {
                            cart.clear();
                            Ok(())
                        }
                    };
                    if result.is_err() {
                        prop_assert_eq!(&cart, &before);
                    }

                    let sum: u32 = cart.lines().iter().map(|l| l.quantity).sum();
                    prop_assert_eq!(cart.item_count(), sum);

                    for line in cart.lines() {
                        let product = catalog.get(line.product_id).unwrap();
                        prop_assert!(line.quantity >= 1);
                        prop_assert!(line.quantity <= cart.line_cap(product));
                    }

                    let expected: u64 = cart
                        .lines()
                        .iter()
                        .map(|l| catalog.get(l.product_id).unwrap().price().cents() * l.quantity as u64)
                        .sum();
                    prop_assert_eq!(cart.subtotal(&catalog).unwrap(), Money::from_cents(expected));
                }
            }
        }
    }
}
