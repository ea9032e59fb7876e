//! One visitor's storefront session.
//!
//! The catalog is shared behind an `Arc`; everything else (cart, wishlist,
//! order history) is owned by the session and never visible to another one.

use std::sync::Arc;

use serde::Serialize;

use vibecart_catalog::{Catalog, FilterSpec, Product, ProductId, recommendations};
use vibecart_core::{DomainResult, Money, SessionId};
use vibecart_sales::{
    AddOutcome, CartLedger, Checkout, Clock, Order, OrderHistory, OrderIdGenerator, PriceQuote,
    PromoCode, SequentialOrderIds, ShippingProgress, SystemClock, WishlistSet,
};

use crate::config::StoreConfig;

/// Header counters shown above the product grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StorefrontStats {
    pub product_count: usize,
    pub on_sale_count: usize,
    pub wishlist_count: usize,
    pub cart_item_count: u32,
}

pub struct Session {
    id: SessionId,
    catalog: Arc<Catalog>,
    config: StoreConfig,
    cart: CartLedger,
    wishlist: WishlistSet,
    orders: OrderHistory,
    clock: Box<dyn Clock>,
    order_ids: Box<dyn OrderIdGenerator>,
}

impl Session {
    /// A fresh session with the system clock and sequential order ids.
    pub fn new(catalog: Arc<Catalog>, config: StoreConfig) -> Self {
        let id = SessionId::new();
        tracing::debug!(session_id = %id, "session opened");
        Self {
            id,
            catalog,
            config,
            cart: CartLedger::new(id, config.limits),
            wishlist: WishlistSet::new(id),
            orders: OrderHistory::new(id),
            clock: Box::new(SystemClock),
            order_ids: Box::new(SequentialOrderIds::new()),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_order_ids(mut self, order_ids: impl OrderIdGenerator + 'static) -> Self {
        self.order_ids = Box::new(order_ids);
        self
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    // Catalog views

    /// Every product, in declaration order.
    pub fn list_catalog(&self) -> &[Product] {
        self.catalog.products()
    }

    pub fn product(&self, product_id: ProductId) -> DomainResult<&Product> {
        self.catalog.require(product_id)
    }

    pub fn query(&self, spec: &FilterSpec) -> Vec<&Product> {
        self.catalog.query(spec)
    }

    pub fn on_sale(&self) -> Vec<&Product> {
        self.catalog.on_sale()
    }

    /// Recently viewed products, oldest first.
    pub fn recently_viewed(&self) -> Vec<&Product> {
        self.cart
            .recently_viewed()
            .ids()
            .iter()
            .filter_map(|&id| self.catalog.get(id))
            .collect()
    }

    pub fn recommendations(&self) -> Vec<&Product> {
        recommendations(&self.catalog, self.cart.recently_viewed().ids())
    }

    // Cart

    pub fn cart(&self) -> &CartLedger {
        &self.cart
    }

    pub fn cart_add(&mut self, product_id: ProductId, quantity: u32) -> DomainResult<AddOutcome> {
        self.cart.add_item(&self.catalog, product_id, quantity)
    }

    /// Removing a product that is not in the cart is a no-op.
    pub fn cart_remove(&mut self, product_id: ProductId) -> bool {
        self.cart.remove_item(product_id)
    }

    pub fn cart_set_quantity(&mut self, product_id: ProductId, quantity: u32) -> DomainResult<()> {
        self.cart.set_quantity(&self.catalog, product_id, quantity)
    }

    pub fn cart_clear(&mut self) {
        self.cart.clear();
    }

    pub fn cart_lines(&self) -> DomainResult<Vec<(&Product, u32)>> {
        self.cart.lines_with_products(&self.catalog)
    }

    pub fn cart_subtotal(&self) -> DomainResult<Money> {
        self.cart.subtotal(&self.catalog)
    }

    pub fn cart_item_count(&self) -> u32 {
        self.cart.item_count()
    }

    /// Order summary for the current cart, optionally with a promo code.
    pub fn quote(&self, promo: Option<&str>) -> DomainResult<PriceQuote> {
        let promo = promo.map(str::parse::<PromoCode>).transpose()?;
        let subtotal = self.cart_subtotal()?;
        self.config
            .pricing
            .quote(subtotal, self.cart.item_count(), promo)
    }

    pub fn shipping_progress(&self) -> DomainResult<ShippingProgress> {
        Ok(self.config.pricing.shipping_progress(self.cart_subtotal()?))
    }

    // Wishlist

    /// Flip membership; returns whether the product is now wishlisted.
    pub fn wishlist_toggle(&mut self, product_id: ProductId) -> DomainResult<bool> {
        self.wishlist.toggle(&self.catalog, product_id)
    }

    pub fn is_wishlisted(&self, product_id: ProductId) -> bool {
        self.wishlist.contains(product_id)
    }

    pub fn wishlist(&self) -> Vec<&Product> {
        self.wishlist.list(&self.catalog)
    }

    // Checkout

    pub fn checkout(&mut self) -> DomainResult<Order> {
        self.place_order(None)
    }

    /// Checkout with a promo code. An unknown code or one whose conditions
    /// are not met fails before anything changes.
    pub fn checkout_with_promo(&mut self, code: &str) -> DomainResult<Order> {
        let promo: PromoCode = code.parse()?;
        self.place_order(Some(promo))
    }

    /// Orders placed in this session, oldest first.
    pub fn order_history(&self) -> &[Order] {
        self.orders.orders()
    }

    pub fn total_spent(&self) -> Money {
        self.orders.total_spent()
    }

    pub fn stats(&self) -> StorefrontStats {
        let catalog = self.catalog.stats();
        StorefrontStats {
            product_count: catalog.product_count,
            on_sale_count: catalog.on_sale_count,
            wishlist_count: self.wishlist.len(),
            cart_item_count: self.cart.item_count(),
        }
    }

    fn place_order(&mut self, promo: Option<PromoCode>) -> DomainResult<Order> {
        let checkout = Checkout {
            catalog: &self.catalog,
            pricing: &self.config.pricing,
            clock: self.clock.as_ref(),
            order_ids: self.order_ids.as_mut(),
        };
        checkout.place(&mut self.cart, &mut self.orders, promo)
    }
}

impl core::fmt::Debug for Session {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("cart_items", &self.cart.item_count())
            .field("wishlist", &self.wishlist.len())
            .field("orders", &self.orders.len())
            .finish_non_exhaustive()
    }
}
