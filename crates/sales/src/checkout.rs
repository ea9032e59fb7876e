//! Checkout: turn the cart into an order, atomically.

use vibecart_catalog::Catalog;
use vibecart_core::{DomainError, DomainResult};

use crate::cart::CartLedger;
use crate::clock::Clock;
use crate::order::{Order, OrderHistory, OrderIdGenerator};
use crate::pricing::PricingConfig;
use crate::promo::PromoCode;

/// Generated ids that collide with history are retried this many times.
const MAX_ID_ATTEMPTS: usize = 8;

/// Stages of a single checkout attempt.
///
/// `Validating` and `Computing` only read state; all mutation happens in
/// `Committing`, which cannot fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutPhase {
    Validating,
    Computing,
    Committing,
    Done,
}

/// Collaborators a checkout reads from.
pub struct Checkout<'a> {
    pub catalog: &'a Catalog,
    pub pricing: &'a PricingConfig,
    pub clock: &'a dyn Clock,
    pub order_ids: &'a mut dyn OrderIdGenerator,
}

impl Checkout<'_> {
    /// Price the cart, append the order to `history`, and empty the cart.
    ///
    /// Fails with `EmptyCart` when there is nothing to buy. On any failure the
    /// cart and history are left exactly as they were.
    pub fn place(
        self,
        cart: &mut CartLedger,
        history: &mut OrderHistory,
        promo: Option<PromoCode>,
    ) -> DomainResult<Order> {
        trace_phase(CheckoutPhase::Validating);
        if cart.is_empty() {
            tracing::info!("checkout rejected: cart is empty");
            return Err(DomainError::EmptyCart);
        }

        trace_phase(CheckoutPhase::Computing);
        let subtotal = cart.subtotal(self.catalog)?;
        let quote = self.pricing.quote(subtotal, cart.item_count(), promo)?;
        let placed_at = self.clock.now();

        let mut attempts = 0;
        let order_id = loop {
            let candidate = self.order_ids.next_id(placed_at);
            if !history.contains(&candidate) {
                break candidate;
            }
            attempts += 1;
            if attempts >= MAX_ID_ATTEMPTS {
                return Err(DomainError::conflict(format!(
                    "order id {candidate} already used in this session"
                )));
            }
        };

        trace_phase(CheckoutPhase::Committing);
        let order = Order::new(order_id, placed_at, cart.snapshot(), quote);
        history.append(order.clone());
        cart.clear();

        trace_phase(CheckoutPhase::Done);
        tracing::info!(
            order_id = %order.order_id(),
            items = order.item_count(),
            total_cents = order.total().cents(),
            promo = order.promo().map(|p| p.as_str()),
            "order placed"
        );
        Ok(order)
    }
}

fn trace_phase(phase: CheckoutPhase) {
    tracing::debug!(?phase, "checkout phase");
}
