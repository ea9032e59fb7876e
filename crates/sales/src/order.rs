//! Finalized orders and the session's append-only order history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vibecart_core::{AggregateRoot, Entity, Money, SessionId};

use crate::cart::CartLine;
use crate::pricing::PriceQuote;
use crate::promo::PromoCode;

/// Human-readable order identifier, unique within a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for OrderId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of order identifiers.
pub trait OrderIdGenerator: Send {
    fn next_id(&mut self, placed_at: DateTime<Utc>) -> OrderId;
}

/// `ORD-<sequence>-<HHMMSS>`, e.g. `ORD-0001-143022`.
///
/// The sequence alone keeps ids unique within a session; the time suffix is for
/// humans reading receipts.
#[derive(Debug, Clone)]
pub struct SequentialOrderIds {
    next: u32,
}

impl SequentialOrderIds {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(next: u32) -> Self {
        Self { next }
    }
}

impl Default for SequentialOrderIds {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderIdGenerator for SequentialOrderIds {
    fn next_id(&mut self, placed_at: DateTime<Utc>) -> OrderId {
        let seq = self.next;
        self.next = self.next.wrapping_add(1);
        OrderId(format!("ORD-{seq:04}-{}", placed_at.format("%H%M%S")))
    }
}

/// An immutable record of a completed checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    placed_at: DateTime<Utc>,
    lines: Vec<CartLine>,
    subtotal: Money,
    discount: Money,
    promo: Option<PromoCode>,
    shipping: Money,
    tax: Money,
    total: Money,
    item_count: u32,
}

impl Order {
    pub(crate) fn new(
        id: OrderId,
        placed_at: DateTime<Utc>,
        lines: Vec<CartLine>,
        quote: PriceQuote,
    ) -> Self {
        Self {
            id,
            placed_at,
            lines,
            subtotal: quote.subtotal,
            discount: quote.discount,
            promo: quote.promo,
            shipping: quote.shipping,
            tax: quote.tax,
            total: quote.total,
            item_count: quote.item_count,
        }
    }

    pub fn order_id(&self) -> &OrderId {
        &self.id
    }

    pub fn placed_at(&self) -> DateTime<Utc> {
        self.placed_at
    }

    /// Cart lines as they were at checkout.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn subtotal(&self) -> Money {
        self.subtotal
    }

    pub fn discount(&self) -> Money {
        self.discount
    }

    pub fn promo(&self) -> Option<PromoCode> {
        self.promo
    }

    pub fn shipping(&self) -> Money {
        self.shipping
    }

    pub fn tax(&self) -> Money {
        self.tax
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn item_count(&self) -> u32 {
        self.item_count
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Aggregate root: chronological, append-only list of the session's orders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderHistory {
    id: SessionId,
    orders: Vec<Order>,
}

impl OrderHistory {
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            orders: Vec::new(),
        }
    }

    /// Oldest first.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn get(&self, id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| o.is(id))
    }

    pub fn contains(&self, id: &OrderId) -> bool {
        self.get(id).is_some()
    }

    pub fn last(&self) -> Option<&Order> {
        self.orders.last()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Lifetime spend across all orders.
    pub fn total_spent(&self) -> Money {
        self.orders.iter().map(|o| o.total).sum()
    }

    /// Only checkout appends, after it has made sure the id is unused.
    pub(crate) fn append(&mut self, order: Order) {
        self.orders.push(order);
    }
}

impl AggregateRoot for OrderHistory {
    type Id = SessionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.orders.len() as u64
    }
}
