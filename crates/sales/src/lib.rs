//! Session-scoped sales state: cart ledger, wishlist, pricing, orders.
//!
//! Everything here is deterministic in-memory domain logic. Time and order
//! identifiers come in through the [`Clock`] and [`OrderIdGenerator`] seams.

pub mod cart;
pub mod checkout;
pub mod clock;
pub mod order;
pub mod pricing;
pub mod promo;
pub mod recent;
pub mod wishlist;

pub use cart::{AddOutcome, CartLedger, CartLimits, CartLine};
pub use checkout::{Checkout, CheckoutPhase};
pub use clock::{Clock, FixedClock, SystemClock};
pub use order::{Order, OrderHistory, OrderId, OrderIdGenerator, SequentialOrderIds};
pub use pricing::{PriceQuote, PricingConfig, ShippingProgress};
pub use promo::PromoCode;
pub use recent::RecentlyViewed;
pub use wishlist::WishlistSet;
