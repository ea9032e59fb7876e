//! `vibecart-storefront`: the session-scoped API a presentation layer calls.
//!
//! A [`Session`] owns one visitor's cart, wishlist and order history and shares
//! the read-only catalog with every other session.

pub mod config;
pub mod session;

pub use config::StoreConfig;
pub use session::{Session, StorefrontStats};

pub use vibecart_catalog::{Catalog, Category, FilterSpec, PriceRange, Product, ProductId, SortKey};
pub use vibecart_core::{DomainError, DomainResult, Money};
pub use vibecart_sales::{AddOutcome, Order, PriceQuote, PromoCode};
