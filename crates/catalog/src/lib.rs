//! Storefront catalog module.
//!
//! The catalog is loaded once, validated, and never mutated afterwards. Every
//! view over it (filters, sorting, recommendations) produces a new sequence of
//! borrowed products.

pub mod catalog;
pub mod product;
pub mod query;
pub mod recommend;

pub use catalog::{Catalog, CatalogStats};
pub use product::{Category, MAX_PRICE, Product, ProductId, ProductRecord, Rating};
pub use query::{CategoryFilter, FilterSpec, PriceRange, SortKey, query};
pub use recommend::recommendations;
