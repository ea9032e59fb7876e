//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant is recoverable by the caller: the session stays usable and no
/// partially-applied mutation is left behind.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A referenced product (or other record) does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A cart line would exceed its per-line cap.
    ///
    /// `requested` is the quantity the caller passed: the increment for an
    /// add, the new line quantity for an explicit set.
    #[error("quantity exceeded for {product}: requested {requested}, cap {cap}")]
    QuantityExceeded {
        product: String,
        requested: u32,
        cap: u32,
    },

    /// The product has no stock left to put in a cart.
    #[error("out of stock: {0}")]
    OutOfStock(String),

    /// Checkout was attempted with no cart lines.
    #[error("cart is empty")]
    EmptyCart,

    /// A range filter was malformed (e.g. low bound above high bound).
    #[error("invalid range: {0}")]
    InvalidRange(String),

    /// A value failed validation (malformed catalog record, bad config value).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A uniqueness rule was violated (e.g. a generated order id was already used).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The promo code is not one the store recognises.
    #[error("invalid promo code: {0}")]
    InvalidPromoCode(String),

    /// The promo code exists but the order does not qualify for it.
    #[error("promo code not applicable: {0}")]
    PromoNotApplicable(String),
}

impl DomainError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn quantity_exceeded(product: impl Into<String>, requested: u32, cap: u32) -> Self {
        Self::QuantityExceeded {
            product: product.into(),
            requested,
            cap,
        }
    }

    pub fn out_of_stock(product: impl Into<String>) -> Self {
        Self::OutOfStock(product.into())
    }

    pub fn invalid_range(msg: impl Into<String>) -> Self {
        Self::InvalidRange(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn invalid_promo(code: impl Into<String>) -> Self {
        Self::InvalidPromoCode(code.into())
    }

    pub fn promo_not_applicable(msg: impl Into<String>) -> Self {
        Self::PromoNotApplicable(msg.into())
    }
}
