//! Order pricing: shipping threshold, tax, promo discounts.

use serde::{Deserialize, Serialize};

use vibecart_core::{DomainResult, Money, ValueObject};

use crate::promo::PromoCode;

/// Overridable pricing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Subtotals at or above this ship free.
    pub free_shipping_threshold: Money,
    pub shipping_fee: Money,
    /// Tax rate in basis points (800 = 8%).
    pub tax_rate_bps: u32,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            free_shipping_threshold: Money::from_cents(10_000),
            shipping_fee: Money::from_cents(999),
            tax_rate_bps: 800,
        }
    }
}

/// Fully priced order summary.
///
/// `total = subtotal - discount + shipping + tax`, each term in exact cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub subtotal: Money,
    pub discount: Money,
    pub promo: Option<PromoCode>,
    pub shipping: Money,
    pub tax: Money,
    pub total: Money,
    pub item_count: u32,
}

impl ValueObject for PriceQuote {}

impl PriceQuote {
    pub fn ships_free(&self) -> bool {
        self.shipping.is_zero()
    }
}

/// Free-shipping meter shown next to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShippingProgress {
    /// Amount still needed for free shipping (zero once qualified).
    pub remaining: Money,
    /// Progress toward the threshold in basis points, capped at 10_000.
    pub progress_bps: u32,
    pub qualifies: bool,
}

impl PricingConfig {
    pub fn shipping_for(&self, subtotal: Money) -> Money {
        if subtotal >= self.free_shipping_threshold {
            Money::ZERO
        } else {
            self.shipping_fee
        }
    }

    /// Tax on `subtotal`, rounded half-up to the cent.
    pub fn tax_for(&self, subtotal: Money) -> Money {
        subtotal.scale_bps(self.tax_rate_bps)
    }

    /// Price a cart subtotal, optionally with a promo code.
    ///
    /// The discount comes off first; the shipping threshold and tax are then
    /// evaluated on the discounted amount.
    pub fn quote(
        &self,
        subtotal: Money,
        item_count: u32,
        promo: Option<PromoCode>,
    ) -> DomainResult<PriceQuote> {
        let discount = match promo {
            Some(code) => code.discount_on(subtotal)?.min(subtotal),
            None => Money::ZERO,
        };
        let taxable = subtotal.saturating_sub(discount);
        let shipping = self.shipping_for(taxable);
        let tax = self.tax_for(taxable);

        Ok(PriceQuote {
            subtotal,
            discount,
            promo,
            shipping,
            tax,
            total: taxable + shipping + tax,
            item_count,
        })
    }

    pub fn shipping_progress(&self, subtotal: Money) -> ShippingProgress {
        let qualifies = subtotal >= self.free_shipping_threshold;
        ShippingProgress {
            remaining: self.free_shipping_threshold.saturating_sub(subtotal),
            progress_bps: subtotal.ratio_bps(self.free_shipping_threshold),
            qualifies,
        }
    }
}
