//! Storefront promo codes.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use vibecart_core::{DomainError, DomainResult, Money};

const COLORME50_MINIMUM: Money = Money::from_cents(20_000);
const COLORME50_DISCOUNT: Money = Money::from_cents(5_000);

/// A recognised promo code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PromoCode {
    /// 20% off the whole order.
    #[serde(rename = "VIBECART20")]
    VibeCart20,
    /// $50 off orders over $200.
    #[serde(rename = "COLORME50")]
    ColorMe50,
    /// 10% off the whole order.
    #[serde(rename = "RAINBOW10")]
    Rainbow10,
}

impl PromoCode {
    pub const ALL: [PromoCode; 3] = [PromoCode::VibeCart20, PromoCode::ColorMe50, PromoCode::Rainbow10];

    pub fn as_str(self) -> &'static str {
        match self {
            PromoCode::VibeCart20 => "VIBECART20",
            PromoCode::ColorMe50 => "COLORME50",
            PromoCode::Rainbow10 => "RAINBOW10",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            PromoCode::VibeCart20 => "20% off all orders",
            PromoCode::ColorMe50 => "$50 off orders over $200",
            PromoCode::Rainbow10 => "10% off all orders",
        }
    }

    /// Discount this code grants on `subtotal`.
    ///
    /// Fails with `PromoNotApplicable` when the order does not qualify.
    pub fn discount_on(self, subtotal: Money) -> DomainResult<Money> {
        match self {
            PromoCode::VibeCart20 => Ok(subtotal.scale_bps(2_000)),
            PromoCode::Rainbow10 => Ok(subtotal.scale_bps(1_000)),
            PromoCode::ColorMe50 if subtotal > COLORME50_MINIMUM => Ok(COLORME50_DISCOUNT),
            PromoCode::ColorMe50 => Err(DomainError::promo_not_applicable(format!(
                "{} needs a subtotal over {COLORME50_MINIMUM}, got {subtotal}",
                self.as_str()
            ))),
        }
    }
}

impl core::fmt::Display for PromoCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PromoCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        PromoCode::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(code))
            .ok_or_else(|| DomainError::invalid_promo(code))
    }
}
