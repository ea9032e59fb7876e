//! Money in the smallest currency unit.

use core::iter::Sum;
use core::ops::Add;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Basis points in one whole (100%).
pub const BPS_SCALE: u64 = 10_000;

/// Non-negative amount in cents.
///
/// All storefront arithmetic is done on integer cents so line totals and
/// subtotals are exact; the only rounding step is [`Money::scale_bps`].
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl ValueObject for Money {}

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    pub const fn cents(self) -> u64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Convert a decimal amount (as found in catalog definitions) to cents,
    /// rounding to the nearest cent.
    pub fn from_decimal(amount: f64) -> DomainResult<Self> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(DomainError::validation(format!(
                "amount must be a non-negative finite number, got {amount}"
            )));
        }
        let cents = (amount * 100.0).round();
        if cents > u64::MAX as f64 {
            return Err(DomainError::validation(format!("amount {amount} is too large")));
        }
        Ok(Self(cents as u64))
    }

    /// Parse `"12"`, `"12.3"` or `"12.34"` into cents.
    pub fn parse(s: &str) -> DomainResult<Self> {
        let s = s.trim().trim_start_matches('$');
        parse_fixed_point(s, 2)
            .map(Self)
            .ok_or_else(|| DomainError::validation(format!("invalid amount: {s:?}")))
    }

    /// Amount multiplied by a quantity. Saturates at `u64::MAX` cents.
    pub const fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(quantity as u64))
    }

    pub const fn saturating_sub(self, other: Money) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// `self × bps / 10_000`, rounded half-up to the cent.
    ///
    /// Computed in 128 bits; results beyond `u64::MAX` cents saturate.
    pub const fn scale_bps(self, bps: u32) -> Self {
        let scaled = (self.0 as u128 * bps as u128 + (BPS_SCALE / 2) as u128) / BPS_SCALE as u128;
        if scaled > u64::MAX as u128 {
            Self(u64::MAX)
        } else {
            Self(scaled as u64)
        }
    }

    /// Ratio `self / whole` in basis points, capped at 100%.
    pub fn ratio_bps(self, whole: Money) -> u32 {
        if whole.is_zero() {
            return BPS_SCALE as u32;
        }
        let bps = self.0.saturating_mul(BPS_SCALE) / whole.0;
        bps.min(BPS_SCALE) as u32
    }
}

impl Add for Money {
    type Output = Money;

    /// Saturating; no storefront total gets anywhere near `u64::MAX` cents.
    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

/// Parse an unsigned decimal with at most `decimals` fraction digits into an
/// integer scaled by `10^decimals` (`"0.08"` at 4 decimals is `800`).
///
/// Returns `None` for anything that is not plain digits with an optional single
/// `.`, for too many fraction digits, and on overflow.
pub fn parse_fixed_point(s: &str, decimals: u32) -> Option<u64> {
    let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
    if whole.is_empty() || frac.len() > decimals as usize {
        return None;
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let scale = 10u64.checked_pow(decimals)?;
    let whole: u64 = whole.parse().ok()?;
    let frac_value: u64 = if frac.is_empty() { 0 } else { frac.parse().ok()? };
    let frac_scaled = frac_value.checked_mul(10u64.checked_pow(decimals - frac.len() as u32)?)?;

    whole.checked_mul(scale)?.checked_add(frac_scaled)
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "${}.{:02}", self.0 / 100, self.0 % 100)
    }
}
