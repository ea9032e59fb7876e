//! Store configuration: pricing rules and cart limits.

use serde::{Deserialize, Serialize};

use vibecart_core::{DomainError, DomainResult, Money, parse_fixed_point};
use vibecart_sales::{CartLimits, PricingConfig};

pub const ENV_FREE_SHIPPING_THRESHOLD: &str = "VIBECART_FREE_SHIPPING_THRESHOLD";
pub const ENV_SHIPPING_FEE: &str = "VIBECART_SHIPPING_FEE";
pub const ENV_TAX_RATE: &str = "VIBECART_TAX_RATE";
pub const ENV_MAX_QTY_PER_LINE: &str = "VIBECART_MAX_QTY_PER_LINE";
pub const ENV_RECENTLY_VIEWED: &str = "VIBECART_RECENTLY_VIEWED";

/// Tax rates are accepted with up to four decimals (basis-point precision).
const RATE_DECIMALS: u32 = 4;

/// Everything a session needs to know about store policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub pricing: PricingConfig,
    pub limits: CartLimits,
}

impl StoreConfig {
    /// Defaults overridden by `VIBECART_*` environment variables.
    ///
    /// Unset variables keep their default; malformed ones are a `Validation` error.
    pub fn from_env() -> DomainResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`StoreConfig::from_env`] with an explicit variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> DomainResult<Self> {
        let mut config = Self::default();

        if let Some(v) = lookup(ENV_FREE_SHIPPING_THRESHOLD) {
            config.pricing.free_shipping_threshold = parse_money(ENV_FREE_SHIPPING_THRESHOLD, &v)?;
        }
        if let Some(v) = lookup(ENV_SHIPPING_FEE) {
            config.pricing.shipping_fee = parse_money(ENV_SHIPPING_FEE, &v)?;
        }
        if let Some(v) = lookup(ENV_TAX_RATE) {
            config.pricing.tax_rate_bps = parse_rate_bps(ENV_TAX_RATE, &v)?;
        }
        if let Some(v) = lookup(ENV_MAX_QTY_PER_LINE) {
            config.limits.max_quantity_per_line = parse_number(ENV_MAX_QTY_PER_LINE, &v)?;
            if config.limits.max_quantity_per_line == 0 {
                return Err(DomainError::validation(format!(
                    "{ENV_MAX_QTY_PER_LINE} must be at least 1"
                )));
            }
        }
        if let Some(v) = lookup(ENV_RECENTLY_VIEWED) {
            config.limits.recently_viewed_capacity = parse_number(ENV_RECENTLY_VIEWED, &v)?;
        }

        tracing::debug!(?config, "store configuration resolved");
        Ok(config)
    }

    pub fn from_json(json: &str) -> DomainResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| DomainError::validation(format!("malformed store config: {e}")))
    }
}

fn parse_money(key: &str, value: &str) -> DomainResult<Money> {
    Money::parse(value).map_err(|e| DomainError::validation(format!("{key}: {e}")))
}

fn parse_number<T: core::str::FromStr>(key: &str, value: &str) -> DomainResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| DomainError::validation(format!("{key}: expected a whole number, got {value:?}")))
}

/// `"0.08"` → 800 bps. Rates above 1.0 are rejected.
fn parse_rate_bps(key: &str, value: &str) -> DomainResult<u32> {
    parse_fixed_point(value.trim(), RATE_DECIMALS)
        .filter(|&bps| bps <= 10_000)
        .map(|bps| bps as u32)
        .ok_or_else(|| DomainError::validation(format!("{key}: expected a rate like 0.08, got {value:?}")))
}
