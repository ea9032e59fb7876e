//! Query engine: combined search/category/price filters plus a sort key.
//!
//! Filters run in a fixed order (category, price range, search) and the sort is
//! always applied last. Sorting is stable, so ties keep the input order.

use core::cmp::Ordering;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use vibecart_core::{DomainError, DomainResult, Money, ValueObject};

use crate::product::{Category, Product};

/// Category selector: everything, or exactly one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(self, product: &Product) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => product.category() == category,
        }
    }
}

/// Inclusive price bounds. `low <= high` is guaranteed by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPriceRange")]
pub struct PriceRange {
    low: Money,
    high: Money,
}

#[derive(Deserialize)]
struct RawPriceRange {
    low: Money,
    high: Money,
}

impl TryFrom<RawPriceRange> for PriceRange {
    type Error = DomainError;

    fn try_from(raw: RawPriceRange) -> Result<Self, Self::Error> {
        PriceRange::new(raw.low, raw.high)
    }
}

impl PriceRange {
    pub fn new(low: Money, high: Money) -> DomainResult<Self> {
        if low > high {
            return Err(DomainError::invalid_range(format!(
                "price range low {low} is above high {high}"
            )));
        }
        Ok(Self { low, high })
    }

    /// A range that admits every price.
    pub fn any() -> Self {
        Self {
            low: Money::ZERO,
            high: Money::from_cents(u64::MAX),
        }
    }

    pub fn low(&self) -> Money {
        self.low
    }

    pub fn high(&self) -> Money {
        self.high
    }

    pub fn contains(&self, price: Money) -> bool {
        self.low <= price && price <= self.high
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self::any()
    }
}

/// Result ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    /// Catalog declaration order.
    #[default]
    #[serde(rename = "relevance")]
    Relevance,
    #[serde(rename = "price_asc")]
    PriceAscending,
    #[serde(rename = "price_desc")]
    PriceDescending,
    /// Highest rated first; equal ratings by ascending id.
    #[serde(rename = "rating")]
    RatingDescending,
    /// Highest id first.
    #[serde(rename = "newest")]
    Newest,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Relevance => "relevance",
            SortKey::PriceAscending => "price_asc",
            SortKey::PriceDescending => "price_desc",
            SortKey::RatingDescending => "rating",
            SortKey::Newest => "newest",
        }
    }

    fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortKey::Relevance => Ordering::Equal,
            SortKey::PriceAscending => a.price().cmp(&b.price()),
            SortKey::PriceDescending => b.price().cmp(&a.price()),
            SortKey::RatingDescending => b
                .rating()
                .cmp(&a.rating())
                .then_with(|| a.id_typed().cmp(&b.id_typed())),
            SortKey::Newest => b.id_typed().cmp(&a.id_typed()),
        }
    }
}

impl FromStr for SortKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "relevance" | "default" => Ok(SortKey::Relevance),
            "price_asc" => Ok(SortKey::PriceAscending),
            "price_desc" => Ok(SortKey::PriceDescending),
            "rating" => Ok(SortKey::RatingDescending),
            "newest" => Ok(SortKey::Newest),
            other => Err(DomainError::validation(format!("unknown sort key: {other:?}"))),
        }
    }
}

/// Combined view criteria. Transient; never stored by the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSpec {
    /// Case-insensitive substring of the product name. Blank matches all.
    pub search: String,
    pub category: CategoryFilter,
    pub price_range: PriceRange,
    pub sort: SortKey,
}

impl ValueObject for FilterSpec {}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = CategoryFilter::Only(category);
        self
    }

    pub fn with_price_range(mut self, range: PriceRange) -> Self {
        self.price_range = range;
        self
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }
}

/// Filter then sort `products`, returning a new sequence.
///
/// Pure: the input is only read. An empty result is a valid answer.
pub fn query<'a, I>(products: I, spec: &FilterSpec) -> Vec<&'a Product>
where
    I: IntoIterator<Item = &'a Product>,
{
    let needle = spec.search.trim().to_lowercase();

    let mut view: Vec<&Product> = products
        .into_iter()
        .filter(|p| spec.category.matches(p))
        .filter(|p| spec.price_range.contains(p.price()))
        .filter(|p| needle.is_empty() || p.name().to_lowercase().contains(&needle))
        .collect();

    view.sort_by(|a, b| spec.sort.compare(a, b));
    view
}
