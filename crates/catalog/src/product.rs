//! Product records: the fixed-shape rows of the catalog.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use vibecart_core::{DomainError, DomainResult, Entity, Money};

/// Product identifier (unique positive integer within a catalog).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u32);

impl ProductId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "product {}", self.0)
    }
}

/// The fixed set of storefront categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Footwear,
    Electronics,
    Clothing,
    Accessories,
    Fitness,
    Home,
    Beauty,
    Art,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Footwear,
        Category::Electronics,
        Category::Clothing,
        Category::Accessories,
        Category::Fitness,
        Category::Home,
        Category::Beauty,
        Category::Art,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Footwear => "Footwear",
            Category::Electronics => "Electronics",
            Category::Clothing => "Clothing",
            Category::Accessories => "Accessories",
            Category::Fitness => "Fitness",
            Category::Home => "Home",
            Category::Beauty => "Beauty",
            Category::Art => "Art",
        }
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| DomainError::validation(format!("unknown category: {s:?}")))
    }
}

/// Star rating stored in tenths (`47` is 4.7 stars).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    pub const MAX: Rating = Rating(50);

    pub fn from_tenths(tenths: u8) -> DomainResult<Self> {
        if tenths > Self::MAX.0 {
            return Err(DomainError::validation(format!(
                "rating must be within 0.0-5.0, got {}.{}",
                tenths / 10,
                tenths % 10
            )));
        }
        Ok(Self(tenths))
    }

    pub fn from_stars(stars: f64) -> DomainResult<Self> {
        if !stars.is_finite() || !(0.0..=5.0).contains(&stars) {
            return Err(DomainError::validation(format!(
                "rating must be within 0.0-5.0, got {stars}"
            )));
        }
        Ok(Self((stars * 10.0).round() as u8))
    }

    pub fn tenths(self) -> u8 {
        self.0
    }
}

impl core::fmt::Display for Rating {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{}", self.0 / 10, self.0 % 10)
    }
}

/// A validated catalog product. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    id: ProductId,
    name: String,
    price: Money,
    category: Category,
    emoji: String,
    description: String,
    rating: Rating,
    stock: u32,
    /// Present iff the product is on sale; always above `price`.
    original_price: Option<Money>,
    tags: Vec<String>,
}

impl Product {
    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn emoji(&self) -> &str {
        &self.emoji
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn rating(&self) -> Rating {
        self.rating
    }

    pub fn stock(&self) -> u32 {
        self.stock
    }

    pub fn original_price(&self) -> Option<Money> {
        self.original_price
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn on_sale(&self) -> bool {
        self.original_price.is_some()
    }

    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Whole percent saved against the original price (truncated).
    pub fn discount_percent(&self) -> Option<u32> {
        let original = self.original_price?;
        let saved = original.cents() - self.price.cents();
        Some((saved * 100 / original.cents()) as u32)
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Highest unit or original price a catalog record may carry ($1,000,000.00).
pub const MAX_PRICE: Money = Money::from_cents(100_000_000);

/// Raw, loosely-checked product definition as written in a catalog file.
///
/// Turned into a [`Product`] by [`ProductRecord::validate`]; nothing downstream
/// ever sees an unvalidated record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductRecord {
    pub id: u32,
    pub name: String,
    pub price: f64,
    pub category: Category,
    #[serde(default)]
    pub emoji: String,
    #[serde(default)]
    pub description: String,
    pub rating: f64,
    pub stock: u32,
    #[serde(default)]
    pub on_sale: bool,
    #[serde(default)]
    pub original_price: Option<f64>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ProductRecord {
    /// Minimal record (not on sale, no rating, no decoration).
    pub fn new(id: u32, name: impl Into<String>, price: f64, category: Category, stock: u32) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            category,
            emoji: String::new(),
            description: String::new(),
            rating: 0.0,
            stock,
            on_sale: false,
            original_price: None,
            tags: Vec::new(),
        }
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = rating;
        self
    }

    pub fn with_sale(mut self, original_price: f64) -> Self {
        self.on_sale = true;
        self.original_price = Some(original_price);
        self
    }

    pub fn validate(self) -> DomainResult<Product> {
        let id = self.id;
        let invalid = |msg: String| DomainError::validation(format!("product {id}: {msg}"));

        if id == 0 {
            return Err(invalid("id must be a positive integer".into()));
        }
        let name = self.name.trim();
        if name.is_empty() {
            return Err(invalid("name cannot be empty".into()));
        }

        let price = Money::from_decimal(self.price).map_err(|e| invalid(e.to_string()))?;
        if price > MAX_PRICE {
            return Err(invalid(format!("price {price} is above the {MAX_PRICE} limit")));
        }
        let rating = Rating::from_stars(self.rating).map_err(|e| invalid(e.to_string()))?;

        let original_price = match (self.on_sale, self.original_price) {
            (true, Some(original)) => {
                let original = Money::from_decimal(original).map_err(|e| invalid(e.to_string()))?;
                if original > MAX_PRICE {
                    return Err(invalid(format!(
                        "original price {original} is above the {MAX_PRICE} limit"
                    )));
                }
                if original <= price {
                    return Err(invalid(format!(
                        "original price {original} must exceed sale price {price}"
                    )));
                }
                Some(original)
            }
            (true, None) => return Err(invalid("on-sale product needs an original price".into())),
            (false, Some(_)) => {
                return Err(invalid("original price given for a product not on sale".into()));
            }
            (false, None) => None,
        };

        Ok(Product {
            id: ProductId(id),
            name: name.to_string(),
            price,
            category: self.category,
            emoji: self.emoji,
            description: self.description,
            rating,
            stock: self.stock,
            original_price,
            tags: self.tags,
        })
    }
}
