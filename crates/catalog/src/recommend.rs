//! "Recommended for you" picks, driven by recently viewed products.

use vibecart_core::Entity;

use crate::catalog::Catalog;
use crate::product::{Product, ProductId};

/// Same-category picks taken per viewed product.
const PER_VIEWED: usize = 2;
/// Fallback picks when nothing has been viewed.
const FALLBACK_COUNT: usize = 4;
const FALLBACK_MIN_RATING: u8 = 47;
const MAX_RECOMMENDATIONS: usize = 8;

/// Recommend products for a visitor who recently viewed `viewed`.
///
/// For each viewed id (in the given order) up to two other products of the same
/// category are picked, in catalog order, without repeats. With no usable
/// history the first four products rated 4.7 or better are returned instead.
pub fn recommendations<'a>(catalog: &'a Catalog, viewed: &[ProductId]) -> Vec<&'a Product> {
    let mut picks: Vec<&Product> = Vec::new();

    for &id in viewed {
        let Some(seen) = catalog.get(id) else {
            continue;
        };
        let same_category = catalog
            .products()
            .iter()
            .filter(|p| p.category() == seen.category() && !p.is(&id))
            .take(PER_VIEWED);
        for product in same_category {
            if !picks.iter().any(|p| p.id_typed() == product.id_typed()) {
                picks.push(product);
            }
        }
    }

    if picks.is_empty() {
        picks = catalog
            .products()
            .iter()
            .filter(|p| p.rating().tenths() >= FALLBACK_MIN_RATING)
            .take(FALLBACK_COUNT)
            .collect();
    }

    picks.truncate(MAX_RECOMMENDATIONS);
    picks
}
