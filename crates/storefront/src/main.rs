use std::sync::Arc;

use anyhow::Context;

use vibecart_catalog::{Catalog, Category, FilterSpec, PriceRange, ProductId, SortKey};
use vibecart_core::Money;
use vibecart_observability::LogFormat;
use vibecart_storefront::{Session, StoreConfig};

fn main() -> anyhow::Result<()> {
    let format = std::env::var("VIBECART_LOG_FORMAT")
        .ok()
        .and_then(|v| {
            v.parse::<LogFormat>()
                .map_err(|e| eprintln!("{e}; falling back to json"))
                .ok()
        })
        .unwrap_or_default();
    vibecart_observability::init_with(format);

    let config = StoreConfig::from_env().context("invalid VIBECART_* configuration")?;
    let catalog = Arc::new(Catalog::storefront().context("failed to load storefront catalog")?);
    tracing::info!(products = catalog.len(), "catalog loaded");

    let mut session = Session::new(Arc::clone(&catalog), config);

    let budget_gadgets = FilterSpec::new()
        .with_category(Category::Electronics)
        .with_price_range(PriceRange::new(Money::ZERO, Money::from_cents(10_000))?)
        .with_sort(SortKey::PriceAscending);
    for product in session.query(&budget_gadgets) {
        tracing::info!(
            product_id = product.id_typed().get(),
            name = product.name(),
            price = %product.price(),
            "query hit"
        );
    }

    let outcome = session.cart_add(ProductId(1), 15)?;
    tracing::info!(
        requested = outcome.requested,
        line_quantity = outcome.line_quantity,
        cap = outcome.cap,
        "sneakers in cart"
    );
    session.cart_add(ProductId(3), 2)?;
    session.wishlist_toggle(ProductId(12))?;

    let progress = session.shipping_progress()?;
    tracing::info!(
        remaining = %progress.remaining,
        qualifies = progress.qualifies,
        "free shipping progress"
    );

    let order = session
        .checkout_with_promo("VIBECART20")
        .context("checkout failed")?;
    println!("{}", serde_json::to_string_pretty(&order)?);

    let stats = session.stats();
    tracing::info!(
        orders = session.order_history().len(),
        total_spent = %session.total_spent(),
        wishlist = stats.wishlist_count,
        cart_items = stats.cart_item_count,
        "session finished"
    );
    Ok(())
}
