use std::sync::Arc;

use chrono::{TimeZone, Utc};
use vibecart_catalog::{Catalog, Category, FilterSpec, PriceRange, ProductId, ProductRecord, SortKey};
use vibecart_core::{DomainError, Money};
use vibecart_sales::{FixedClock, SequentialOrderIds};
use vibecart_storefront::{Session, StoreConfig};

fn storefront_session() -> Session {
    let catalog = Arc::new(Catalog::storefront().unwrap());
    Session::new(catalog, StoreConfig::default())
}

/// Two-product catalog with a $200 free-shipping threshold.
fn checkout_scenario_session() -> Session {
    let catalog = Catalog::from_records(vec![
        ProductRecord::new(1, "Rainbow Sneakers", 89.99, Category::Footwear, 12),
        ProductRecord::new(3, "Tie-Dye T-Shirt", 45.00, Category::Clothing, 20),
    ])
    .unwrap();

    let mut config = StoreConfig::default();
    config.pricing.free_shipping_threshold = Money::from_cents(20_000);

    Session::new(Arc::new(catalog), config)
        .with_clock(FixedClock(Utc.with_ymd_and_hms(2026, 3, 14, 14, 30, 22).unwrap()))
        .with_order_ids(SequentialOrderIds::new())
}

#[test]
fn checkout_totals_match_hand_computed_receipt() {
    let mut session = checkout_scenario_session();
    session.cart_add(ProductId(1), 1).unwrap();
    session.cart_add(ProductId(3), 2).unwrap();
    assert_eq!(session.cart_subtotal().unwrap(), Money::from_cents(17_999));

    let order = session.checkout().unwrap();
    assert_eq!(order.order_id().as_str(), "ORD-0001-143022");
    assert_eq!(order.subtotal(), Money::from_cents(17_999));
    assert_eq!(order.shipping(), Money::from_cents(999));
    assert_eq!(order.tax(), Money::from_cents(1_440));
    assert_eq!(order.total(), Money::from_cents(20_438));
    assert_eq!(order.total().to_string(), "$204.38");
    assert_eq!(order.item_count(), 3);

    assert!(session.cart_lines().unwrap().is_empty());
    assert_eq!(session.order_history(), &[order]);
}

#[test]
fn over_cap_add_is_clamped_to_ten() {
    let mut session = checkout_scenario_session();

    let outcome = session.cart_add(ProductId(1), 15).unwrap();
    assert_eq!(outcome.added, 10);
    assert_eq!(outcome.cap, 10);
    assert!(outcome.clamped());
    assert_eq!(session.cart().get_quantity(ProductId(1)), 10);

    match session.cart_add(ProductId(1), 1) {
        Err(DomainError::QuantityExceeded { requested, cap, .. }) => {
            assert_eq!(requested, 1);
            assert_eq!(cap, 10);
        }
        other => panic!("Expected QuantityExceeded error, got {other:?}"),
    }
    assert_eq!(session.cart_item_count(), 10);
}

#[test]
fn electronics_under_100_sorted_by_price() {
    let session = storefront_session();
    let spec = FilterSpec::new()
        .with_category(Category::Electronics)
        .with_price_range(PriceRange::new(Money::ZERO, Money::from_cents(10_000)).unwrap())
        .with_sort(SortKey::PriceAscending);

    let hits = session.query(&spec);
    assert!(!hits.is_empty());
    assert!(hits.iter().all(|p| p.category() == Category::Electronics));
    assert!(hits.iter().all(|p| p.price() <= Money::from_cents(10_000)));
    assert!(hits.windows(2).all(|w| w[0].price() <= w[1].price()));
    assert!(hits.iter().all(|p| p.id_typed() != ProductId(2) && p.id_typed() != ProductId(4)));

    // Query never reorders the catalog itself.
    let ids: Vec<u32> = session.list_catalog().iter().map(|p| p.id_typed().get()).collect();
    assert_eq!(ids, (1..=12).collect::<Vec<_>>());
}

#[test]
fn inverted_price_range_is_an_error_not_an_empty_result() {
    match PriceRange::new(Money::from_cents(5_000), Money::from_cents(1_000)) {
        Err(DomainError::InvalidRange(_)) => {}
        other => panic!("Expected InvalidRange error, got {other:?}"),
    }

    let session = storefront_session();
    let spec = FilterSpec::new().with_search("does not exist");
    assert!(session.query(&spec).is_empty());
}

#[test]
fn empty_checkout_fails_without_touching_history() {
    let mut session = storefront_session();
    match session.checkout() {
        Err(DomainError::EmptyCart) => {}
        other => panic!("Expected EmptyCart error, got {other:?}"),
    }
    assert!(session.order_history().is_empty());
}

#[test]
fn unknown_products_are_not_found() {
    let mut session = storefront_session();
    match session.cart_add(ProductId(999), 1) {
        Err(DomainError::NotFound(_)) => {}
        other => panic!("Expected NotFound error, got {other:?}"),
    }
    match session.wishlist_toggle(ProductId(999)) {
        Err(DomainError::NotFound(_)) => {}
        other => panic!("Expected NotFound error, got {other:?}"),
    }
    assert!(!session.cart_remove(ProductId(999)));
    assert_eq!(session.cart_item_count(), 0);
}

#[test]
fn order_snapshot_is_immune_to_later_cart_changes() {
    let mut session = storefront_session();
    session.cart_add(ProductId(7), 2).unwrap();
    let order = session.checkout().unwrap();

    session.cart_add(ProductId(7), 5).unwrap();
    session.cart_add(ProductId(8), 1).unwrap();

    let stored = &session.order_history()[0];
    assert_eq!(stored.lines().len(), 1);
    assert_eq!(stored.lines()[0].quantity, 2);
    assert_eq!(stored, &order);
}

#[test]
fn order_ids_are_unique_within_a_session() {
    let mut session = storefront_session()
        .with_clock(FixedClock(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()));
    for _ in 0..5 {
        session.cart_add(ProductId(11), 1).unwrap();
        session.checkout().unwrap();
    }
    let mut ids: Vec<&str> = session
        .order_history()
        .iter()
        .map(|o| o.order_id().as_str())
        .collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 5);
}

#[test]
fn promo_checkout_records_code_and_discount() {
    let mut session = storefront_session();
    // 329.99 > 200, so COLORME50 applies.
    session.cart_add(ProductId(4), 1).unwrap();

    let order = session.checkout_with_promo("colorme50").unwrap();
    assert_eq!(order.discount(), Money::from_cents(5_000));
    assert_eq!(order.promo().map(|p| p.as_str()), Some("COLORME50"));
    assert_eq!(order.shipping(), Money::ZERO);
    // (329.99 - 50.00) x 1.08 = 302.3892
    assert_eq!(order.total(), Money::from_cents(27_999 + 2_240));
}

#[test]
fn promo_that_does_not_apply_leaves_state_unchanged() {
    let mut session = storefront_session();
    session.cart_add(ProductId(7), 1).unwrap();

    match session.checkout_with_promo("COLORME50") {
        Err(DomainError::PromoNotApplicable(_)) => {}
        other => panic!("Expected PromoNotApplicable error, got {other:?}"),
    }
    assert_eq!(session.cart_item_count(), 1);
    assert!(session.order_history().is_empty());
}

#[test]
fn wishlist_and_cart_are_independent() {
    let mut session = storefront_session();
    assert!(session.wishlist_toggle(ProductId(5)).unwrap());
    session.cart_add(ProductId(5), 1).unwrap();

    session.cart_clear();
    assert!(session.is_wishlisted(ProductId(5)));

    assert!(!session.wishlist_toggle(ProductId(5)).unwrap());
    assert!(session.wishlist().is_empty());
}

#[test]
fn recently_viewed_is_bounded_and_survives_checkout() {
    let mut session = storefront_session();
    for id in 1..=7 {
        session.cart_add(ProductId(id), 1).unwrap();
    }
    session.checkout().unwrap();

    let viewed: Vec<u32> = session
        .recently_viewed()
        .iter()
        .map(|p| p.id_typed().get())
        .collect();
    assert_eq!(viewed, vec![3, 4, 5, 6, 7]);
}

#[test]
fn custom_limits_flow_through_to_the_cart() {
    let config = StoreConfig::from_lookup(|key| match key {
        "VIBECART_MAX_QTY_PER_LINE" => Some("3".to_string()),
        "VIBECART_RECENTLY_VIEWED" => Some("2".to_string()),
        _ => None,
    })
    .unwrap();
    let catalog = Arc::new(Catalog::storefront().unwrap());
    let mut session = Session::new(Arc::clone(&catalog), config);

    assert_eq!(session.config(), &config);
    assert!(std::ptr::eq(session.catalog(), &*catalog));
    assert_eq!(session.cart().limits(), config.limits);
    assert_eq!(session.cart().recently_viewed().capacity(), 2);

    assert_eq!(session.cart_add(ProductId(3), 8).unwrap().line_quantity, 3);
    session.cart_add(ProductId(5), 1).unwrap();
    session.cart_add(ProductId(7), 1).unwrap();
    assert_eq!(session.recently_viewed().len(), 2);
}

#[test]
fn catalogs_with_unpriceable_products_are_rejected_at_load() {
    let result = Catalog::from_records(vec![ProductRecord::new(
        1,
        "Diamond Sneakers",
        1.0e15,
        Category::Footwear,
        12,
    )]);
    match result {
        Err(DomainError::Validation(msg)) => assert!(msg.contains("limit"), "{msg}"),
        other => panic!("Expected Validation error, got {other:?}"),
    }
}

#[test]
fn sessions_sharing_a_catalog_are_isolated() {
    let catalog = Arc::new(Catalog::storefront().unwrap());

    let totals: Vec<(u32, usize)> = std::thread::scope(|scope| {
        let handles: Vec<_> = (1..=4u32)
            .map(|n| {
                let catalog = Arc::clone(&catalog);
                scope.spawn(move || {
                    let mut session = Session::new(catalog, StoreConfig::default());
                    session.cart_add(ProductId(n), n).unwrap();
                    session.wishlist_toggle(ProductId(n)).unwrap();
                    if n % 2 == 0 {
                        session.checkout().unwrap();
                    }
                    (session.cart_item_count(), session.order_history().len())
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(totals, vec![(1, 0), (0, 1), (3, 0), (0, 1)]);
    assert_eq!(Arc::strong_count(&catalog), 1);
}

mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Op {
        Add(u32, u32),
        Remove(u32),
        Set(u32, u32),
        Toggle(u32),
        Clear,
        Checkout,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => (1..=13u32, 1..=12u32).prop_map(|(id, q)| Op::Add(id, q)),
            2 => (1..=13u32).prop_map(Op::Remove),
            1 => (1..=13u32, 0..=12u32).prop_map(|(id, q)| Op::Set(id, q)),
            1 => (1..=13u32).prop_map(Op::Toggle),
            1 => Just(Op::Clear),
            1 => Just(Op::Checkout),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 64,
            ..ProptestConfig::default()
        })]

        #[test]
        fn session_invariants_hold_for_any_action_sequence(ops in prop::collection::vec(op(), 0..40)) {
            let mut session = storefront_session();

            for op in ops {
                let orders_before = session.order_history().len();
                let cart_before = session.cart_item_count();

                match op {
                    Op::Add(id, q) => { let _ = session.cart_add(ProductId(id), q); }
                    Op::Remove(id) => { session.cart_remove(ProductId(id)); }
                    Op::Set(id, q) => { let _ = session.cart_set_quantity(ProductId(id), q); }
                    Op::Toggle(id) => { let _ = session.wishlist_toggle(ProductId(id)); }
                    Op::Clear => session.cart_clear(),
                    Op::Checkout => match session.checkout() {
                        Ok(order) => {
                            prop_assert_eq!(order.item_count(), cart_before);
                            prop_assert_eq!(session.order_history().len(), orders_before + 1);
                            prop_assert!(session.cart_lines().unwrap().is_empty());
                        }
                        Err(DomainError::EmptyCart) => {
                            prop_assert_eq!(cart_before, 0);
                            prop_assert_eq!(session.order_history().len(), orders_before);
                        }
                        Err(other) => prop_assert!(false, "unexpected checkout error: {other:?}"),
                    },
                }

                let lines = session.cart_lines().unwrap();
                let count: u32 = lines.iter().map(|(_, q)| q).sum();
                prop_assert_eq!(session.cart_item_count(), count);

                let expected: Money = lines.iter().map(|(p, q)| p.price().times(*q)).sum();
                prop_assert_eq!(session.cart_subtotal().unwrap(), expected);

                for (product, quantity) in lines {
                    prop_assert!(quantity >= 1);
                    prop_assert!(quantity <= 10u32.min(product.stock()));
                }
            }
        }

        #[test]
        fn wishlist_toggle_twice_restores_membership(id in 1..=12u32, pre_toggle in any::<bool>()) {
            let mut session = storefront_session();
            if pre_toggle {
                session.wishlist_toggle(ProductId(id)).unwrap();
            }
            let before = session.is_wishlisted(ProductId(id));

            session.wishlist_toggle(ProductId(id)).unwrap();
            session.wishlist_toggle(ProductId(id)).unwrap();
            prop_assert_eq!(session.is_wishlisted(ProductId(id)), before);
        }

        #[test]
        fn query_is_idempotent_through_the_session(
            search in "[a-zA-Z ]{0,4}",
            sort in prop_oneof![
                Just(SortKey::Relevance),
                Just(SortKey::PriceAscending),
                Just(SortKey::PriceDescending),
                Just(SortKey::RatingDescending),
                Just(SortKey::Newest),
            ],
        ) {
            let session = storefront_session();
            let spec = FilterSpec::new().with_search(search).with_sort(sort);

            let once = session.query(&spec);
            let twice = vibecart_catalog::query(once.iter().copied(), &spec);
            prop_assert_eq!(once, twice);
        }
    }
}
