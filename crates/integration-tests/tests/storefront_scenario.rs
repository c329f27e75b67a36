//! The menu-to-cart walkthrough: queries, locale fallback, age gate.

use rust_decimal_macros::dec;
use supra_catalog::{AddOutcome, Cart, CatalogQuery, SortDirection, SortField};
use supra_core::{CategoryId, Locale, Price, SubcategoryId};
use supra_integration_tests::TestContext;

#[tokio::test]
async fn unknown_subcategory_yields_an_empty_default_page() {
    let ctx = TestContext::new().await;
    let store = ctx.store();
    store.initialize().await.expect("initialize");

    let page = store
        .items_by_subcategory(Some(&SubcategoryId::new("s-nothing")), &CatalogQuery::default())
        .expect("valid query");

    assert!(page.items.is_empty());
    assert_eq!(page.pagination.current_page, 1);
    assert_eq!(page.pagination.per_page, 12);
    assert_eq!(page.pagination.total_items, 0);
    assert_eq!(page.pagination.total_pages, 0);
}

#[tokio::test]
async fn listing_composes_filter_search_sort_paginate() {
    let ctx = TestContext::new().await;
    let store = ctx.store();
    store.initialize().await.expect("initialize");

    // Both baked items, cheapest first.
    let page = store
        .items_by_subcategory(
            Some(&SubcategoryId::new("s-baked")),
            &CatalogQuery {
                sort_field: Some(SortField::Price),
                ..CatalogQuery::default()
            },
        )
        .expect("valid query");
    let slugs: Vec<&str> = page.items.iter().map(|i| i.slug.as_str()).collect();
    assert_eq!(slugs, vec!["juustukook", "khachapuri"]);

    // Search narrows within the filter.
    let page = store
        .items_by_subcategory(
            Some(&SubcategoryId::new("s-baked")),
            &CatalogQuery {
                search_term: "khach".to_string(),
                ..CatalogQuery::default()
            },
        )
        .expect("valid query");
    assert_eq!(page.pagination.total_items, 1);

    // Descending name sort.
    let page = store
        .items_by_subcategory(
            Some(&SubcategoryId::new("s-baked")),
            &CatalogQuery {
                sort_field: Some(SortField::Name),
                sort_direction: SortDirection::Desc,
                locale: Locale::Et,
                ..CatalogQuery::default()
            },
        )
        .expect("valid query");
    let slugs: Vec<&str> = page.items.iter().map(|i| i.slug.as_str()).collect();
    assert_eq!(slugs, vec!["khachapuri", "juustukook"]);
}

#[tokio::test]
async fn search_falls_back_to_english_but_not_further() {
    let ctx = TestContext::new().await;
    let store = ctx.store();
    store.initialize().await.expect("initialize");

    // title.ru is absent; the English title matches under ru.
    let hits = store.search_in_subcategory(Some(&SubcategoryId::new("s-baked")), "khach", Locale::Ru);
    assert_eq!(hits.len(), 1);

    // Juustukook is titled only in Estonian: no match under ru, match under et.
    let hits =
        store.search_in_subcategory(Some(&SubcategoryId::new("s-baked")), "juustu", Locale::Ru);
    assert!(hits.is_empty());
    let hits =
        store.search_in_subcategory(Some(&SubcategoryId::new("s-baked")), "juustu", Locale::Et);
    assert_eq!(hits.len(), 1);
}

#[tokio::test]
async fn subcategory_parent_is_last_write_wins() {
    // "s-baked" is embedded on two products; the dessert item is scanned
    // later and its parentCategory wins.
    let ctx = TestContext::new().await;
    let store = ctx.store();
    store.initialize().await.expect("initialize");

    let subs = store.subcategories();
    let baked = subs.iter().find(|s| s.slug == "baked").expect("baked sub");
    assert_eq!(baked.parent_category, Some(CategoryId::new("c-desserts")));
    assert_eq!(
        subs.iter().filter(|s| s.slug == "baked").count(),
        1,
        "duplicate ids must collapse to one entry"
    );
}

#[tokio::test]
async fn alcoholic_beverage_passes_the_age_gate_into_the_cart() {
    let ctx = TestContext::new().await;
    let store = ctx.store();
    store.initialize().await.expect("initialize");

    let saperavi = store.item_by_slug("saperavi").expect("wine by slug");
    let mut cart = Cart::open(store.snapshots());

    assert_eq!(cart.add(&saperavi), AddOutcome::AgeGateRequired);
    assert!(cart.lines().is_empty());

    assert!(cart.confirm_age());
    let line = cart.lines().first().expect("one line");
    assert_eq!(line.quantity, 1);
    assert_eq!(line.original_price, Some(Price::new(dec!(20))));
    assert_eq!(line.price, Price::new(dec!(19.4)));
}

#[tokio::test]
async fn checkout_submits_discounted_prices_only() {
    let ctx = TestContext::new().await;
    let store = ctx.store();
    store.initialize().await.expect("initialize");

    let khachapuri = store.item_by_slug("khachapuri").expect("item");
    let mut cart = Cart::open(store.snapshots());
    cart.add(&khachapuri);

    let lines = cart.checkout_lines(Locale::Ru);
    let line = lines.first().expect("one line");
    assert_eq!(line.name, "Хачапури");
    assert_eq!(line.price, Price::new(dec!(9.7)));
    assert_eq!(line.quantity, 1);
    assert_eq!(line.images, vec!["khachapuri.jpg".to_string()]);
}
