//! Fetch lifecycle: idempotence, single-flight, and failure handling.

use chrono::Duration;
use supra_catalog::CatalogError;
use supra_integration_tests::TestContext;

#[tokio::test]
async fn idempotent_fetch_hits_network_once() {
    let ctx = TestContext::new().await;
    let store = ctx.store();

    let first = store.fetch_all(false).await.expect("first fetch");
    assert_eq!(ctx.mock.hits(), 1);

    let second = store.fetch_all(false).await.expect("cached fetch");
    assert_eq!(ctx.mock.hits(), 1, "second unforced fetch must not hit the network");
    assert_eq!(first, second, "both calls must return structurally identical data");
}

#[tokio::test]
async fn concurrent_initialize_shares_one_fetch() {
    let ctx = TestContext::new().await;
    let store = ctx.store();

    let (a, b) = tokio::join!(store.initialize(), store.initialize());
    a.expect("first initialize");
    b.expect("second initialize");
    assert_eq!(ctx.mock.hits(), 1, "late caller must join the in-flight fetch");
}

#[tokio::test]
async fn refresh_always_forces_network() {
    let ctx = TestContext::new().await;
    let store = ctx.store();

    store.initialize().await.expect("initialize");
    store.refresh().await.expect("refresh");
    assert_eq!(ctx.mock.hits(), 2);
}

#[tokio::test]
async fn refresh_if_stale_skips_fresh_cache() {
    let ctx = TestContext::new().await;
    let store = ctx.store();

    store.initialize().await.expect("initialize");
    store
        .refresh_if_stale(Duration::seconds(600))
        .await
        .expect("fresh cache");
    assert_eq!(ctx.mock.hits(), 1);

    // A zero max-age makes the just-fetched payload already stale.
    store
        .refresh_if_stale(Duration::zero())
        .await
        .expect("stale refresh");
    assert_eq!(ctx.mock.hits(), 2);
}

#[tokio::test]
async fn http_failure_surfaces_server_message() {
    let ctx = TestContext::new().await;
    ctx.mock.set_failing(true);
    let store = ctx.store();

    let err = store.initialize().await.unwrap_err();
    match err {
        CatalogError::Upstream(message) => assert_eq!(message, "catalog unavailable"),
        other => panic!("expected Upstream error, got {other:?}"),
    }
    assert!(!store.is_ready());
    assert_eq!(
        store.last_error().as_deref(),
        Some("upstream error: catalog unavailable")
    );
}

#[tokio::test]
async fn success_false_is_a_fetch_failure() {
    let ctx = TestContext::with_payload(serde_json::json!({
        "success": false,
        "error": "maintenance window"
    }))
    .await;
    let store = ctx.store();

    let err = store.initialize().await.unwrap_err();
    assert!(matches!(err, CatalogError::Upstream(m) if m == "maintenance window"));
}

#[tokio::test]
async fn failed_refresh_keeps_previous_generation_visible() {
    let ctx = TestContext::new().await;
    let store = ctx.store();

    store.initialize().await.expect("initialize");
    assert_eq!(store.all_items().len(), 4);

    ctx.mock.set_failing(true);
    store.refresh().await.unwrap_err();

    // Stale-while-error: prior data still serves reads.
    assert!(store.is_ready());
    assert_eq!(store.all_items().len(), 4);
    assert!(store.last_error().is_some());

    // Recovery clears the recorded error.
    ctx.mock.set_failing(false);
    store.refresh().await.expect("recovered refresh");
    assert!(store.last_error().is_none());
}

#[tokio::test]
async fn derived_collections_match_payload() {
    let ctx = TestContext::new().await;
    let store = ctx.store();
    store.initialize().await.expect("initialize");

    let products = store.products();
    let beverages = store.beverages();
    let all = store.all_items();

    assert_eq!(all.len(), products.len() + beverages.len());
    assert!(products.iter().all(|item| !item.is_drink()));
    assert!(beverages.iter().all(supra_catalog::CatalogItem::is_drink));

    // Products come first in the unified collection.
    assert_eq!(
        all.iter().take(products.len()).filter(|i| i.is_drink()).count(),
        0
    );
}
