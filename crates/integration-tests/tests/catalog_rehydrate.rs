//! Durable snapshot rehydration across store instances.

use chrono::Duration;
use supra_integration_tests::TestContext;

#[tokio::test]
async fn snapshot_rehydrates_without_network() {
    let ctx = TestContext::new().await;

    {
        let store = ctx.store();
        store.initialize().await.expect("initial fetch");
    }
    assert_eq!(ctx.mock.hits(), 1);

    // A fresh instance over the same data directory is ready immediately.
    let store = ctx.store();
    assert!(store.is_ready());
    assert_eq!(store.all_items().len(), 4);
    assert!(store.item_by_slug("saperavi").is_some());
    assert_eq!(ctx.mock.hits(), 1, "rehydration must not touch the network");

    // initialize() on a rehydrated store only recomputes derived data.
    store.initialize().await.expect("no-op initialize");
    assert_eq!(ctx.mock.hits(), 1);
}

#[tokio::test]
async fn rehydrated_snapshot_refreshes_when_stale() {
    let ctx = TestContext::new().await;
    ctx.store().initialize().await.expect("initial fetch");

    let store = ctx.store();
    assert!(!store.is_stale(Duration::seconds(600)));

    // Instant render from the snapshot, refresh deferred to staleness.
    store
        .refresh_if_stale(Duration::seconds(600))
        .await
        .expect("fresh snapshot");
    assert_eq!(ctx.mock.hits(), 1);

    store
        .refresh_if_stale(Duration::zero())
        .await
        .expect("stale snapshot refresh");
    assert_eq!(ctx.mock.hits(), 2);
}

#[tokio::test]
async fn refreshed_payload_replaces_rehydrated_generation() {
    let ctx = TestContext::new().await;
    ctx.store().initialize().await.expect("initial fetch");

    // Upstream changes while we are offline.
    ctx.mock.set_payload(serde_json::json!({
        "success": true,
        "products": [
            {"_id": "p-lobio", "slug": "lobio", "price": 7, "title": {"en": "Lobio"}}
        ],
        "alkohols": []
    }));

    let store = ctx.store();
    assert_eq!(store.all_items().len(), 4, "still the snapshot generation");

    store.refresh().await.expect("forced refresh");
    assert_eq!(store.all_items().len(), 1);
    assert!(store.item_by_slug("lobio").is_some());
    assert!(store.item_by_slug("khachapuri").is_none());
}
