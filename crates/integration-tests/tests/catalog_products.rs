//! Product catalog: merge order, offline fallback, optimistic delete.

use std::sync::Arc;

use shopsync_client::{LocalStore, MemoryBackend, StoreError};
use shopsync_integration_tests::{
    FakeRemote, Failures, sample_category, sample_product, sample_product_in, test_stores,
    test_stores_over,
};

#[tokio::test]
async fn test_merged_listing_puts_locals_first() {
    let remote = Arc::new(FakeRemote::new());
    remote.set_products(vec![
        sample_product("10", "remote a", 5),
        sample_product("11", "remote b", 7),
    ]);
    let stores = test_stores(remote);

    let local = stores
        .catalog
        .create_local_product(sample_product("ignored", "mine", 3))
        .expect("create");

    let listing = stores.catalog.load_products().await.expect("load");
    assert_eq!(listing.len(), 3);
    assert_eq!(listing[0].product.id, local.id);
    assert!(listing[0].is_local);
    assert!(listing[0].product.id.starts_with("local_"));
    assert!(!listing[1].is_local);
    assert!(!listing[2].is_local);
}

#[tokio::test]
async fn test_listing_seeds_quantity_and_total_from_price() {
    let remote = Arc::new(FakeRemote::new());
    remote.set_products(vec![sample_product("10", "remote a", 5)]);
    let stores = test_stores(remote);

    let listing = stores.catalog.load_products().await.expect("load");
    assert_eq!(listing[0].quantity, 1);
    assert_eq!(listing[0].total, listing[0].product.price);
}

#[tokio::test]
async fn test_offline_listing_is_exactly_the_local_set() {
    let remote = Arc::new(FakeRemote::new());
    remote.set_failures(Failures {
        products: true,
        ..Failures::default()
    });
    let stores = test_stores(remote);
    stores
        .catalog
        .create_local_product(sample_product("x", "mine", 3))
        .expect("create");

    let listing = stores.catalog.load_products().await.expect("load");
    assert_eq!(listing.len(), 1);
    assert!(listing[0].is_local);
}

#[tokio::test]
async fn test_remote_delete_confirms_and_stays_gone() {
    let remote = Arc::new(FakeRemote::new());
    remote.set_products(vec![
        sample_product("10", "a", 5),
        sample_product("11", "b", 7),
    ]);
    let stores = test_stores(remote.clone());
    stores.catalog.load_products().await.expect("load");

    stores.catalog.delete_product("10").await.expect("delete");

    assert_eq!(remote.deleted_product_ids(), vec!["10".to_string()]);
    let remaining = stores.catalog.products();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].product.id, "11");
}

#[tokio::test]
async fn test_failed_remote_delete_restores_entry_at_its_index() {
    let remote = Arc::new(FakeRemote::new());
    remote.set_products(vec![
        sample_product("10", "a", 5),
        sample_product("11", "b", 7),
        sample_product("12", "c", 9),
    ]);
    let stores = test_stores(remote.clone());
    stores.catalog.load_products().await.expect("load");

    remote.set_failures(Failures {
        delete_product: true,
        ..Failures::default()
    });

    let result = stores.catalog.delete_product("11").await;
    assert!(matches!(result, Err(StoreError::Remote(_))));

    // The entry is back where it was, not appended.
    let listing = stores.catalog.products();
    let ids: Vec<&str> = listing.iter().map(|e| e.product.id.as_str()).collect();
    assert_eq!(ids, vec!["10", "11", "12"]);
    assert!(remote.deleted_product_ids().is_empty());
}

#[tokio::test]
async fn test_local_delete_never_calls_the_remote_and_persists() {
    let remote = Arc::new(FakeRemote::new());
    let storage = LocalStore::new(Arc::new(MemoryBackend::new()));
    let stores = test_stores_over(storage.clone(), remote.clone());

    let local = stores
        .catalog
        .create_local_product(sample_product("ignored", "mine", 3))
        .expect("create");
    stores.catalog.load_products().await.expect("load");

    stores.catalog.delete_product(&local.id).await.expect("delete");

    assert!(remote.deleted_product_ids().is_empty());
    assert!(stores.catalog.products().is_empty());

    // The removal is final across restarts.
    let reopened = test_stores_over(storage, remote);
    let listing = reopened.catalog.load_products().await.expect("load");
    assert!(listing.is_empty());
}

#[tokio::test]
async fn test_filter_by_category_is_case_insensitive() {
    let clothes = sample_category("c1", "Clothes");
    let remote = Arc::new(FakeRemote::new());
    remote.set_products(vec![
        sample_product_in("10", "shirt", 5, &clothes),
        sample_product("11", "lamp", 7),
    ]);
    let stores = test_stores(remote);
    stores.catalog.load_products().await.expect("load");

    let filtered = stores.catalog.apply_filters("clothes");
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].product.id, "10");

    assert_eq!(stores.catalog.apply_filters("all").len(), 2);
    assert!(stores.catalog.apply_filters("Books").is_empty());
}

#[tokio::test]
async fn test_delete_unknown_id_changes_nothing() {
    let remote = Arc::new(FakeRemote::new());
    remote.set_products(vec![sample_product("10", "a", 5)]);
    let stores = test_stores(remote.clone());
    stores.catalog.load_products().await.expect("load");

    stores.catalog.delete_product("ghost").await.expect("noop");

    assert_eq!(stores.catalog.products().len(), 1);
    assert!(remote.deleted_product_ids().is_empty());
}
