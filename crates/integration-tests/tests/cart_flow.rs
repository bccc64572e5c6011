//! Cart flow: catalog-to-cart bridging, totals, persistence.

use std::sync::Arc;

use rust_decimal::Decimal;
use shopsync_client::{LocalStore, MemoryBackend, StoreError};
use shopsync_integration_tests::{
    FakeRemote, UnreliableBackend, sample_product, test_stores, test_stores_over,
};

#[tokio::test]
async fn test_adding_a_catalog_product_twice_yields_one_line() {
    let remote = Arc::new(FakeRemote::new());
    remote.set_products(vec![sample_product("10", "widget", 10)]);
    let stores = test_stores(remote);
    let listing = stores.catalog.load_products().await.expect("load");

    stores.cart.add_to_cart(&listing[0].product).expect("add");
    stores.cart.add_to_cart(&listing[0].product).expect("add again");

    let items = stores.cart.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, 2);
    assert_eq!(stores.cart.get_total_price(), Decimal::from(20));
}

#[tokio::test]
async fn test_total_spans_multiple_lines() {
    let remote = Arc::new(FakeRemote::new());
    remote.set_products(vec![
        sample_product("10", "widget", 10),
        sample_product("11", "gadget", 7),
    ]);
    let stores = test_stores(remote);
    let listing = stores.catalog.load_products().await.expect("load");

    stores.cart.add_to_cart(&listing[0].product).expect("add");
    stores.cart.add_to_cart(&listing[1].product).expect("add");
    stores.cart.update_quantity("11", 3).expect("set");

    assert_eq!(stores.cart.get_total_price(), Decimal::from(31));
}

#[tokio::test]
async fn test_cart_line_carries_the_primary_image() {
    let remote = Arc::new(FakeRemote::new());
    remote.set_products(vec![sample_product("10", "widget", 10)]);
    let stores = test_stores(remote);
    let listing = stores.catalog.load_products().await.expect("load");

    stores.cart.add_to_cart(&listing[0].product).expect("add");
    assert_eq!(stores.cart.items()[0].image, "10.png");
}

#[tokio::test]
async fn test_zero_quantity_is_rejected_without_side_effects() {
    let remote = Arc::new(FakeRemote::new());
    remote.set_products(vec![sample_product("10", "widget", 10)]);
    let stores = test_stores(remote);
    let listing = stores.catalog.load_products().await.expect("load");
    stores.cart.add_to_cart(&listing[0].product).expect("add");

    let result = stores.cart.update_quantity("10", 0);
    assert!(matches!(result, Err(StoreError::InvalidQuantity(0))));
    assert_eq!(stores.cart.items()[0].quantity, 1);
}

#[tokio::test]
async fn test_remove_all_erases_persistence_and_reload_is_empty() {
    let remote = Arc::new(FakeRemote::new());
    remote.set_products(vec![sample_product("10", "widget", 10)]);
    let storage = LocalStore::new(Arc::new(MemoryBackend::new()));
    {
        let stores = test_stores_over(storage.clone(), remote.clone());
        let listing = stores.catalog.load_products().await.expect("load");
        stores.cart.add_to_cart(&listing[0].product).expect("add");
        stores.cart.remove_all_cart().expect("clear");
    }

    let reopened = test_stores_over(storage, remote);
    assert!(reopened.cart.items().is_empty());
    assert_eq!(reopened.cart.get_total_price(), Decimal::ZERO);
}

#[tokio::test]
async fn test_cart_survives_restart_with_quantities() {
    let remote = Arc::new(FakeRemote::new());
    remote.set_products(vec![
        sample_product("10", "widget", 10),
        sample_product("11", "gadget", 7),
    ]);
    let storage = LocalStore::new(Arc::new(MemoryBackend::new()));
    {
        let stores = test_stores_over(storage.clone(), remote.clone());
        let listing = stores.catalog.load_products().await.expect("load");
        stores.cart.add_to_cart(&listing[0].product).expect("add");
        stores.cart.add_to_cart(&listing[1].product).expect("add");
        stores.cart.update_quantity("10", 2).expect("set");
    }

    let reopened = test_stores_over(storage, remote);
    let items = reopened.cart.items();
    assert_eq!(items.len(), 2);
    assert_eq!(items.iter().find(|i| i.id == "10").expect("line").quantity, 2);
    assert_eq!(reopened.cart.get_total_price(), Decimal::from(27));
}

#[tokio::test]
async fn test_storage_failure_leaves_the_cart_unchanged() {
    let remote = Arc::new(FakeRemote::new());
    remote.set_products(vec![sample_product("10", "widget", 10)]);
    let backend = Arc::new(UnreliableBackend::new());
    let storage = LocalStore::new(backend.clone());
    let stores = test_stores_over(storage, remote);
    let listing = stores.catalog.load_products().await.expect("load");
    stores.cart.add_to_cart(&listing[0].product).expect("add");

    backend.fail_writes_to("cart");

    // Both mutation kinds abort before touching memory or the signals.
    let result = stores.cart.add_to_cart(&listing[0].product);
    assert!(matches!(result, Err(StoreError::Storage(_))));
    let result = stores.cart.update_quantity("10", 5);
    assert!(matches!(result, Err(StoreError::Storage(_))));

    let items = stores.cart.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, 1);
    assert_eq!(stores.cart.get_total_price(), Decimal::from(10));
    assert_eq!(stores.cart.cart_items().get().len(), 1);
    assert_eq!(stores.cart.total().get(), Decimal::from(10));

    backend.heal("cart");
    stores.cart.add_to_cart(&listing[0].product).expect("add");
    assert_eq!(stores.cart.items()[0].quantity, 2);
}

#[tokio::test]
async fn test_cart_keeps_deleted_catalog_products() {
    // Removing a product from the catalog does not reach into the cart;
    // the line survives until the user removes it.
    let remote = Arc::new(FakeRemote::new());
    remote.set_products(vec![sample_product("10", "widget", 10)]);
    let stores = test_stores(remote);
    let listing = stores.catalog.load_products().await.expect("load");
    stores.cart.add_to_cart(&listing[0].product).expect("add");

    stores.catalog.delete_product("10").await.expect("delete");

    assert_eq!(stores.cart.items().len(), 1);
    stores.cart.remove_cart_item("10").expect("remove");
    assert!(stores.cart.items().is_empty());
}
