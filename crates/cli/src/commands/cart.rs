//! Cart commands: add, list, set-qty, rm, clear.

#![allow(clippy::print_stdout)]

use shopsync_client::StoreError;

use super::App;

/// Look a product up in the merged catalog and add it to the cart.
///
/// # Errors
///
/// Returns [`StoreError::NotFound`] if the id is not in the current
/// catalog, or a storage error if the cart cannot be persisted.
pub async fn add(app: &App, id: &str) -> Result<(), StoreError> {
    app.catalog.load_products().await?;
    let entry = app
        .catalog
        .products()
        .into_iter()
        .find(|entry| entry.product.id == id)
        .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

    app.cart.add_to_cart(&entry.product)?;
    println!("Added {} to cart", entry.product.title);
    Ok(())
}

/// Print the cart lines and the grand total.
pub fn list(app: &App) {
    let items = app.cart.items();
    if items.is_empty() {
        println!("Cart is empty");
        return;
    }
    for item in &items {
        println!(
            "{:<16} {:<32} {:>3} x {:>10} = {:>10}",
            item.id,
            item.title,
            item.quantity,
            item.price,
            item.line_total()
        );
    }
    println!("Total: {}", app.cart.get_total_price());
}

/// Set a line's quantity.
///
/// # Errors
///
/// Returns [`StoreError::InvalidQuantity`] for zero, or a storage error
/// if the cart cannot be persisted.
pub fn set_quantity(app: &App, id: &str, quantity: u32) -> Result<(), StoreError> {
    app.cart.update_quantity(id, quantity)?;
    println!("Set {id} to {quantity}");
    Ok(())
}

/// Remove a line entirely.
///
/// # Errors
///
/// Returns a storage error if the cart cannot be persisted.
pub fn remove(app: &App, id: &str) -> Result<(), StoreError> {
    app.cart.remove_cart_item(id)?;
    println!("Removed {id} from cart");
    Ok(())
}

/// Empty the cart.
///
/// # Errors
///
/// Returns a storage error if the persisted entry cannot be removed.
pub fn clear(app: &App) -> Result<(), StoreError> {
    app.cart.remove_all_cart()?;
    println!("Cart cleared");
    Ok(())
}
