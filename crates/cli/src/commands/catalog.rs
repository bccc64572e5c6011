//! Catalog commands: product listing and category management.

#![allow(clippy::print_stdout)]

use rust_decimal::Decimal;

use shopsync_core::{CategoryChanges, Product};

use shopsync_client::StoreError;

use super::App;

/// Load the merged catalog and print it, optionally filtered by category
/// name (`all` prints everything).
///
/// # Errors
///
/// Returns the store error if the local fallback list cannot be read.
pub async fn products(app: &App, category: &str) -> Result<(), StoreError> {
    app.catalog.load_products().await?;
    let listing = app.catalog.apply_filters(category);

    if listing.is_empty() {
        println!("No products");
        return Ok(());
    }

    for entry in listing {
        let origin = if entry.is_local { "local" } else { "remote" };
        let category = entry
            .product
            .category
            .as_ref()
            .map_or("-", |c| c.name.as_str());
        println!(
            "{:<16} {:<32} {:>10} {:<10} [{origin}]",
            entry.product.id, entry.product.title, entry.product.price, category
        );
    }
    Ok(())
}

/// Create a local-only product in the fallback store.
///
/// # Errors
///
/// Returns an error if the price does not parse as a decimal or the
/// fallback list cannot be persisted.
pub fn add_product(
    app: &App,
    title: &str,
    price: &str,
    description: &str,
    image: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let price: Decimal = price.parse()?;
    let product = Product {
        id: String::new(),
        title: title.to_string(),
        price,
        description: description.to_string(),
        images: if image.is_empty() {
            vec![]
        } else {
            vec![image.to_string()]
        },
        image: None,
        category: None,
        creation_at: None,
        updated_at: None,
    };

    let created = app.catalog.create_local_product(product)?;
    println!("Created local product {} ({})", created.title, created.id);
    Ok(())
}

/// Remove a product (locally for local ids, remotely for remote ids).
///
/// # Errors
///
/// Returns the store error if persistence or the remote delete fails; on
/// a remote failure the listing has already been rolled back.
pub async fn remove_product(app: &App, id: &str) -> Result<(), StoreError> {
    app.catalog.delete_product(id).await?;
    println!("Removed {id}");
    Ok(())
}

/// Load and print the category listing.
///
/// # Errors
///
/// Returns the store error if the listing cannot be built.
pub async fn categories(app: &App) -> Result<(), StoreError> {
    let listing = app.catalog.load_categories().await?;
    for category in listing {
        let provenance = if app.catalog.is_user_created(&category.id) {
            " (user-created)"
        } else {
            ""
        };
        println!("{:<16} {}{provenance}", category.id, category.name);
    }
    Ok(())
}

/// Create a user-created category.
///
/// # Errors
///
/// Returns the store error if persistence fails.
pub fn add_category(app: &App, name: &str, image: &str) -> Result<(), StoreError> {
    let category = app.catalog.create_category(name, image)?;
    println!("Created category {} ({})", category.name, category.id);
    Ok(())
}

/// Update a user-created category's name or image.
///
/// # Errors
///
/// Returns the store error if the category is protected, unknown, or
/// persistence fails.
pub fn edit_category(
    app: &App,
    id: &str,
    name: Option<String>,
    image: Option<String>,
) -> Result<(), StoreError> {
    let changes = CategoryChanges { name, image };
    let updated = app.catalog.update_category(id, &changes)?;
    println!("Updated category {} ({})", updated.name, updated.id);
    Ok(())
}

/// Delete a user-created category.
///
/// # Errors
///
/// Returns the store error if the category is protected or persistence
/// fails.
pub fn remove_category(app: &App, id: &str) -> Result<(), StoreError> {
    if app.catalog.delete_category(id)? {
        println!("Removed category {id}");
    } else {
        println!("No such category: {id}");
    }
    Ok(())
}
