//! Catalog store: hybrid read-through view over remote products and
//! categories with a local-only sub-store.
//!
//! Remote-origin and local-origin records are kept strictly separate:
//! local ids are generated (`local_` prefix) and cannot collide with
//! remote ids, so the merged product listing is deliberately not
//! deduplicated. When the remote source is unreachable, read paths fall
//! back to the persisted local data and the failure is swallowed here;
//! write paths always re-raise.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, instrument, warn};

use shopsync_core::{
    ALL_CATEGORIES, Category, CategoryChanges, DEFAULT_CATEGORY_ID, Product, is_local_id, local_id,
};

use crate::api::RemoteApi;
use crate::config::CategoryMergePolicy;
use crate::error::{Result, StoreError};
use crate::signal::Signal;
use crate::storage::{LocalStore, keys};

/// Icon used when seeding the pinned default category.
const DEFAULT_CATEGORY_ICON: &str = "assets/images/default-category.svg";

/// A product as presented in the merged listing.
///
/// `quantity` and `total` are listing seeds (1 and the unit price);
/// `is_local` is recomputed on every load and never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogProduct {
    pub product: Product,
    pub quantity: u32,
    pub total: Decimal,
    pub is_local: bool,
}

impl CatalogProduct {
    fn new(product: Product, is_local: bool) -> Self {
        let total = product.price;
        Self {
            product,
            quantity: 1,
            total,
            is_local,
        }
    }
}

/// Pre-image of an optimistic product removal, kept so a failed remote
/// delete can reinsert the entry at its tracked position.
struct PendingRemoval {
    entry: CatalogProduct,
    index: usize,
}

struct CatalogState {
    /// Local category sub-store: the pinned default plus user-created ones.
    categories: Vec<Category>,
    /// Ledger of user-created category ids, persisted independently so
    /// provenance survives reloads.
    user_created: Vec<String>,
    /// Visible merged product list, rebuilt by `load_products`.
    products: Vec<CatalogProduct>,
}

/// Owns the local category sub-store, the user-created-id ledger, the
/// local fallback product list, and the merged product view.
pub struct CatalogStore {
    storage: LocalStore,
    remote: Arc<dyn RemoteApi>,
    policy: CategoryMergePolicy,
    state: Mutex<CatalogState>,
    categories_signal: Signal<Vec<Category>>,
}

impl CatalogStore {
    /// Create the store, seeding the pinned default category if the local
    /// sub-store does not carry it yet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] if the local sub-store cannot be
    /// read or the seeded pin cannot be persisted.
    pub fn new(
        storage: LocalStore,
        remote: Arc<dyn RemoteApi>,
        policy: CategoryMergePolicy,
    ) -> Result<Self> {
        let mut categories: Vec<Category> =
            storage.get(keys::CATEGORIES)?.unwrap_or_default();
        let user_created: Vec<String> = storage
            .get(keys::USER_CREATED_CATEGORIES)?
            .unwrap_or_default();

        let pinned_pos = categories.iter().position(Category::is_pinned);
        match pinned_pos {
            Some(0) => {}
            Some(pos) => {
                // The pin must always be first.
                let pinned = categories.remove(pos);
                categories.insert(0, pinned);
                storage.set(keys::CATEGORIES, &categories)?;
            }
            None => {
                categories.insert(0, Category::default_electronics(DEFAULT_CATEGORY_ICON));
                storage.set(keys::CATEGORIES, &categories)?;
            }
        }

        let categories_signal = Signal::new(categories.clone());

        Ok(Self {
            storage,
            remote,
            policy,
            state: Mutex::new(CatalogState {
                categories,
                user_created,
                products: Vec::new(),
            }),
            categories_signal,
        })
    }

    fn lock(&self) -> MutexGuard<'_, CatalogState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Build the merged product listing: local fallback entries first, then
    /// remote ones. On remote failure the listing is exactly the local
    /// fallback list.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] if the local fallback list cannot be
    /// read. Remote failures are swallowed (logged) on this read path.
    #[instrument(skip(self))]
    pub async fn load_products(&self) -> Result<Vec<CatalogProduct>> {
        let locals: Vec<Product> = self.storage.get(keys::PRODUCTS)?.unwrap_or_default();
        let mut list: Vec<CatalogProduct> = locals
            .into_iter()
            .map(|p| CatalogProduct::new(p, true))
            .collect();

        match self.remote.products().await {
            Ok(remote) => {
                list.extend(remote.into_iter().map(|p| CatalogProduct::new(p, false)));
            }
            Err(e) => {
                warn!(error = %e, "remote product query failed, serving local fallback");
            }
        }

        self.lock().products = list.clone();
        Ok(list)
    }

    /// Snapshot of the current merged product list.
    #[must_use]
    pub fn products(&self) -> Vec<CatalogProduct> {
        self.lock().products.clone()
    }

    /// Filter the current merged list by category name.
    ///
    /// The `"all"` sentinel selects the full list; otherwise the match is
    /// case-insensitive on both sides.
    #[must_use]
    pub fn apply_filters(&self, selected: &str) -> Vec<CatalogProduct> {
        let products = self.lock().products.clone();
        if selected == ALL_CATEGORIES {
            return products;
        }
        let needle = selected.to_lowercase();
        products
            .into_iter()
            .filter(|entry| {
                entry
                    .product
                    .category
                    .as_ref()
                    .is_some_and(|c| c.name.to_lowercase() == needle)
            })
            .collect()
    }

    /// Optimistically remove a product from the visible list.
    ///
    /// Local-origin entries are also removed from the persisted fallback
    /// list and the removal is final. Remote-origin entries trigger a
    /// remote delete; on failure the pre-image is reinserted at its
    /// tracked index (clamped to the current list, which may have shifted
    /// under interleaved mutations) and the error is re-raised.
    ///
    /// Unknown ids are a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] if the persisted fallback list
    /// cannot be updated, or [`StoreError::Remote`] if the remote delete
    /// fails (after rollback).
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete_product(&self, id: &str) -> Result<()> {
        let pending = {
            let mut state = self.lock();
            let Some(index) = state.products.iter().position(|p| p.product.id == id) else {
                return Ok(());
            };
            let entry = state.products.remove(index);
            PendingRemoval { entry, index }
        };

        if is_local_id(id) {
            if let Err(e) = self.remove_from_local_products(id) {
                self.rollback_removal(pending);
                return Err(e);
            }
            return Ok(());
        }

        match self.remote.delete_product(id).await {
            Ok(deleted) => {
                debug!(deleted, "remote product delete acknowledged");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "remote product delete failed, rolling back");
                self.rollback_removal(pending);
                Err(e.into())
            }
        }
    }

    fn remove_from_local_products(&self, id: &str) -> Result<()> {
        let stored: Vec<Product> = self.storage.get(keys::PRODUCTS)?.unwrap_or_default();
        let remaining: Vec<Product> = stored.into_iter().filter(|p| p.id != id).collect();
        self.storage.set(keys::PRODUCTS, &remaining)?;
        Ok(())
    }

    /// Reinsert a removed entry, re-deriving the position from the list as
    /// it is now rather than a captured snapshot.
    fn rollback_removal(&self, pending: PendingRemoval) {
        let mut state = self.lock();
        let index = pending.index.min(state.products.len());
        state.products.insert(index, pending.entry);
    }

    /// Persist a locally created product into the fallback list.
    ///
    /// The record is assigned a fresh `local_` id and is only ever served
    /// from local storage.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] if the fallback list cannot be
    /// updated.
    pub fn create_local_product(&self, mut product: Product) -> Result<Product> {
        product.id = local_id();
        product.creation_at = Some(Utc::now());
        let mut stored: Vec<Product> = self.storage.get(keys::PRODUCTS)?.unwrap_or_default();
        stored.push(product.clone());
        self.storage.set(keys::PRODUCTS, &stored)?;
        Ok(product)
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// Build the category listing: the pinned default first, then
    /// user-created categories in creation order, then (under the keyword
    /// policy) remote categories whose name contains the needle.
    ///
    /// Remote failure falls back to the local set; remote records are
    /// never written into the local sub-store.
    ///
    /// # Errors
    ///
    /// This read path does not fail on remote errors; the signature leaves
    /// room for storage-backed policies.
    #[instrument(skip(self))]
    pub async fn load_categories(&self) -> Result<Vec<Category>> {
        let mut list = self.lock().categories.clone();

        if let CategoryMergePolicy::Keyword(needle) = &self.policy {
            match self.remote.categories().await {
                Ok(remote) => {
                    let needle = needle.to_lowercase();
                    for category in remote {
                        let known = list.iter().any(|c| c.id == category.id);
                        if !known && category.name.to_lowercase().contains(&needle) {
                            list.push(category);
                        }
                    }
                }
                Err(e) => {
                    warn!(error = %e, "remote category query failed, serving local set");
                }
            }
        }

        self.categories_signal.emit(list.clone());
        Ok(list)
    }

    /// Create a user-created category, record it in the ledger, persist
    /// both, and broadcast.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] if the sub-store or ledger cannot
    /// be persisted.
    #[instrument(skip(self, image), fields(name = %name))]
    pub fn create_category(&self, name: &str, image: &str) -> Result<Category> {
        let now = Utc::now();
        let category = Category {
            id: local_id(),
            name: name.to_string(),
            image: image.to_string(),
            creation_at: Some(now),
            updated_at: Some(now),
        };

        let mut state = self.lock();
        let mut categories = state.categories.clone();
        let mut ledger = state.user_created.clone();
        categories.push(category.clone());
        ledger.push(category.id.clone());

        self.storage.set(keys::CATEGORIES, &categories)?;
        self.storage.set(keys::USER_CREATED_CATEGORIES, &ledger)?;

        state.categories = categories.clone();
        state.user_created = ledger;
        drop(state);

        self.categories_signal.emit(categories);
        Ok(category)
    }

    /// Merge changes into an existing category and stamp a new update
    /// timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ProtectedCategory`] for the pinned default,
    /// [`StoreError::NotFound`] for unknown ids, and
    /// [`StoreError::Storage`] if the sub-store cannot be persisted.
    #[instrument(skip(self, changes), fields(id = %id))]
    pub fn update_category(&self, id: &str, changes: &CategoryChanges) -> Result<Category> {
        if id == DEFAULT_CATEGORY_ID {
            return Err(StoreError::ProtectedCategory(id.to_string()));
        }

        let mut state = self.lock();
        let position = state
            .categories
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let mut categories = state.categories.clone();
        let updated = {
            let category = categories
                .get_mut(position)
                .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
            if let Some(name) = &changes.name {
                category.name = name.clone();
            }
            if let Some(image) = &changes.image {
                category.image = image.clone();
            }
            category.updated_at = Some(Utc::now());
            category.clone()
        };

        self.storage.set(keys::CATEGORIES, &categories)?;
        state.categories = categories.clone();
        drop(state);

        self.categories_signal.emit(categories);
        Ok(updated)
    }

    /// Remove a category and its ledger entry.
    ///
    /// Returns `Ok(false)` for unknown ids. After an `Ok(true)` return the
    /// id can no longer be resolved; resetting an active filter that
    /// pointed at it is the caller's concern.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ProtectedCategory`] for the pinned default
    /// (the pin is refused, never silently dropped) and
    /// [`StoreError::Storage`] if persistence fails.
    #[instrument(skip(self), fields(id = %id))]
    pub fn delete_category(&self, id: &str) -> Result<bool> {
        if id == DEFAULT_CATEGORY_ID {
            return Err(StoreError::ProtectedCategory(id.to_string()));
        }

        let mut state = self.lock();
        if !state.categories.iter().any(|c| c.id == id) {
            return Ok(false);
        }

        let categories: Vec<Category> = state
            .categories
            .iter()
            .filter(|c| c.id != id)
            .cloned()
            .collect();
        let ledger: Vec<String> = state
            .user_created
            .iter()
            .filter(|tracked| tracked.as_str() != id)
            .cloned()
            .collect();

        self.storage.set(keys::CATEGORIES, &categories)?;
        self.storage.set(keys::USER_CREATED_CATEGORIES, &ledger)?;

        state.categories = categories.clone();
        state.user_created = ledger;
        drop(state);

        self.categories_signal.emit(categories);
        Ok(true)
    }

    /// True if the category id was created through this store (tracked in
    /// the user-created ledger).
    #[must_use]
    pub fn is_user_created(&self, id: &str) -> bool {
        self.lock().user_created.iter().any(|tracked| tracked == id)
    }

    /// The category-listing signal for subscribers.
    #[must_use]
    pub fn categories(&self) -> Signal<Vec<Category>> {
        self.categories_signal.clone()
    }
}
