//! Cart store: persisted line sequence with reactive item and total views.
//!
//! The persisted cart is the source of truth across restarts; the two
//! signals are derived views over the in-memory copy. Every mutation
//! persists first and only then commits and broadcasts, so a storage
//! failure leaves both the persisted and the observable cart unchanged.

use std::sync::{Mutex, MutexGuard, PoisonError};

use rust_decimal::Decimal;
use tracing::instrument;

use shopsync_core::{CartItem, Product};

use crate::error::{Result, StoreError};
use crate::signal::Signal;
use crate::storage::{LocalStore, keys};

/// Owns the cart line sequence and broadcasts item and grand-total updates.
pub struct CartStore {
    storage: LocalStore,
    items: Mutex<Vec<CartItem>>,
    items_signal: Signal<Vec<CartItem>>,
    total_signal: Signal<Decimal>,
}

impl CartStore {
    /// Create the store, restoring any persisted cart and seeding both
    /// signals from it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] if the persisted cart cannot be
    /// read or parsed.
    pub fn new(storage: LocalStore) -> Result<Self> {
        let items: Vec<CartItem> = storage.get(keys::CART)?.unwrap_or_default();
        let total = grand_total(&items);
        Ok(Self {
            storage,
            items_signal: Signal::new(items.clone()),
            total_signal: Signal::new(total),
            items: Mutex::new(items),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Vec<CartItem>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Persist `next`, commit it in memory, and broadcast both views.
    fn commit(&self, guard: &mut MutexGuard<'_, Vec<CartItem>>, next: Vec<CartItem>) -> Result<()> {
        if next.is_empty() {
            // An empty cart erases the entry rather than storing `[]`.
            self.storage.remove(keys::CART)?;
        } else {
            self.storage.set(keys::CART, &next)?;
        }
        **guard = next.clone();
        self.items_signal.emit(next.clone());
        self.total_signal.emit(grand_total(&next));
        Ok(())
    }

    /// Add a product to the cart.
    ///
    /// A product already present increments its line quantity; the cart
    /// holds at most one line per product id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] if the cart cannot be persisted;
    /// the observable cart is then unchanged.
    #[instrument(skip(self, product), fields(id = %product.id))]
    pub fn add_to_cart(&self, product: &Product) -> Result<()> {
        let mut guard = self.lock();
        let mut next = guard.clone();
        match next.iter_mut().find(|item| item.id == product.id) {
            Some(item) => item.quantity += 1,
            None => next.push(CartItem::from_product(product)),
        }
        self.commit(&mut guard, next)
    }

    /// Remove a line entirely, regardless of its quantity.
    ///
    /// Removing an id that is not in the cart is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] if the cart cannot be persisted.
    #[instrument(skip(self), fields(id = %id))]
    pub fn remove_cart_item(&self, id: &str) -> Result<()> {
        let mut guard = self.lock();
        if !guard.iter().any(|item| item.id == id) {
            return Ok(());
        }
        let next: Vec<CartItem> = guard.iter().filter(|item| item.id != id).cloned().collect();
        self.commit(&mut guard, next)
    }

    /// Set a line's quantity to an explicit value.
    ///
    /// Zero is rejected; removal goes through [`Self::remove_cart_item`].
    /// An unknown id is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidQuantity`] for a zero quantity and
    /// [`StoreError::Storage`] if the cart cannot be persisted.
    #[instrument(skip(self), fields(id = %id, quantity))]
    pub fn update_quantity(&self, id: &str, quantity: u32) -> Result<()> {
        if quantity == 0 {
            return Err(StoreError::InvalidQuantity(quantity));
        }
        let mut guard = self.lock();
        let mut next = guard.clone();
        let Some(item) = next.iter_mut().find(|item| item.id == id) else {
            return Ok(());
        };
        item.quantity = quantity;
        self.commit(&mut guard, next)
    }

    /// Empty the cart, erasing the persisted entry entirely.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] if the entry cannot be removed.
    #[instrument(skip(self))]
    pub fn remove_all_cart(&self) -> Result<()> {
        let mut guard = self.lock();
        self.commit(&mut guard, Vec::new())
    }

    /// Snapshot of the current line sequence.
    #[must_use]
    pub fn items(&self) -> Vec<CartItem> {
        self.lock().clone()
    }

    /// Current grand total, Σ price × quantity over all lines.
    #[must_use]
    pub fn get_total_price(&self) -> Decimal {
        self.total_signal.get()
    }

    /// The cart-items signal for subscribers.
    #[must_use]
    pub fn cart_items(&self) -> Signal<Vec<CartItem>> {
        self.items_signal.clone()
    }

    /// The grand-total signal for subscribers.
    #[must_use]
    pub fn total(&self) -> Signal<Decimal> {
        self.total_signal.clone()
    }
}

fn grand_total(items: &[CartItem]) -> Decimal {
    items.iter().map(CartItem::line_total).sum()
}
