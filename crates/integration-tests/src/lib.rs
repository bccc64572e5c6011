//! Integration test harness for the shopsync stores.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopsync-integration-tests
//! ```
//!
//! Everything runs in-process: [`FakeRemote`] stands in for the GraphQL
//! source and the stores run over an in-memory storage backend, so the
//! tests exercise the full store semantics (merge, fallback, rollback,
//! persistence) without network or filesystem state.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use rust_decimal::Decimal;

use shopsync_client::{
    ApiError, CartStore, CatalogStore, CategoryMergePolicy, LocalStore, MemoryBackend, RemoteApi,
    SessionStore, StorageBackend, StorageError,
};
use shopsync_core::{AuthTokens, Category, CreateUserInput, Product, UpdateUserInput, User};

/// Avatar attached to registrations in tests.
pub const TEST_AVATAR: &str = "https://example.com/avatar.png";

// ============================================================================
// Fake remote source
// ============================================================================

/// Per-operation failure switches.
///
/// A set switch makes the corresponding call return
/// [`ApiError::NoData`], standing in for an unreachable or rejecting
/// remote.
#[derive(Default)]
pub struct Failures {
    pub products: bool,
    pub delete_product: bool,
    pub categories: bool,
    pub login: bool,
    pub register: bool,
    pub refresh: bool,
    pub profile: bool,
    pub update_user: bool,
}

struct FakeState {
    products: Vec<Product>,
    categories: Vec<Category>,
    user: User,
    password: String,
    failures: Failures,
    deleted_product_ids: Vec<String>,
}

/// Scripted in-process stand-in for the remote GraphQL source.
///
/// Holds a fixed product/category set and a single known account; records
/// which product ids were deleted remotely.
pub struct FakeRemote {
    state: Mutex<FakeState>,
}

impl Default for FakeRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeRemote {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakeState {
                products: Vec::new(),
                categories: Vec::new(),
                user: sample_user(),
                password: "secret".to_string(),
                failures: Failures::default(),
                deleted_product_ids: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_products(&self, products: Vec<Product>) {
        self.lock().products = products;
    }

    pub fn set_categories(&self, categories: Vec<Category>) {
        self.lock().categories = categories;
    }

    /// Flip failure switches mid-test.
    pub fn set_failures(&self, failures: Failures) {
        self.lock().failures = failures;
    }

    /// Product ids acknowledged as deleted by the fake, in call order.
    #[must_use]
    pub fn deleted_product_ids(&self) -> Vec<String> {
        self.lock().deleted_product_ids.clone()
    }
}

#[async_trait]
impl RemoteApi for FakeRemote {
    async fn products(&self) -> Result<Vec<Product>, ApiError> {
        let state = self.lock();
        if state.failures.products {
            return Err(ApiError::NoData);
        }
        Ok(state.products.clone())
    }

    async fn delete_product(&self, id: &str) -> Result<bool, ApiError> {
        let mut state = self.lock();
        if state.failures.delete_product {
            return Err(ApiError::NoData);
        }
        let existed = state.products.iter().any(|p| p.id == id);
        state.products.retain(|p| p.id != id);
        state.deleted_product_ids.push(id.to_string());
        Ok(existed)
    }

    async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        let state = self.lock();
        if state.failures.categories {
            return Err(ApiError::NoData);
        }
        Ok(state.categories.clone())
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthTokens, ApiError> {
        let state = self.lock();
        if state.failures.login || email != state.user.email || password != state.password {
            return Err(ApiError::NoData);
        }
        Ok(AuthTokens {
            access_token: "fake-access".to_string(),
            refresh_token: "fake-refresh".to_string(),
        })
    }

    async fn register(&self, input: &CreateUserInput) -> Result<User, ApiError> {
        let mut state = self.lock();
        if state.failures.register {
            return Err(ApiError::NoData);
        }
        let user = User {
            id: "u2".to_string(),
            email: input.email.clone(),
            name: input.name.clone(),
            role: Some("customer".to_string()),
            avatar: Some(input.avatar.clone()),
        };
        state.user = user.clone();
        state.password = input.password.clone();
        Ok(user)
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<AuthTokens, ApiError> {
        let state = self.lock();
        if state.failures.refresh || refresh_token != "fake-refresh" {
            return Err(ApiError::NoData);
        }
        Ok(AuthTokens {
            access_token: "fake-access-2".to_string(),
            refresh_token: "fake-refresh-2".to_string(),
        })
    }

    async fn profile(&self, access_token: &str) -> Result<User, ApiError> {
        let state = self.lock();
        if state.failures.profile || !access_token.starts_with("fake-access") {
            return Err(ApiError::NoData);
        }
        Ok(state.user.clone())
    }

    async fn update_user(&self, id: &str, changes: &UpdateUserInput) -> Result<User, ApiError> {
        let mut state = self.lock();
        if state.failures.update_user || id != state.user.id {
            return Err(ApiError::NoData);
        }
        if let Some(name) = &changes.name {
            state.user.name = name.clone();
        }
        if let Some(email) = &changes.email {
            state.user.email = email.clone();
        }
        Ok(state.user.clone())
    }
}

// ============================================================================
// Unreliable storage backend
// ============================================================================

/// In-memory backend whose writes can be made to fail per key, standing
/// in for a full disk or revoked permissions. Reads and deletes always
/// succeed.
#[derive(Default)]
pub struct UnreliableBackend {
    inner: MemoryBackend,
    failing_keys: Mutex<HashSet<String>>,
}

impl UnreliableBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write to `key` fail.
    pub fn fail_writes_to(&self, key: &str) {
        self.failing().insert(key.to_string());
    }

    /// Let writes to `key` succeed again.
    pub fn heal(&self, key: &str) {
        self.failing().remove(key);
    }

    fn failing(&self) -> MutexGuard<'_, HashSet<String>> {
        self.failing_keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl StorageBackend for UnreliableBackend {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.failing().contains(key) {
            return Err(StorageError::Io(std::io::Error::other(format!(
                "write to '{key}' failed"
            ))));
        }
        self.inner.write(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.inner.delete(key)
    }
}

// ============================================================================
// Sample data builders
// ============================================================================

/// The fake's single known account (password `secret`).
#[must_use]
pub fn sample_user() -> User {
    User {
        id: "u1".to_string(),
        email: "user@example.com".to_string(),
        name: "Test User".to_string(),
        role: Some("customer".to_string()),
        avatar: Some(TEST_AVATAR.to_string()),
    }
}

#[must_use]
pub fn sample_product(id: &str, title: &str, price: u32) -> Product {
    Product {
        id: id.to_string(),
        title: title.to_string(),
        price: Decimal::from(price),
        description: format!("{title} description"),
        images: vec![format!("{id}.png")],
        image: None,
        category: None,
        creation_at: None,
        updated_at: None,
    }
}

#[must_use]
pub fn sample_product_in(id: &str, title: &str, price: u32, category: &Category) -> Product {
    Product {
        category: Some(category.clone()),
        ..sample_product(id, title, price)
    }
}

#[must_use]
pub fn sample_category(id: &str, name: &str) -> Category {
    Category {
        id: id.to_string(),
        name: name.to_string(),
        image: format!("{id}.png"),
        creation_at: None,
        updated_at: None,
    }
}

// ============================================================================
// Wired-up store fixtures
// ============================================================================

/// The three stores wired over one shared in-memory storage and one fake
/// remote.
pub struct TestStores {
    pub storage: LocalStore,
    pub remote: Arc<FakeRemote>,
    pub session: SessionStore,
    pub catalog: CatalogStore,
    pub cart: CartStore,
}

/// Build all three stores over fresh in-memory storage.
///
/// # Panics
///
/// Panics if store construction fails, which over an in-memory backend
/// indicates a bug.
#[must_use]
pub fn test_stores(remote: Arc<FakeRemote>) -> TestStores {
    test_stores_over(LocalStore::new(Arc::new(MemoryBackend::new())), remote)
}

/// Build all three stores over existing storage, simulating a restart
/// when the storage already carries state.
///
/// # Panics
///
/// Panics if store construction fails.
#[must_use]
pub fn test_stores_over(storage: LocalStore, remote: Arc<FakeRemote>) -> TestStores {
    let session = SessionStore::new(storage.clone(), remote.clone(), TEST_AVATAR);
    let catalog = CatalogStore::new(
        storage.clone(),
        remote.clone(),
        CategoryMergePolicy::default(),
    )
    .expect("catalog store");
    let cart = CartStore::new(storage.clone()).expect("cart store");
    TestStores {
        storage,
        remote,
        session,
        catalog,
        cart,
    }
}
