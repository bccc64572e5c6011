//! Session store: token pair, current-user snapshot, login-state signal.
//!
//! State machine: `LoggedOut -> (login success) -> LoggedIn`,
//! `LoggedIn -> (logout) -> LoggedOut`. Token refresh never changes the
//! coarse state; a stale token is still "present" until logout clears it,
//! and detecting invalidity is the remote call's job, not this store's.

use std::sync::Arc;

use tracing::{instrument, warn};

use shopsync_core::{AuthTokens, CreateUserInput, UpdateUserInput, User};

use crate::api::RemoteApi;
use crate::error::{Result, StoreError};
use crate::signal::Signal;
use crate::storage::{LocalStore, StorageError, keys};

/// Owns authentication state and broadcasts login-state transitions.
pub struct SessionStore {
    storage: LocalStore,
    remote: Arc<dyn RemoteApi>,
    login_state: Signal<bool>,
    default_avatar: String,
}

impl SessionStore {
    /// Create the store, seeding the login-state signal from access-token
    /// presence.
    #[must_use]
    pub fn new(
        storage: LocalStore,
        remote: Arc<dyn RemoteApi>,
        default_avatar: impl Into<String>,
    ) -> Self {
        let login_state = Signal::new(storage.contains(keys::ACCESS_TOKEN));
        Self {
            storage,
            remote,
            login_state,
            default_avatar: default_avatar.into(),
        }
    }

    /// Exchange credentials, persist the token pair and user snapshot, and
    /// flip the login-state signal to true.
    ///
    /// On any failure nothing remains persisted and the signal keeps its
    /// previous value: a persistence error mid-write clears the partially
    /// written session keys before the error is returned, so token
    /// presence and the signal never diverge.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Remote`] if the credential exchange fails and
    /// [`StoreError::Storage`] if the session cannot be persisted.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        let tokens = self.remote.login(email, password).await?;

        // The snapshot is a convenience; a login stands without it.
        let snapshot = match self.remote.profile(&tokens.access_token).await {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(error = %e, "profile fetch after login failed");
                None
            }
        };

        if let Err(e) = self.persist_session(&tokens, snapshot.as_ref()) {
            self.clear_session_keys();
            return Err(e.into());
        }

        self.login_state.emit(true);
        Ok(())
    }

    /// Stage all session writes; the caller rolls back on failure.
    fn persist_session(
        &self,
        tokens: &AuthTokens,
        snapshot: Option<&User>,
    ) -> std::result::Result<(), StorageError> {
        self.storage.set(keys::ACCESS_TOKEN, &tokens.access_token)?;
        self.storage.set(keys::REFRESH_TOKEN, &tokens.refresh_token)?;
        if let Some(user) = snapshot {
            self.storage.set(keys::USER, user)?;
        }
        Ok(())
    }

    fn clear_session_keys(&self) {
        for key in [keys::ACCESS_TOKEN, keys::REFRESH_TOKEN, keys::USER] {
            if let Err(e) = self.storage.remove(key) {
                warn!(key, error = %e, "failed to clear session entry");
            }
        }
    }

    /// Create a user remotely, attaching the configured default avatar, and
    /// cache the returned snapshot. Does not log the user in.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Remote`] if the create-user call fails and
    /// [`StoreError::Storage`] if the snapshot cannot be persisted.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<User> {
        let input = CreateUserInput {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            avatar: self.default_avatar.clone(),
        };

        let user = self.remote.register(&input).await?;
        self.storage.set(keys::USER, &user)?;
        Ok(user)
    }

    /// Update the cached user's profile remotely and refresh the snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when no user snapshot is cached,
    /// [`StoreError::Remote`] if the update fails, and
    /// [`StoreError::Storage`] if the fresh snapshot cannot be persisted.
    #[instrument(skip(self, changes))]
    pub async fn update_profile(&self, changes: &UpdateUserInput) -> Result<User> {
        let id = self
            .user_id()
            .ok_or_else(|| StoreError::NotFound("no cached user".to_string()))?;

        let user = self.remote.update_user(&id, changes).await?;
        self.storage.set(keys::USER, &user)?;
        Ok(user)
    }

    /// Clear all persisted session entries and flip the signal to false.
    ///
    /// Always succeeds locally and is safe to call when already logged out.
    /// Storage errors are logged, not raised.
    pub fn logout(&self) {
        self.clear_session_keys();
        self.login_state.emit(false);
    }

    /// Exchange the stored refresh token for a new pair, persisted in place.
    ///
    /// The user snapshot and the coarse login state are untouched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NoRefreshToken`] when none is stored,
    /// [`StoreError::Remote`] if the exchange fails, and
    /// [`StoreError::Storage`] if the new pair cannot be persisted.
    #[instrument(skip(self))]
    pub async fn refresh_token(&self) -> Result<()> {
        let refresh: String = self
            .storage
            .get(keys::REFRESH_TOKEN)?
            .ok_or(StoreError::NoRefreshToken)?;

        let tokens = self.remote.refresh_token(&refresh).await?;
        self.storage.set(keys::ACCESS_TOKEN, &tokens.access_token)?;
        self.storage.set(keys::REFRESH_TOKEN, &tokens.refresh_token)?;
        Ok(())
    }

    /// True iff an access token is present. No network call.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.storage.contains(keys::ACCESS_TOKEN)
    }

    /// Cached user snapshot, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.storage.get(keys::USER).ok().flatten()
    }

    /// Id of the cached user snapshot, if any.
    #[must_use]
    pub fn user_id(&self) -> Option<String> {
        self.current_user().map(|u| u.id)
    }

    /// The login-state signal for subscribers.
    #[must_use]
    pub fn login_state(&self) -> Signal<bool> {
        self.login_state.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryBackend;

    use async_trait::async_trait;
    use shopsync_core::{AuthTokens, Category, Product};

    use crate::api::ApiError;

    /// Remote stub for tests that must not reach the network.
    struct UnreachableRemote;

    #[async_trait]
    impl RemoteApi for UnreachableRemote {
        async fn products(&self) -> std::result::Result<Vec<Product>, ApiError> {
            Err(ApiError::NoData)
        }
        async fn delete_product(&self, _: &str) -> std::result::Result<bool, ApiError> {
            Err(ApiError::NoData)
        }
        async fn categories(&self) -> std::result::Result<Vec<Category>, ApiError> {
            Err(ApiError::NoData)
        }
        async fn login(&self, _: &str, _: &str) -> std::result::Result<AuthTokens, ApiError> {
            Err(ApiError::NoData)
        }
        async fn register(&self, _: &CreateUserInput) -> std::result::Result<User, ApiError> {
            Err(ApiError::NoData)
        }
        async fn refresh_token(&self, _: &str) -> std::result::Result<AuthTokens, ApiError> {
            Err(ApiError::NoData)
        }
        async fn profile(&self, _: &str) -> std::result::Result<User, ApiError> {
            Err(ApiError::NoData)
        }
        async fn update_user(
            &self,
            _: &str,
            _: &UpdateUserInput,
        ) -> std::result::Result<User, ApiError> {
            Err(ApiError::NoData)
        }
    }

    fn store_with_empty_storage() -> (SessionStore, LocalStore) {
        let storage = LocalStore::new(Arc::new(MemoryBackend::new()));
        let store = SessionStore::new(storage.clone(), Arc::new(UnreachableRemote), "avatar.png");
        (store, storage)
    }

    #[test]
    fn test_login_state_seeded_from_token_presence() {
        let storage = LocalStore::new(Arc::new(MemoryBackend::new()));
        storage.set(keys::ACCESS_TOKEN, &"tok").expect("set");
        let store = SessionStore::new(storage, Arc::new(UnreachableRemote), "avatar.png");
        assert!(store.is_authenticated());
        assert!(store.login_state().get());
    }

    #[test]
    fn test_logout_is_idempotent() {
        let (store, storage) = store_with_empty_storage();
        store.logout();
        store.logout();
        assert!(!store.is_authenticated());
        assert!(!storage.contains(keys::USER));
    }

    #[tokio::test]
    async fn test_failed_login_leaves_state_untouched() {
        let (store, storage) = store_with_empty_storage();
        let result = store.login("a@b.c", "wrong").await;
        assert!(matches!(result, Err(StoreError::Remote(_))));
        assert!(!store.is_authenticated());
        assert!(!storage.contains(keys::ACCESS_TOKEN));
        assert!(!store.login_state().get());
    }

    #[tokio::test]
    async fn test_refresh_without_token_fails_with_no_credential() {
        let (store, _) = store_with_empty_storage();
        let result = store.refresh_token().await;
        assert!(matches!(result, Err(StoreError::NoRefreshToken)));
    }

    #[test]
    fn test_user_id_absent_without_snapshot() {
        let (store, _) = store_with_empty_storage();
        assert!(store.user_id().is_none());
    }
}
