//! Persisted key-value storage.
//!
//! The remote source is authoritative; this layer is the locally persisted
//! fallback that survives process restarts. Each store owns a fixed set of
//! keys (see [`keys`]); no two stores write the same key.
//!
//! [`StorageBackend`] abstracts the raw string-keyed JSON text store;
//! [`LocalStore`] layers typed `serde_json` access on top of it.

mod file;
mod memory;

pub use file::FileBackend;
pub use memory::MemoryBackend;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Persisted keys, each owned by exactly one store.
pub mod keys {
    /// Session store: access token.
    pub const ACCESS_TOKEN: &str = "access_token";
    /// Session store: refresh token.
    pub const REFRESH_TOKEN: &str = "refresh_token";
    /// Session store: current user snapshot.
    pub const USER: &str = "user";
    /// Cart store: cart line sequence.
    pub const CART: &str = "cart";
    /// Catalog store: local category sub-store.
    pub const CATEGORIES: &str = "categories";
    /// Catalog store: local fallback product list.
    pub const PRODUCTS: &str = "products";
    /// Catalog store: ledger of user-created category ids.
    pub const USER_CREATED_CATEGORIES: &str = "user_created_categories";
}

/// Errors raised by the storage layer.
///
/// These are not expected to be recoverable in-process: callers fail the
/// whole operation rather than committing a partial state.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying I/O failed (quota, permissions, disk).
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored value could not be serialized.
    #[error("failed to serialize value for key '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A stored value could not be parsed.
    #[error("failed to parse value for key '{key}': {source}")]
    Deserialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Raw string-keyed JSON text store.
pub trait StorageBackend: Send + Sync {
    /// Read the raw text stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the backend cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write raw text under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the backend cannot be written.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the entry under `key`. Deleting a missing key is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the backend cannot be written.
    fn delete(&self, key: &str) -> Result<(), StorageError>;
}

/// Typed JSON view over a [`StorageBackend`].
#[derive(Clone)]
pub struct LocalStore {
    backend: Arc<dyn StorageBackend>,
}

impl LocalStore {
    /// Wrap a backend.
    #[must_use]
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// Read and parse the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend read fails or the stored text does
    /// not parse as `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.backend.read(key)? {
            None => Ok(None),
            Some(text) => serde_json::from_str(&text)
                .map(Some)
                .map_err(|source| StorageError::Deserialize {
                    key: key.to_string(),
                    source,
                }),
        }
    }

    /// Serialize and store `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the backend write fails.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let text = serde_json::to_string(value).map_err(|source| StorageError::Serialize {
            key: key.to_string(),
            source,
        })?;
        self.backend.write(key, &text)
    }

    /// Remove the entry under `key` entirely.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend write fails.
    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.backend.delete(key)
    }

    /// True if an entry exists under `key`.
    ///
    /// Unreadable backends count as absent; presence checks never fail.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        matches!(self.backend.read(key), Ok(Some(_)))
    }
}
