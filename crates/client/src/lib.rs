//! Shopsync client - state synchronization between a remote GraphQL source
//! and a locally persisted fallback store.
//!
//! # Architecture
//!
//! Three collaborating stores form the core, consumed by UI collaborators
//! (CLI, views) that stay outside this crate:
//!
//! - [`stores::SessionStore`] - owns the token pair and the current-user
//!   snapshot; exposes a login-state signal.
//! - [`stores::CatalogStore`] - hybrid read-through view over remote
//!   products/categories with a local-only sub-store that survives restarts.
//! - [`stores::CartStore`] - persisted, reactively observable cart with a
//!   derived grand total.
//!
//! Dependency order (leaves first): session -> catalog -> cart -> UI.
//! Catalog and cart do not depend on each other; a collaborator bridges
//! "add this catalog item to the cart".
//!
//! # Failure policy
//!
//! Remote failures on read paths with a local fallback are swallowed here
//! and converted into "use local data". Remote failures on write paths are
//! always re-raised. A local persistence failure aborts the whole operation
//! before in-memory state is committed.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod signal;
pub mod storage;
pub mod stores;

pub use api::{ApiError, GraphqlApi, RemoteApi};
pub use config::{CategoryMergePolicy, ClientConfig, ConfigError};
pub use error::StoreError;
pub use signal::{Signal, Subscription};
pub use storage::{FileBackend, LocalStore, MemoryBackend, StorageBackend, StorageError};
pub use stores::{CartStore, CatalogProduct, CatalogStore, SessionStore};
